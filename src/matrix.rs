// Checked matrix construction and reductions.
//
// Model output arrives as flat one-value-per-line sequences. Every matrix in
// the crate is built here with an explicit (rows, cols) shape in row-major
// order, and a length mismatch is an error rather than a silent reinterpret.

use ndarray::{Array1, Array2, Axis};
use serde::ser::SerializeSeq;
use serde::Serializer;

use crate::error::{AggregateError, Result};

/// Reshape a flat row-major sequence into a `rows x cols` matrix.
///
/// `what` names the input in the error so a mismatched upstream file can be
/// identified.
pub fn reshape(flat: &[f64], rows: usize, cols: usize, what: &str) -> Result<Array2<f64>> {
    let expected = rows.checked_mul(cols).ok_or_else(|| {
        AggregateError::invalid_parameter(format!("{what}: {rows} x {cols} overflows"))
    })?;
    if flat.len() != expected {
        return Err(AggregateError::malformed(
            format!("{what} ({rows} x {cols})"),
            expected,
            flat.len(),
        ));
    }
    Array2::from_shape_vec((rows, cols), flat.to_vec())
        .map_err(|_| AggregateError::malformed(what, expected, flat.len()))
}

/// Flatten a matrix back to a row-major sequence.
pub fn flatten(matrix: &Array2<f64>) -> Vec<f64> {
    matrix.iter().copied().collect()
}

/// Fail with `InvalidMatrix` on the first NaN or infinite cell.
pub fn ensure_finite(matrix: &Array2<f64>) -> Result<()> {
    match matrix.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(AggregateError::InvalidMatrix { row, col, value }),
        None => Ok(()),
    }
}

/// Per-row mean and population standard deviation.
pub fn row_stats(matrix: &Array2<f64>) -> (Vec<f64>, Vec<f64>) {
    axis_stats(matrix, Axis(1), matrix.nrows())
}

/// Per-column mean and population standard deviation.
pub fn column_stats(matrix: &Array2<f64>) -> (Vec<f64>, Vec<f64>) {
    axis_stats(matrix, Axis(0), matrix.ncols())
}

fn axis_stats(matrix: &Array2<f64>, axis: Axis, lanes: usize) -> (Vec<f64>, Vec<f64>) {
    // Reducing over an empty axis has no mean; report NaN so it is visible.
    let mean = matrix
        .mean_axis(axis)
        .unwrap_or_else(|| Array1::from_elem(lanes, f64::NAN));
    let std = if matrix.len_of(axis) == 0 {
        Array1::from_elem(lanes, f64::NAN)
    } else {
        matrix.std_axis(axis, 0.0)
    };
    (mean.to_vec(), std.to_vec())
}

/// Serialize a matrix as a list of rows.
pub fn serialize_rows<S: Serializer>(
    matrix: &Array2<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(matrix.nrows()))?;
    for row in matrix.rows() {
        seq.serialize_element(&row.to_vec())?;
    }
    seq.end()
}
