//! Dense source × candidate matrices.
//!
//! Rows are sources, columns are candidates. Every stage of the reranker (raw
//! log-likelihoods, listener and speaker distributions) uses this one shape.

/// Row-major `f64` matrix indexed `[source][candidate]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    /// Creates a matrix with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a matrix cell by cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Builds a matrix from nested rows. Returns `None` when rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        Some(Self {
            rows: n_rows,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Iterates rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |row| self.row(row))
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Returns a new matrix with `f` applied to every cell.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.iter_rows().map(|row| row.iter().sum()).collect()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|col| (0..self.rows).map(|row| self.get(row, col)).sum())
            .collect()
    }
}

/// Numerically stable `ln(Σ exp(x))`.
///
/// Returns `-inf` when every input is `-inf` (or the input is empty).
pub fn log_sum_exp(values: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().into_iter().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || !max.is_finite() {
        return max;
    }
    let sum: f64 = values.into_iter().map(|v| (v - max).exp()).sum();
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let m = ScoreMatrix::from_fn(2, 3, |r, c| (r * 10 + c) as f64);

        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(m.column(2), vec![2.0, 12.0]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(ScoreMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_none());
        let m = ScoreMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn test_sums() {
        let m = ScoreMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        assert_eq!(m.row_sums(), vec![3.0, 7.0]);
        assert_eq!(m.column_sums(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_log_sum_exp_stable() {
        let lse = log_sum_exp([1000.0, 1000.0]);
        assert!((lse - (1000.0 + 2f64.ln())).abs() < 1e-9);

        let lse = log_sum_exp([-1000.0, f64::NEG_INFINITY]);
        assert!((lse + 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_sum_exp_all_impossible() {
        assert_eq!(
            log_sum_exp([f64::NEG_INFINITY, f64::NEG_INFINITY]),
            f64::NEG_INFINITY
        );
        assert_eq!(log_sum_exp(Vec::<f64>::new()), f64::NEG_INFINITY);
    }
}
