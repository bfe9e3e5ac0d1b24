//! A dense, row-major matrix.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}
impl<T> Matrix<T> {
    /// Wraps `data`, laid out row after row, as a `rows`-by-`cols` matrix.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            Some(data.len()),
            rows.checked_mul(cols),
            "{} elements cannot form a {rows}x{cols} matrix",
            data.len()
        );
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// The underlying storage, in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) is out of bounds for a {}x{} matrix",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl<T: Default + Clone> Matrix<T> {
    /// A `rows`-by-`cols` matrix of default-valued elements.
    pub fn allocate(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .unwrap_or_else(|| panic!("a {rows}x{cols} matrix is too large"));
        Self::from_row_major(rows, cols, vec![T::default(); len])
    }
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self::from_row_major(0, 0, vec![])
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}
