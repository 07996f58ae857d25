/**
 * File: /src/Submatrix.rs
 * Created Date: Monday January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026 11:02:18 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	View over a bicluster of an item matrix
**/

/// Extend the usage of slice for ndarray
/// struct Submatrix and impl
use ndarray::ArrayView2;
use std::ops::Index;

use crate::bicluster::Bicluster;
use crate::matrix::Matrix;

///
/// # Example
/// ```
/// use bic_sweep::matrix::Matrix;
/// use bic_sweep::submatrix::Submatrix;
/// use ndarray::Array2;
/// let a = Matrix::new(Array2::from_shape_vec((3, 3), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap());
/// let b = Submatrix::from_indices(&a, &[0, 2], &[1, 2]).unwrap();
///
/// assert_eq!(b[(1, 1)], 9);
/// assert_eq!(b[(0, 0)], 2);
/// ```
/// b = [[2, 3],
///     [8, 9]]
pub struct Submatrix<'a, T> {
    data: ArrayView2<'a, T>,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
}

impl<'a, T> Submatrix<'a, T> {
    fn new(matrix: &'a Matrix<T>, row_indices: Vec<usize>, col_indices: Vec<usize>) -> Option<Self> {
        // every index must fall inside the matrix, and the view must not be empty
        let rows_ok = row_indices.iter().max().map_or(false, |&r| r < matrix.rows);
        let cols_ok = col_indices.iter().max().map_or(false, |&c| c < matrix.cols);

        if rows_ok && cols_ok {
            Some(Submatrix {
                data: matrix.data.view(),
                row_indices,
                col_indices,
            })
        } else {
            None
        }
    }

    pub fn from_indices(
        matrix: &'a Matrix<T>,
        row_indices: &[usize],
        col_indices: &[usize],
    ) -> Option<Self> {
        Self::new(matrix, row_indices.to_vec(), col_indices.to_vec())
    }

    pub fn from_bicluster(matrix: &'a Matrix<T>, bicluster: &Bicluster) -> Option<Self> {
        Self::new(matrix, bicluster.row_indices(), bicluster.col_indices())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.row_indices.get(row).and_then(|&r| {
            self.col_indices
                .get(col)
                .and_then(|&c| self.data.get((r, c)))
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_indices.len(), self.col_indices.len())
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Values of the i-th selected row.
    pub fn row(&self, i: usize) -> Vec<&T> {
        (0..self.col_indices.len()).filter_map(|j| self.get(i, j)).collect()
    }

    /// Values of the j-th selected column.
    pub fn column(&self, j: usize) -> Vec<&T> {
        (0..self.row_indices.len()).filter_map(|i| self.get(i, j)).collect()
    }
}

impl<'a, T> Index<(usize, usize)> for Submatrix<'a, T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (r, c) = (self.row_indices[index.0], self.col_indices[index.1]);
        &self.data[(r, c)]
    }
}

/// Item rendering used in reports: missing cells print as `?`.
pub fn render_item(item: &Option<i32>) -> String {
    match item {
        Some(v) => v.to_string(),
        None => "?".to_string(),
    }
}
