/*
 * File: /matrix.rs
 * Created Date: Thursday November 23rd 2023
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026 10:12:40 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Item matrix container for itemized datasets
 */

use std::ops::{Index, IndexMut};
// Array2
use ndarray::Array2;

/// Dense matrix with cached shape. Item matrices use `Matrix<Option<i32>>`,
/// where `None` marks a missing or removed element.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub data: Array2<T>,
    pub rows: usize,
    pub cols: usize,
}

impl<T> Matrix<T> {
    // constructor with Array2<T>
    pub fn new(data: Array2<T>) -> Matrix<T> {
        let rows = data.shape()[0];
        let cols = data.shape()[1];
        Matrix { data, rows, cols }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            Some(&self.data[(row, col)])
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        &self.data[(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        &mut self.data[(row, col)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix() {
        let data = Array2::from_shape_vec((2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
        let matrix = Matrix::new(data);
        assert_eq!(matrix.rows, 2);
        assert_eq!(matrix.cols, 3);
        assert_eq!(matrix.shape(), (2, 3));
    }

    #[test]
    fn test_get() {
        let data = Array2::from_shape_vec((2, 2), vec![1, 2, 3, 4]).unwrap();
        let matrix = Matrix::new(data);
        assert_eq!(matrix.get(0, 1), Some(&2));
        assert_eq!(matrix.get(1, 0), Some(&3));
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(0, 2), None);
    }

    #[test]
    fn test_index_mut() {
        let data = Array2::from_shape_vec((2, 2), vec![Some(1), Some(2), None, Some(4)]).unwrap();
        let mut matrix = Matrix::new(data);
        matrix[(0, 0)] = None;
        matrix[(1, 0)] = Some(7);
        assert_eq!(matrix[(0, 0)], None);
        assert_eq!(matrix[(1, 0)], Some(7));
    }
}
