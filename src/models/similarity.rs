use crate::error::{AppError, AppResult};

/// Square, dense matrix of precomputed similarity scores, stored row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows. Every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::InvalidArgument(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.dimension {
            return None;
        }
        let start = i * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}
