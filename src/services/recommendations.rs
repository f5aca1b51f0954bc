use std::{cmp::Ordering, sync::Arc};

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::{MovieTable, Recommendation, SimilarityMatrix},
};

/// Upper bound on `k` accepted from clients
pub const MAX_RECOMMENDATIONS: usize = 50;

/// Returns the `k` movies most similar to `title`.
///
/// Candidates are ranked by descending score from the title's matrix row. The
/// sort is stable, so equal scores keep table order, and NaN ranks below every
/// real score. The title's own row is excluded by index rather than by rank,
/// so a row whose diagonal isn't its maximum still never recommends itself.
/// Fewer than `k` results come back only when the table has fewer than `k + 1` rows.
pub fn recommend(
    title: &str,
    table: &MovieTable,
    matrix: &SimilarityMatrix,
    k: usize,
) -> AppResult<Vec<Recommendation>> {
    if matrix.dimension() != table.len() {
        return Err(AppError::InvalidArgument(format!(
            "similarity matrix dimension {} does not match movie table length {}",
            matrix.dimension(),
            table.len()
        )));
    }

    let query = table
        .position(title)
        .ok_or_else(|| AppError::NotFound(title.to_string()))?;
    let scores = matrix
        .row(query)
        .ok_or_else(|| AppError::Internal(format!("missing similarity row {}", query)))?;

    let mut ranked: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(j, _)| *j != query)
        .collect();
    ranked.sort_by(|(_, a), (_, b)| descending(*a, *b));

    Ok(ranked
        .into_iter()
        .take(k)
        .filter_map(|(j, _)| table.get(j).map(Recommendation::from))
        .collect())
}

/// Descending order with NaN last
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

/// Recommendation lookup bound to a loaded catalog
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    default_k: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, default_k: usize) -> Self {
        Self { catalog, default_k }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Recommends the configured default number of movies
    pub fn recommend(&self, title: &str) -> AppResult<Vec<Recommendation>> {
        self.recommend_k(title, self.default_k)
    }

    pub fn recommend_k(&self, title: &str, k: usize) -> AppResult<Vec<Recommendation>> {
        recommend(
            title,
            self.catalog.movies(),
            self.catalog.similarity(),
            k,
        )
    }

    /// Validates a client-supplied count, falling back to the default
    pub fn resolve_k(&self, requested: Option<i64>) -> AppResult<usize> {
        match requested {
            None => Ok(self.default_k),
            Some(k) if k < 0 => Err(AppError::InvalidArgument(format!(
                "k must be non-negative, got {}",
                k
            ))),
            Some(k) if k > MAX_RECOMMENDATIONS as i64 => {
                Err(AppError::InvalidArgument(format!(
                    "k must be at most {}, got {}",
                    MAX_RECOMMENDATIONS, k
                )))
            }
            Some(k) => Ok(k as usize),
        }
    }
}
