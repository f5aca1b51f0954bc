use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single row of the movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// TMDB movie ID, used for poster lookups
    pub movie_id: i64,
    pub title: String,
}

impl Movie {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// Ordered movie records. Row `i` here is row/column `i` of the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    movies: Vec<Movie>,
    /// Title → first row carrying that title
    by_title: HashMap<String, usize>,
}

impl MovieTable {
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut by_title = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            by_title.entry(movie.title.clone()).or_insert(row);
        }

        Self { movies, by_title }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// Row index of the first movie whose title matches exactly
    pub fn position(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    pub fn as_slice(&self) -> &[Movie] {
        &self.movies
    }
}

impl From<Vec<Movie>> for MovieTable {
    fn from(movies: Vec<Movie>) -> Self {
        Self::new(movies)
    }
}
