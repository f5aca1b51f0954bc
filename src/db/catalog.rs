use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::Path,
};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieTable, SimilarityMatrix},
};

/// The loaded movie table and its similarity matrix.
///
/// Built once at startup and shared read-only (`Arc<Catalog>`) by every request.
#[derive(Debug)]
pub struct Catalog {
    movies: MovieTable,
    similarity: SimilarityMatrix,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Pairs a table with its matrix, checking that their sizes agree
    pub fn new(movies: MovieTable, similarity: SimilarityMatrix) -> AppResult<Self> {
        if similarity.dimension() != movies.len() {
            return Err(AppError::InvalidArgument(format!(
                "similarity matrix is {0}x{0} but the movie table has {1} rows",
                similarity.dimension(),
                movies.len()
            )));
        }

        Ok(Self {
            movies,
            similarity,
            loaded_at: Utc::now(),
        })
    }

    /// Reads both input files from disk
    pub fn load(movies_path: impl AsRef<Path>, similarity_path: impl AsRef<Path>) -> AppResult<Self> {
        let movies_path = movies_path.as_ref();
        let similarity_path = similarity_path.as_ref();

        let movies = load_movie_table(movies_path)?;
        let similarity = load_similarity_matrix(similarity_path)?;

        let catalog = Self::new(movies, similarity)
            .map_err(|e| AppError::data_load(similarity_path.display().to_string(), e))?;

        tracing::info!(
            movies = catalog.movies.len(),
            movies_path = %movies_path.display(),
            similarity_path = %similarity_path.display(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn movies(&self) -> &MovieTable {
        &self.movies
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// On-disk layouts accepted for the movie table
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MovieFile {
    /// `[{"movie_id": .., "title": ..}, ..]`
    Rows(Vec<Movie>),
    /// `{"movie_id": <column>, "title": <column>}`, other columns ignored
    Columns {
        movie_id: Column<i64>,
        title: Column<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Column<T> {
    List(Vec<T>),
    /// Keyed by row index, as written by a dataframe's `to_dict()`.
    /// Keys stay strings: integer keys don't survive untagged buffering.
    Indexed(BTreeMap<String, T>),
}

impl<T> Column<T> {
    fn into_values(self, name: &str) -> Result<Vec<T>, String> {
        match self {
            Column::List(values) => Ok(values),
            Column::Indexed(map) => {
                let mut rows = map
                    .into_iter()
                    .map(|(key, value)| {
                        key.parse::<usize>()
                            .map(|index| (index, value))
                            .map_err(|_| format!("column '{}' has non-numeric index '{}'", name, key))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                rows.sort_by_key(|(index, _)| *index);
                Ok(rows.into_iter().map(|(_, value)| value).collect())
            }
        }
    }
}

impl MovieFile {
    fn into_movies(self) -> Result<Vec<Movie>, String> {
        match self {
            MovieFile::Rows(movies) => Ok(movies),
            MovieFile::Columns { movie_id, title } => {
                let ids = movie_id.into_values("movie_id")?;
                let titles = title.into_values("title")?;
                if ids.len() != titles.len() {
                    return Err(format!(
                        "column lengths differ: movie_id has {}, title has {}",
                        ids.len(),
                        titles.len()
                    ));
                }
                Ok(ids
                    .into_iter()
                    .zip(titles)
                    .map(|(id, title)| Movie::new(id, title))
                    .collect())
            }
        }
    }
}

fn open(path: &Path) -> AppResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| AppError::data_load(path.display().to_string(), e))
}

/// Loads the movie table from JSON
pub fn load_movie_table(path: &Path) -> AppResult<MovieTable> {
    let file: MovieFile = serde_json::from_reader(open(path)?).map_err(|e| {
        AppError::data_load(
            path.display().to_string(),
            format!("not a recognised movie table: {}", e),
        )
    })?;

    let movies = file
        .into_movies()
        .map_err(|msg| AppError::data_load(path.display().to_string(), msg))?;

    Ok(MovieTable::new(movies))
}

/// Loads the similarity matrix. `.bin` files are bincode, anything else JSON.
pub fn load_similarity_matrix(path: &Path) -> AppResult<SimilarityMatrix> {
    let reader = open(path)?;
    let location = path.display().to_string();

    let rows: Vec<Vec<f64>> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => bincode::deserialize_from(reader)
            .map_err(|e| AppError::data_load(location.clone(), e))?,
        _ => serde_json::from_reader(reader).map_err(|e| AppError::data_load(location.clone(), e))?,
    };

    SimilarityMatrix::from_rows(rows).map_err(|e| AppError::data_load(location, e))
}
