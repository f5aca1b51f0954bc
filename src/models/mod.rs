use serde::{Deserialize, Serialize};

mod movie;
mod similarity;

pub use movie::{Movie, MovieTable};
pub use similarity::SimilarityMatrix;

/// A movie recommended for a query title, in ranked order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub movie_id: i64,
}

impl From<&Movie> for Recommendation {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            movie_id: movie.movie_id,
        }
    }
}

/// A recommendation with its resolved poster image, as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedMovie {
    pub title: String,
    pub movie_id: i64,
    pub poster_url: String,
}

impl RecommendedMovie {
    pub fn new(recommendation: Recommendation, poster_url: String) -> Self {
        Self {
            title: recommendation.title,
            movie_id: recommendation.movie_id,
            poster_url,
        }
    }
}

/// Request for movies similar to `title`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    /// Number of recommendations; the configured default when omitted
    #[serde(default)]
    pub k: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<RecommendedMovie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_from_movie() {
        let movie = Movie::new(155, "The Dark Knight");
        let rec = Recommendation::from(&movie);
        assert_eq!(rec.title, "The Dark Knight");
        assert_eq!(rec.movie_id, 155);
    }

    #[test]
    fn test_request_k_optional() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"title": "Avatar"}"#).unwrap();
        assert_eq!(request.title, "Avatar");
        assert_eq!(request.k, None);

        let request: RecommendationRequest =
            serde_json::from_str(r#"{"title": "Avatar", "k": -1}"#).unwrap();
        assert_eq!(request.k, Some(-1));
    }

    #[test]
    fn test_recommended_movie_serialization() {
        let movie = RecommendedMovie::new(
            Recommendation {
                title: "Avatar".to_string(),
                movie_id: 19995,
            },
            "https://image.tmdb.org/t/p/w500/poster.jpg".to_string(),
        );

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["title"], "Avatar");
        assert_eq!(json["movie_id"], 19995);
        assert_eq!(json["poster_url"], "https://image.tmdb.org/t/p/w500/poster.jpg");
    }
}
