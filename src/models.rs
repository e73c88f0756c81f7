use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A film flattened for the read API, with related names aggregated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub creation_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    #[serde(rename = "type")]
    pub film_type: Option<String>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MoviePage {
    pub count: u64,
    pub total_pages: u64,
    pub prev: Option<u64>,
    pub next: Option<u64>,
    pub results: Vec<Movie>,
}

/// The `page` query parameter. A repeated key keeps its last value.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let page = pairs.into_iter().rev().find(|(key, _)| key == "page").map(|(_, v)| v);
        Self { page }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// The staff account a request was authenticated as.
#[derive(Clone, Debug)]
pub struct StaffUser {
    pub id: Uuid,
    pub username: String,
}
