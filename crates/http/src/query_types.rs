//! Request/query types (Deserialize)

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartWorkoutRequest {
    #[serde(default)]
    pub notes: Option<String>,
}
