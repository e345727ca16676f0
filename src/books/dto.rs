use serde::Deserialize;
use time::Date;

use crate::error::AppError;

/// Body accepted by create and update; update replaces every field.
#[derive(Debug, Clone, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(deserialize_with = "super::repo_types::deserialize_date")]
    pub publication_date: Date,
}

impl BookInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if self.author.trim().is_empty() {
            return Err(AppError::Validation("author is required".into()));
        }
        Ok(())
    }
}
