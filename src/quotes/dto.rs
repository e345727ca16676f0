use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteInput {
    pub quote_text: String,
    #[serde(default)]
    pub author: String,
}

impl QuoteInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.quote_text.trim().is_empty() {
            return Err(AppError::Validation("quote_text is required".into()));
        }
        Ok(())
    }
}
