use thiserror::Error;

#[derive(Error, Debug)]
pub enum NegativeKeywordError {
    #[error("Match type not recognised: '{0}'. Please provide one of Broad, BMM, Exact or Phrase")]
    UnsupportedMatchType(String),

    #[error("Invalid setting '{field}': {details}")]
    InvalidSetting { field: String, details: String },

    #[error("Invalid ad group in column {column}: {details}")]
    InvalidAdGroup { column: u32, details: String },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Reporting error: {0}")]
    Reporting(String),

    #[error("Account error: {0}")]
    Account(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NegativeKeywordError>;
