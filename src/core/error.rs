use thiserror::Error;

#[derive(Error, Debug)]
pub enum UmbraError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown map glyph {glyph:?} at row {row}, column {col}")]
    MapParse { row: usize, col: usize, glyph: char },

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UmbraError>;
