use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Lookup failures in the brand → model → size → year chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Brand not found: {0}")]
    UnknownBrand(String),

    #[error("Model not found: {brand} {model}")]
    UnknownModel { brand: String, model: String },

    #[error("Size not found: {brand} {model} size {size}")]
    UnknownSize {
        brand: String,
        model: String,
        size: String,
    },

    #[error("Year not found: {brand} {model} size {size} ({year})")]
    UnknownYear {
        brand: String,
        model: String,
        size: String,
        year: String,
    },

    #[error("Frame not found: {0}")]
    FrameNotFound(String),
}
