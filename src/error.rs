use crate::cursor::PageIteratorLevel;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine produced no result iterator at all.
    #[error("Nothing was recognized in the image")]
    NothingRecognized,

    #[error("Engine returned no bounding box at {0:?} level")]
    MissingBoundingBox(PageIteratorLevel),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
