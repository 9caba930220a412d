use thiserror::Error;

#[derive(Error, Debug)]
pub enum BedError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
