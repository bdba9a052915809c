use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open or read input: {0}")]
    InputUnavailable(String),
    #[error("unsupported bitmap format: {0}")]
    UnsupportedFormat(String),
    #[error("parameters are infeasible: {0}")]
    ParameterInfeasible(String),
    #[error("pixel access out of range: {0}")]
    PixelOutOfRange(String),
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("non-finite value encountered where a finite double was required")]
    NonFinite,
}

pub type Result<T> = std::result::Result<T, Error>;
