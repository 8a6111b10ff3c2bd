use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("flow data parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
