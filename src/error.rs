use thiserror::Error;

#[derive(Error, Debug)]
pub enum MvcError {
    #[error("{0}")]
    NotFound(String),
    #[error("Corrupt data: {0}")]
    CorruptData(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("External process failed: {0}")]
    ExternalProcess(String),
}

impl MvcError {
    pub fn script_not_found(name: &str) -> Self {
        MvcError::NotFound(format!(
            "Could not find the '{}' script, please create one using 'mvc script'.",
            name
        ))
    }
}
