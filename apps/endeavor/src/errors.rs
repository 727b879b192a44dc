use thiserror::Error;

/// Application-level error type.
/// Every pipeline stage returns `Result<T, AppError>`; `main` turns it into a non-zero exit.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// The model answered, but not in the shape the stage requires.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Input closed before a choice was made")]
    InputClosed,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_malformed_response_message() {
        let err = AppError::MalformedResponse("expected 5 topics, got 3".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed LLM response: expected 5 topics, got 3"
        );
    }
}
