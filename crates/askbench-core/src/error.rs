use thiserror::Error;

/// Top-level error type for the askbench harness.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// Dataset problems detected before or during a run. All of these fail
/// fast; none are silently skipped or defaulted.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Empty gold answer in example {index}")]
    EmptyGoldAnswer { index: usize },

    #[error("Example {index} has no refined question (required by the rephrased variant)")]
    MissingRefinedQuestion { index: usize },

    #[error("Malformed example {index}: {reason}")]
    Malformed { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        let err = ModelError::ApiRequest("timeout".into());
        assert_eq!(err.to_string(), "API request failed: timeout");
    }

    #[test]
    fn model_error_rate_limited_display() {
        let err = ModelError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(err.to_string(), "Rate limited: retry after Some(30)s");
    }

    #[test]
    fn model_error_retries_exhausted_display() {
        let err = ModelError::RetriesExhausted {
            attempts: 6,
            last_error: "API request failed: timeout".into(),
        };
        assert!(err.to_string().contains("6 attempts"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn dataset_error_display() {
        let err = DatasetError::EmptyGoldAnswer { index: 3 };
        assert_eq!(err.to_string(), "Empty gold answer in example 3");
    }

    #[test]
    fn dataset_error_missing_refined_display() {
        let err = DatasetError::MissingRefinedQuestion { index: 0 };
        assert!(err.to_string().contains("rephrased variant"));
    }

    #[test]
    fn bench_error_from_model_error() {
        let model_err = ModelError::Auth("bad key".into());
        let err: BenchError = model_err.into();
        assert!(matches!(err, BenchError::Model(ModelError::Auth(_))));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn bench_error_from_dataset_error() {
        let ds_err = DatasetError::Malformed {
            index: 1,
            reason: "choices without answer".into(),
        };
        let err: BenchError = ds_err.into();
        assert!(matches!(err, BenchError::Dataset(DatasetError::Malformed { .. })));
    }

    #[test]
    fn bench_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: BenchError = io_err.into();
        assert!(matches!(err, BenchError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
