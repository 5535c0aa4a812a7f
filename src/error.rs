use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while configuring or generating a notebook.
#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("unknown device `{0}` (run `ink-notebook devices` for the list of supported devices)")]
    UnknownDevice(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to generate `{}`", path.display())]
    Generation {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T, E = NotebookError> = std::result::Result<T, E>;

impl NotebookError {
    pub fn invalid<S: Into<String>>(message: S) -> NotebookError {
        NotebookError::InvalidParameter(message.into())
    }

    pub fn generation<P, E>(path: P, source: E) -> NotebookError
    where
        P: Into<PathBuf>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        NotebookError::Generation {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<derive_builder::UninitializedFieldError> for NotebookError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        NotebookError::InvalidParameter(format!("`{}` must be set", e.field_name()))
    }
}
