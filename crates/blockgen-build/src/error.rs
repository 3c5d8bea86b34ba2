use blockgen_config::ConfigError;
use blockgen_schema::diagnostic::Diagnostic;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// Error
///
/// Everything that can end a generation pass. Validation failures arrive as
/// a [`Diagnostic`]; the rest are source, filesystem and rendering faults.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),

    #[error("{}: {message}", path.display())]
    Source { path: PathBuf, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("cannot generate {name}: {message}")]
    Synthesis { name: String, message: String },
}

impl Error {
    pub(crate) fn invalid_source(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Source {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn synthesis(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Synthesis {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// The validation diagnostic behind this error, if any.
    #[must_use]
    pub const fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Diagnostic(d) => Some(d),
            _ => None,
        }
    }
}
