//! Error types for the project dump export engine.

use crate::models::DumpKind;

/// Failure raised by a [`DumpWriter`](crate::dump::DumpWriter) when a record
/// cannot be appended to its stream.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("{kind} stream rejected write #{position}")]
    Rejected { kind: DumpKind, position: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error enum for the export engine.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A dump write failed mid-stream. `processed` counts the records of
    /// `kind` that were written before the failure, not the attempted total.
    #[error(
        "{} Export failed after processing {processed} {} successfully",
        .kind.label(),
        .kind.plural()
    )]
    StepFailed {
        kind: DumpKind,
        processed: u64,
        #[source]
        source: WriteError,
    },

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt dump: {0}")]
    CorruptDump(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ExportError {
    fn from(err: figment::Error) -> Self {
        ExportError::Config(Box::new(err))
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failed_message_uses_kind_labels() {
        for (kind, processed, expected) in [
            (
                DumpKind::Events,
                1,
                "Event Export failed after processing 1 events successfully",
            ),
            (
                DumpKind::Links,
                0,
                "Link Export failed after processing 0 links successfully",
            ),
            (
                DumpKind::Measures,
                3,
                "Measure Export failed after processing 3 measures successfully",
            ),
            (
                DumpKind::NewCodePeriods,
                2,
                "New Code Periods Export failed after processing 2 new code periods successfully",
            ),
        ] {
            let err = ExportError::StepFailed {
                kind,
                processed,
                source: WriteError::Rejected {
                    kind,
                    position: processed + 1,
                },
            };
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn step_failed_keeps_write_error_as_source() {
        let err = ExportError::StepFailed {
            kind: DumpKind::Settings,
            processed: 4,
            source: WriteError::Rejected {
                kind: DumpKind::Settings,
                position: 5,
            },
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("settings stream rejected write #5"));
    }
}
