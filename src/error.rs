use thiserror::Error;

/// Error kinds produced by the core search engine.
///
/// Mirrors the four failure kinds in the design: bad input sequences are
/// non-fatal and simply drop the record, everything else is fatal to the run.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sequence{}: {reason}", name.as_ref().map(|n| format!(" {n:?}")).unwrap_or_default())]
    InvalidSequence {
        name: Option<String>,
        reason: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("reader error: {0}")]
    ReaderError(#[from] std::io::Error),

    #[error("worker task panicked: {0}")]
    TaskPanic(String),
}
