use std::io;

use thiserror::Error;

/// Fatal errors. Anything else that goes wrong mid-session is handled in place.
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("stdout is not a terminal; run asciicade directly in an interactive terminal (not through a pipe or redirect)")]
    NotATerminal,
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
