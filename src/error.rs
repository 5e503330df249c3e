use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a single run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Found no files matching '{pattern}'")]
    NoInputFiles { pattern: String },

    #[error("Path is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("Output file destination folder too long (no room for a filename within {max} chars): {}", .dir.display())]
    OutputDirTooLong { dir: PathBuf, max: usize },

    #[error("Output filepath too long ({len} > {max} chars): {}", .path.display())]
    OutputPathTooLong { path: PathBuf, len: usize, max: usize },

    #[error("ffmpeg exited with {status}")]
    EncoderFailed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("Can't run '{program}': {source}")]
    EncoderSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
