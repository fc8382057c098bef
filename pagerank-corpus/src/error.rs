use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No .html pages found in {}", .0.display())]
    EmptyCorpus(PathBuf),
}

pub type Result<T> = std::result::Result<T, ScanError>;
