use crate::edit::EditError;
use crate::ts::TreeSitterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("source is empty")]
    EmptySource,

    #[error("unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    #[error("parse error: {0}")]
    Parse(#[from] TreeSitterError),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write fixes: {0}")]
    Edit(#[from] EditError),
}
