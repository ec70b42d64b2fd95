//! Verified byte-span replacement.
//!
//! Fixes never touch text directly. Each one becomes an [`Edit`] that
//! remembers what the span held when the rule looked at it, and refuses to
//! apply if the span has changed since.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// Spans longer than this are remembered by hash instead of by copy.
const HASH_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an Edit does nothing until applied"]
pub struct Edit {
    pub file: PathBuf,
    /// Half-open byte range `[byte_start, byte_end)` being replaced.
    pub byte_start: usize,
    pub byte_end: usize,
    pub new_text: String,
    pub expected_before: EditVerification,
}

/// What the span must contain for the edit to go ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    ExactMatch(String),
    /// xxh3 of the expected text.
    Hash(u64),
}

impl EditVerification {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => expected == text,
            EditVerification::Hash(digest) => *digest == xxh3_64(text.as_bytes()),
        }
    }

    pub fn from_text(text: &str) -> Self {
        if text.len() > HASH_THRESHOLD {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_owned())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{} changed at bytes {byte_start}..{byte_end} since it was linted", .file.display())]
    BeforeTextMismatch {
        file: PathBuf,
        byte_start: usize,
        byte_end: usize,
        found: String,
    },

    #[error("byte range {byte_start}..{byte_end} is outside a {len}-byte file")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("byte range does not fall on character boundaries")]
    InvalidUtf8Edit,

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "check whether the file was actually written"]
pub enum EditResult {
    Applied { file: PathBuf, bytes_changed: usize },
    /// The span already held the new text; nothing was written.
    AlreadyApplied { file: PathBuf },
}

/// State of the target span relative to an edit.
enum Span {
    Pending,
    Done,
}

impl Edit {
    pub fn new(
        file: impl Into<PathBuf>,
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl AsRef<str>,
    ) -> Self {
        Self {
            file: file.into(),
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before.as_ref()),
        }
    }

    fn inspect(&self, content: &str) -> Result<Span, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }
        let current = content
            .get(self.byte_start..self.byte_end)
            .ok_or(EditError::InvalidUtf8Edit)?;

        if current == self.new_text {
            Ok(Span::Done)
        } else if self.expected_before.matches(current) {
            Ok(Span::Pending)
        } else {
            Err(EditError::BeforeTextMismatch {
                file: self.file.clone(),
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                found: current.to_owned(),
            })
        }
    }

    /// Apply the edit to `content`, returning the new text.
    ///
    /// An edit whose span already holds `new_text` leaves `content` as is.
    pub fn apply_to_str(&self, content: &str) -> Result<String, EditError> {
        if let Span::Done = self.inspect(content)? {
            return Ok(content.to_owned());
        }
        let (head, rest) = content.split_at(self.byte_start);
        let tail = &rest[self.byte_end - self.byte_start..];
        Ok([head, self.new_text.as_str(), tail].concat())
    }

    /// Apply the edit to `self.file` on disk.
    pub fn apply(&self) -> Result<EditResult, EditError> {
        let bytes = fs::read(&self.file)?;
        let content = std::str::from_utf8(&bytes)?;

        match self.inspect(content)? {
            Span::Done => Ok(EditResult::AlreadyApplied {
                file: self.file.clone(),
            }),
            Span::Pending => {
                let updated = self.apply_to_str(content)?;
                atomic_write(&self.file, updated.as_bytes())?;
                Ok(EditResult::Applied {
                    file: self.file.clone(),
                    bytes_changed: self.new_text.len(),
                })
            }
        }
    }
}

/// Write through a sibling temp file, fsync, then rename over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(content)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
