//! Source locations for diagnostics.
//!
//! Every assertion captures the location where its matcher was bound, and
//! every evaluation entry point captures its own call site via
//! `#[track_caller]`. Both are rendered as `file:line --> source` citations
//! in failure reports.

use std::fmt;
use std::path::Path;

/// Placeholder snippet when the source file cannot be read.
pub(crate) const SOURCE_UNAVAILABLE: &str = "<could not read source>";

/// A captured call site, with the source line it points at.
///
/// Immutable once captured; used only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    file: &'static str,
    line: u32,
    source: String,
}

impl Location {
    /// Capture the caller's location.
    #[must_use]
    #[track_caller]
    pub fn capture() -> Self {
        Self::from_caller(std::panic::Location::caller())
    }

    pub(crate) fn from_caller(caller: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: caller.file(),
            line: caller.line(),
            source: read_source_at(caller.file(), caller.line()),
        }
    }

    /// Path of the file containing the call site.
    #[must_use]
    pub fn file(&self) -> &str {
        self.file
    }

    /// 1-based line number of the call site.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The trimmed source line at the call site.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `self` and `other` point at the same file and line.
    #[must_use]
    pub fn same_site(&self, other: &Self) -> bool {
        self.file == other.file && self.line == other.line
    }

    /// Render a `file:line --> source` citation line.
    #[must_use]
    pub fn cite(&self, show_source: bool) -> String {
        let base = Path::new(self.file)
            .file_name()
            .map_or(self.file, |name| name.to_str().unwrap_or(self.file));
        if show_source {
            format!("{base}:{} --> {}", self.line, self.source)
        } else {
            format!("{base}:{}", self.line)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cite(true))
    }
}

/// Read and trim the source line at `file:line`.
///
/// Best effort only; any read problem yields [`SOURCE_UNAVAILABLE`].
pub(crate) fn read_source_at(file: &str, line: u32) -> String {
    let Ok(contents) = std::fs::read_to_string(file) else {
        return SOURCE_UNAVAILABLE.to_string();
    };
    contents
        .lines()
        .nth(line.saturating_sub(1) as usize)
        .map_or_else(|| SOURCE_UNAVAILABLE.to_string(), |l| l.trim().to_string())
}
