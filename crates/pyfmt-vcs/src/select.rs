//! Selection policies mapping version-control state to source files

use crate::error::{VcsError, VcsResult};
use crate::git::Vcs;
use crate::status::StatusCode;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Which files in PATH to format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionPolicy {
    /// Files in the index
    Staged,
    /// Files in the index, working tree, and untracked files
    Modified,
    /// Files changed in HEAD
    Head,
    /// Files changed locally but not upstream
    Local,
    /// All files
    All,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 5] = [
        SelectionPolicy::Staged,
        SelectionPolicy::Modified,
        SelectionPolicy::Head,
        SelectionPolicy::Local,
        SelectionPolicy::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Staged => "staged",
            SelectionPolicy::Modified => "modified",
            SelectionPolicy::Head => "head",
            SelectionPolicy::Local => "local",
            SelectionPolicy::All => "all",
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| VcsError::UnknownSelector(s.to_string()))
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path from one porcelain status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub status: StatusCode,
}

/// Parse one `git status --porcelain` line.
///
/// Renames (`R  old -> new`) yield the new name. Returns `None` for blank lines.
pub fn parse_status_line(line: &str) -> Option<VcsResult<FileRecord>> {
    if line.trim().is_empty() {
        return None;
    }
    let Some((code, rest)) = line.split_at_checked(2) else {
        return Some(Err(VcsError::InvalidStatusCode(line.to_string())));
    };
    let status = match StatusCode::parse(code) {
        Ok(status) => status,
        Err(e) => return Some(Err(e)),
    };

    let rest = rest.trim();
    let path = if status.is_renamed() {
        rest.rsplit_once(" -> ").map_or(rest, |(_, new)| new)
    } else {
        rest
    };

    Some(Ok(FileRecord {
        path: unquote(path).to_string(),
        status,
    }))
}

/// The file path of one `git diff --numstat` line: its trailing token.
pub fn parse_numstat_line(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

// git quotes paths containing spaces or unusual bytes
fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

/// Resolves a [`SelectionPolicy`] to concrete paths using a [`Vcs`].
pub struct Selector<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    suffixes: Vec<String>,
}

impl<'a, V: Vcs + ?Sized> Selector<'a, V> {
    /// `extensions` are given without the leading dot, e.g. `["py"]`.
    pub fn new(vcs: &'a V, extensions: &[String]) -> Self {
        let suffixes = extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')))
            .collect();
        Self { vcs, suffixes }
    }

    /// Paths to format under `policy`, in the order version control reports them.
    ///
    /// `All` returns `root` unchanged without querying version control.
    pub fn select(&self, policy: SelectionPolicy, root: &str) -> VcsResult<Vec<String>> {
        let files = match policy {
            SelectionPolicy::Staged => {
                self.changed_files(root, |status| status.has_index_changes())?
            }
            SelectionPolicy::Modified => self.changed_files(root, |status| {
                status.has_changes() || status.is_untracked()
            })?,
            SelectionPolicy::Head => self.committed_files(root, "HEAD^1..HEAD")?,
            SelectionPolicy::Local => self.committed_files(root, "@{upstream}..")?,
            SelectionPolicy::All => vec![root.to_string()],
        };
        tracing::info!(policy = %policy, count = files.len(), "selected files");
        Ok(files)
    }

    fn is_source(&self, path: &str) -> bool {
        self.suffixes.iter().any(|suffix| path.ends_with(suffix))
    }

    fn changed_files(
        &self,
        root: &str,
        keep: impl Fn(&StatusCode) -> bool,
    ) -> VcsResult<Vec<String>> {
        let output = self.vcs.status_porcelain(root)?;
        let mut files = Vec::new();
        for line in output.lines() {
            let record = match parse_status_line(line) {
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    tracing::warn!(line, "skipping status line: {}", e);
                    continue;
                }
                None => continue,
            };
            if record.status.is_deleted() || !self.is_source(&record.path) {
                continue;
            }
            if keep(&record.status) {
                files.push(record.path);
            }
        }
        Ok(files)
    }

    fn committed_files(&self, root: &str, refspec: &str) -> VcsResult<Vec<String>> {
        let output = self.vcs.diff_numstat(refspec, root)?;
        Ok(output
            .lines()
            .filter_map(parse_numstat_line)
            .filter(|path| self.is_source(path))
            .map(str::to_string)
            .collect())
    }
}
