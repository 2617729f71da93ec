//! Two-character porcelain status codes

use crate::error::{VcsError, VcsResult};
use std::fmt;
use std::str::FromStr;

/// One side (index or work tree) of a porcelain status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Unmodified,
    Modified,
    TypeChanged,
    Added,
    Deleted,
    Renamed,
    Copied,
    Updated,
    Untracked,
    Ignored,
}

impl StatusFlag {
    pub fn from_char(ch: char) -> Option<Self> {
        let flag = match ch {
            ' ' => StatusFlag::Unmodified,
            'M' => StatusFlag::Modified,
            'T' => StatusFlag::TypeChanged,
            'A' => StatusFlag::Added,
            'D' => StatusFlag::Deleted,
            'R' => StatusFlag::Renamed,
            'C' => StatusFlag::Copied,
            'U' => StatusFlag::Updated,
            '?' => StatusFlag::Untracked,
            '!' => StatusFlag::Ignored,
            _ => return None,
        };
        Some(flag)
    }

    pub fn as_char(self) -> char {
        match self {
            StatusFlag::Unmodified => ' ',
            StatusFlag::Modified => 'M',
            StatusFlag::TypeChanged => 'T',
            StatusFlag::Added => 'A',
            StatusFlag::Deleted => 'D',
            StatusFlag::Renamed => 'R',
            StatusFlag::Copied => 'C',
            StatusFlag::Updated => 'U',
            StatusFlag::Untracked => '?',
            StatusFlag::Ignored => '!',
        }
    }
}

/// Porcelain `XY` status: `X` is the index, `Y` the work tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode {
    pub index: StatusFlag,
    pub work_tree: StatusFlag,
}

impl StatusCode {
    pub fn new(index: StatusFlag, work_tree: StatusFlag) -> Self {
        Self { index, work_tree }
    }

    /// Parse exactly two status characters
    pub fn parse(code: &str) -> VcsResult<Self> {
        let mut chars = code.chars();
        let (Some(x), Some(y), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(VcsError::InvalidStatusCode(code.to_string()));
        };
        match (StatusFlag::from_char(x), StatusFlag::from_char(y)) {
            (Some(index), Some(work_tree)) => Ok(Self { index, work_tree }),
            _ => Err(VcsError::InvalidStatusCode(code.to_string())),
        }
    }

    /// Index holds a modification, addition, rename or copy
    pub fn has_index_changes(&self) -> bool {
        matches!(
            self.index,
            StatusFlag::Modified | StatusFlag::Added | StatusFlag::Renamed | StatusFlag::Copied
        )
    }

    pub fn has_changes(&self) -> bool {
        self.has_index_changes()
            || matches!(
                self.work_tree,
                StatusFlag::Modified | StatusFlag::Added | StatusFlag::Copied
            )
    }

    pub fn is_untracked(&self) -> bool {
        self.index == StatusFlag::Untracked && self.work_tree == StatusFlag::Untracked
    }

    pub fn is_deleted(&self) -> bool {
        self.work_tree == StatusFlag::Deleted
    }

    pub fn is_renamed(&self) -> bool {
        self.index == StatusFlag::Renamed
    }
}

impl FromStr for StatusCode {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.index.as_char(), self.work_tree.as_char())
    }
}
