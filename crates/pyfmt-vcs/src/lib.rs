//! Git status parsing and file selection
//!
//! Turns `git status --porcelain` and `git diff --numstat` output into the list of
//! source files a formatting run should touch, under one of several selection policies.

mod error;
mod git;
mod select;
mod status;
#[cfg(all(test, unix))]
mod testing;

pub use error::{VcsError, VcsResult};
pub use git::{CommitFiles, CommitRequest, GitCli, Vcs};
pub use select::{parse_numstat_line, parse_status_line, FileRecord, SelectionPolicy, Selector};
pub use status::{StatusCode, StatusFlag};
