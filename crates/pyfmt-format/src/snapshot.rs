//! Content digests used to tell which files the formatters rewrote

use sha2::{Digest, Sha256};
use std::fs;

/// SHA-256 digests of a set of files at one point in time
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

fn digest(path: &str) -> Option<Vec<u8>> {
    fs::read(path)
        .ok()
        .map(|content| Sha256::digest(&content).to_vec())
}

impl ContentSnapshot {
    pub fn capture<S: AsRef<str>>(paths: &[S]) -> Self {
        let entries = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_string(), digest(path))
            })
            .collect();
        Self { entries }
    }

    /// Files whose content differs from the snapshot, in capture order
    pub fn changed(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(path, before)| digest(path) != *before)
            .map(|(path, _)| path.clone())
            .collect()
    }
}
