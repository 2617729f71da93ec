use crate::error::{VcsError, VcsResult};
use std::path::PathBuf;
use std::process::Command;

/// The version-control queries and commit operation pyfmt relies on.
pub trait Vcs {
    /// Porcelain status lines for `path`.
    fn status_porcelain(&self, path: &str) -> VcsResult<String>;

    /// Numeric diff-stat lines for `refspec`, limited to `path`.
    fn diff_numstat(&self, refspec: &str, path: &str) -> VcsResult<String>;

    /// Make `paths` known to version control so a path-limited commit accepts them.
    ///
    /// With `intent_only` only an empty entry is recorded for new files, leaving
    /// their content for an interactive commit to pick.
    fn add(&self, paths: &[String], intent_only: bool) -> VcsResult<()>;

    fn commit(&self, request: &CommitRequest) -> VcsResult<()>;
}

/// Which files a commit should include
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFiles {
    /// Every tracked change (`-a`)
    All,
    Paths(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub files: CommitFiles,
    pub patch: bool,
    pub amend: bool,
    pub message: Option<String>,
}

impl CommitRequest {
    /// Arguments following `git`
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["commit".to_string()];
        if self.patch {
            args.push("--patch".to_string());
        }
        if self.amend {
            args.push("--amend".to_string());
        }
        if let Some(message) = &self.message {
            args.push("-m".to_string());
            args.push(message.clone());
        }
        match &self.files {
            // `-a` cannot be combined with `--patch`; a bare patch commit already
            // walks every tracked change.
            CommitFiles::All if self.patch => {}
            CommitFiles::All => args.push("-a".to_string()),
            CommitFiles::Paths(paths) => {
                args.push("--".to_string());
                args.extend(paths.iter().cloned());
            }
        }
        args
    }
}

/// Runs the `git` executable found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    dir: Option<PathBuf>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            dir: None,
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable in place of `git`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Run every command from `dir` instead of the current directory.
    #[cfg(test)]
    pub(crate) fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        command
    }

    /// Run to completion, capturing output. `error` builds the failure from the
    /// command line and a reason.
    fn capture(
        &self,
        args: &[&str],
        error: impl Fn(String, String) -> VcsError,
    ) -> VcsResult<String> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, "running git");

        let output = self.command(args).output().map_err(|e| {
            error(
                command.clone(),
                format!("Failed to execute {}: {}", self.program, e),
            )
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                msg => msg.to_string(),
            };
            Err(error(command, reason))
        }
    }

    fn query(&self, args: &[&str]) -> VcsResult<String> {
        self.capture(args, |command, reason| VcsError::SelectionQuery {
            command,
            reason,
        })
    }
}

impl Vcs for GitCli {
    fn status_porcelain(&self, path: &str) -> VcsResult<String> {
        self.query(&["status", "--porcelain", path])
    }

    fn diff_numstat(&self, refspec: &str, path: &str) -> VcsResult<String> {
        self.query(&["--no-pager", "diff", "--numstat", refspec, "--", path])
    }

    fn add(&self, paths: &[String], intent_only: bool) -> VcsResult<()> {
        let mut args = vec!["add"];
        if intent_only {
            args.push("--intent-to-add");
        }
        args.push("--");
        args.extend(paths.iter().map(String::as_str));
        self.capture(&args, |command, reason| VcsError::Add { command, reason })
            .map(|_| ())
    }

    fn commit(&self, request: &CommitRequest) -> VcsResult<()> {
        let args = request.to_args();
        tracing::info!(?args, "committing");

        // Inherits stdio: `--patch` and a missing message both need the terminal.
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self
            .command(&args)
            .status()
            .map_err(|e| VcsError::Commit(format!("Failed to execute {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(VcsError::Commit(format!("git commit exited with {}", status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(files: CommitFiles) -> CommitRequest {
        CommitRequest {
            files,
            patch: false,
            amend: false,
            message: None,
        }
    }

    #[test]
    fn test_commit_all_args() {
        assert_eq!(request(CommitFiles::All).to_args(), vec!["commit", "-a"]);
    }

    #[test]
    fn test_commit_paths_with_message_and_amend() {
        let req = CommitRequest {
            amend: true,
            message: Some("style: run pyfmt".to_string()),
            ..request(CommitFiles::Paths(vec![
                "a.py".to_string(),
                "pkg/b.py".to_string(),
            ]))
        };
        assert_eq!(
            req.to_args(),
            vec![
                "commit",
                "--amend",
                "-m",
                "style: run pyfmt",
                "--",
                "a.py",
                "pkg/b.py"
            ]
        );
    }

    #[test]
    fn test_patch_commit_drops_all_flag() {
        let req = CommitRequest {
            patch: true,
            ..request(CommitFiles::All)
        };
        assert_eq!(req.to_args(), vec!["commit", "--patch"]);
    }

    #[test]
    fn test_query_spawn_failure_is_selection_error() {
        let git = GitCli::with_program("pyfmt-definitely-not-a-real-git");
        let err = git.status_porcelain(".").unwrap_err();
        assert!(matches!(err, VcsError::SelectionQuery { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_query_non_zero_exit_is_selection_error() {
        let git = GitCli::with_program("false");
        let err = git.diff_numstat("@{upstream}..", ".").unwrap_err();
        match err {
            VcsError::SelectionQuery { command, reason } => {
                assert!(command.contains("@{upstream}.."));
                assert!(reason.contains("exited with"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    mod with_git {
        use super::*;
        use crate::testing::TestRepo;

        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        fn rewrite_with_new_file() -> TestRepo {
            let repo = TestRepo::init();
            repo.write("a.py", "x=1\n");
            repo.write("other.py", "y=1\n");
            repo.commit_all("init");

            repo.write("a.py", "x = 1\n");
            repo.write("b.py", "z = 1\n");
            repo.write("other.py", "y = 2\n");
            repo
        }

        #[test]
        fn test_commit_paths_after_add_includes_new_files() {
            let repo = rewrite_with_new_file();
            let git = repo.cli();
            let paths = strings(&["a.py", "b.py"]);

            git.add(&paths, false).unwrap();
            git.commit(&CommitRequest {
                message: Some("fmt".to_string()),
                ..request(CommitFiles::Paths(paths))
            })
            .unwrap();

            assert_eq!(repo.git(&["log", "--format=%s"]), "fmt\ninit\n");
            assert_eq!(
                repo.git(&["show", "--name-only", "--format=", "HEAD"]),
                "a.py\nb.py\n"
            );
            assert_eq!(repo.git(&["status", "--porcelain"]), " M other.py\n");
        }

        #[test]
        fn test_commit_paths_rejects_unknown_files() {
            let repo = rewrite_with_new_file();
            let err = repo
                .cli()
                .commit(&CommitRequest {
                    message: Some("fmt".to_string()),
                    ..request(CommitFiles::Paths(strings(&["a.py", "b.py"])))
                })
                .unwrap_err();
            assert!(matches!(err, VcsError::Commit(_)));
            assert_eq!(repo.git(&["log", "--format=%s"]), "init\n");
        }

        #[test]
        fn test_intent_only_add_tracks_without_staging_content() {
            let repo = rewrite_with_new_file();
            repo.cli().add(&strings(&["a.py", "b.py"]), true).unwrap();

            assert_eq!(repo.git(&["ls-files", "b.py"]), "b.py\n");
            assert_eq!(repo.git(&["diff", "--cached", "--name-only"]), "");
        }

        #[test]
        fn test_add_missing_path_fails() {
            let repo = TestRepo::init();
            let err = repo.cli().add(&strings(&["missing.py"]), false).unwrap_err();
            match err {
                VcsError::Add { command, reason } => {
                    assert!(command.contains("missing.py"));
                    assert!(reason.contains("missing.py"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
