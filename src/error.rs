use thiserror::Error;

/// Unified error type for patchops operations
#[derive(Error, Debug)]
pub enum PatchOpsError {
    #[error("Command `{command}` failed with exit code {}: {stderr}", describe_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Commit {commit} is not in the remote repository. Use -f to override.")]
    LocalCommit { commit: String },

    #[error("Invalid revision '{revision}': must not start with '-'")]
    InvalidRevision { revision: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command `{command}` produced non UTF-8 output")]
    Utf8 { command: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Convenience type alias for Results in patchops
pub type Result<T> = std::result::Result<T, PatchOpsError>;

impl PatchOpsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PatchOpsError::Config(msg.into())
    }

    /// Create the error raised when exporting an unpublished commit
    pub fn local_commit(commit: impl Into<String>) -> Self {
        PatchOpsError::LocalCommit {
            commit: commit.into(),
        }
    }

    /// Create the error for a revision git would parse as an option
    pub fn invalid_revision(revision: impl Into<String>) -> Self {
        PatchOpsError::InvalidRevision {
            revision: revision.into(),
        }
    }

    /// Whether retrying with `force` would get past this error
    pub fn is_local_commit(&self) -> bool {
        matches!(self, PatchOpsError::LocalCommit { .. })
    }
}
