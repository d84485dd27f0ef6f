pub mod commit;
pub mod config;
pub mod error;
pub mod filename;
pub mod remote;
pub mod runner;
pub mod tag;
pub mod ui;
pub mod version;

pub use commit::{confirm_commit, get_commit, get_diffstat, patch_subject};
pub use error::{PatchOpsError, Result};
pub use filename::{patch_file_stem, safe_filename};
pub use remote::{get_git_repo_url, get_remote_url};
pub use tag::{get_next_tag, get_tag, NextTag};
pub use version::{key_version, sort_tags, ReleaseKey, VersionKey};
