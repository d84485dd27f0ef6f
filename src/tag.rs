use crate::error::Result;
use crate::runner::{check_revision, CommandRunner, Invocation};
use crate::version::sort_tags;
use log::debug;
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Marker printed by `git name-rev` when no tag contains the commit
pub const UNDEFINED_TAG: &str = "undefined";

/// Prediction of the tag the next release will carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTag {
    /// The newest tag is a release, so the next tag is the first candidate
    /// of the following minor version
    Single(String),
    /// The newest tag is a release candidate: the next tag is either the
    /// final release or another candidate, and which one is not yet known
    Ambiguous { release: String, candidate: String },
}

impl fmt::Display for NextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextTag::Single(tag) => f.write_str(tag),
            NextTag::Ambiguous { release, candidate } => {
                write!(f, "{} or {} (next release)", release, candidate)
            }
        }
    }
}

/// Finds the release tag that first contains `commit`.
///
/// Runs `git name-rev --refs=refs/tags/v* <commit>` inside `repo`.
///
/// # Returns
/// * `Ok(Some(tag))` - The tag name, without any `~<n>` distance
/// * `Ok(Some("undefined"))` - The commit is not contained in any tag yet
/// * `Ok(None)` - git printed nothing usable
/// * `Err` - If git failed
pub fn get_tag<R>(runner: &R, commit: &str, repo: &Path) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    check_revision(commit)?;
    let invocation =
        Invocation::git(["name-rev", "--refs=refs/tags/v*", commit]).current_dir(repo);
    let output = runner.run(&invocation)?;
    let output = output.trim();
    if output.is_empty() {
        return Ok(None);
    }

    Ok(parse_name_rev(output))
}

fn parse_name_rev(output: &str) -> Option<String> {
    if let Ok(re) = Regex::new(r"tags/([a-zA-Z0-9.-]+)~?\S*$") {
        if let Some(caps) = re.captures(output) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    if output.contains(UNDEFINED_TAG) {
        return Some(UNDEFINED_TAG.to_string());
    }

    None
}

/// Predicts the tag of the next release in `repo`.
///
/// Lists the `v*` tags, picks the newest one by version order and derives
/// the prediction from its `v<major>.<minor>` and optional `-rc<n>` parts.
/// A patch component on the newest tag is ignored.
///
/// # Returns
/// * `Ok(Some(NextTag::Single))` - Newest tag is a release: `v<major>.<minor+1>-rc1`
/// * `Ok(Some(NextTag::Ambiguous))` - Newest tag is `-rc<n>`: the release or `-rc<n+1>`
/// * `Ok(None)` - No tags, or the newest tag has an unexpected shape
/// * `Err` - If git failed
pub fn get_next_tag<R>(runner: &R, repo: &Path) -> Result<Option<NextTag>>
where
    R: CommandRunner + ?Sized,
{
    let invocation = Invocation::git(["tag", "-l", "v*"]).current_dir(repo);
    let output = runner.run(&invocation)?;

    let mut tags: Vec<String> = output.split_whitespace().map(str::to_string).collect();
    sort_tags(&mut tags);
    let Some(newest) = tags.last() else {
        return Ok(None);
    };

    debug!("Newest of {} tags is {}", tags.len(), newest);
    Ok(predict_from(newest))
}

/// Derives the next tag from the newest existing tag
pub fn predict_from(newest: &str) -> Option<NextTag> {
    let re = Regex::new(r"v([0-9]+)\.([0-9]+)(?:\.[0-9]+|-rc([0-9]+))?$").ok()?;
    let caps = re.captures(newest)?;

    let major = caps.get(1)?.as_str();
    let minor: u64 = caps.get(2)?.as_str().parse().ok()?;

    match caps.get(3) {
        None => Some(NextTag::Single(format!(
            "v{}.{}-rc1",
            major,
            minor.checked_add(1)?
        ))),
        Some(rc) => {
            let rc: u64 = rc.as_str().parse().ok()?;
            Some(NextTag::Ambiguous {
                release: format!("v{}.{}", major, minor),
                candidate: format!("v{}.{}-rc{}", major, minor, rc.checked_add(1)?),
            })
        }
    }
}
