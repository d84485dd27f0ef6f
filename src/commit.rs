use crate::error::{PatchOpsError, Result};
use crate::remote::current_branch_remote;
use crate::runner::{check_revision, CommandRunner, Invocation};
use log::{debug, info};
use std::path::Path;

/// Checks that `commit` has been published to the current branch's remote.
///
/// Runs `git rev-list HEAD --not --remotes <remote>`, where `<remote>` is the
/// remote configured for the current branch: every remote-tracking branch is
/// excluded, plus `<remote>`'s default branch. The remote argument is left
/// out on a detached HEAD or when the branch has no upstream. The commit is
/// confirmed unless it appears in the listed (local-only) commits.
///
/// An abbreviated hexadecimal id is matched against the full ids git prints.
///
/// # Returns
/// * `Ok(true)` - Nothing is local-only, or `commit` is not among the local-only commits
/// * `Ok(false)` - `commit` exists only locally
/// * `Err` - If `git rev-list` failed
pub fn confirm_commit<R>(runner: &R, commit: &str, repo: &Path) -> Result<bool>
where
    R: CommandRunner + ?Sized,
{
    check_revision(commit)?;
    let mut args: Vec<String> = ["rev-list", "HEAD", "--not", "--remotes"]
        .iter()
        .map(|arg| arg.to_string())
        .collect();
    args.extend(current_branch_remote(runner, repo));
    let invocation = Invocation::git(args).current_dir(repo);
    let output = runner.run(&invocation)?;

    if output.trim().is_empty() {
        return Ok(true);
    }

    let local_only = output
        .split_whitespace()
        .any(|id| commit_matches(id, commit));
    debug!(
        "{} commits are local-only; {} is {}",
        output.split_whitespace().count(),
        commit,
        if local_only { "among them" } else { "not among them" }
    );
    Ok(!local_only)
}

fn commit_matches(listed: &str, commit: &str) -> bool {
    if listed == commit {
        return true;
    }
    commit.len() >= 4
        && commit.len() < listed.len()
        && commit.chars().all(|c| c.is_ascii_hexdigit())
        && listed.starts_with(&commit.to_ascii_lowercase())
}

/// Exports `commit` as an email-formatted patch with diffstat.
///
/// Runs `git diff-tree --no-renames --pretty=email -r -p --cc --stat <commit>`.
/// Unless `force` is set, the commit must also pass [confirm_commit] so that
/// unpublished work is not exported by accident.
///
/// # Returns
/// * `Ok(Some(patch))` - The patch text exactly as git printed it
/// * `Ok(None)` - git printed nothing (no such commit, or an empty diff)
/// * `Err(PatchOpsError::LocalCommit)` - The commit is local-only and `force` is not set
/// * `Err` - If git failed
pub fn get_commit<R>(runner: &R, commit: &str, repo: &Path, force: bool) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    check_revision(commit)?;
    let invocation = Invocation::git([
        "diff-tree",
        "--no-renames",
        "--pretty=email",
        "-r",
        "-p",
        "--cc",
        "--stat",
        commit,
    ])
    .current_dir(repo);
    let data = runner.run(&invocation)?;
    if data.trim().is_empty() {
        return Ok(None);
    }

    if force {
        info!("Skipping remote check for {}", commit);
    } else if !confirm_commit(runner, commit, repo)? {
        return Err(PatchOpsError::local_commit(commit));
    }

    Ok(Some(data))
}

/// Renders the diffstat of a patch with `diffstat -p1`
pub fn get_diffstat<R>(runner: &R, message: &str) -> Result<String>
where
    R: CommandRunner + ?Sized,
{
    runner.run(&Invocation::diffstat(["-p1"]).input(message))
}

/// Extracts the `Subject:` header of an email-formatted patch.
///
/// Folded header lines are joined with a single space. Only the header block
/// (up to the first blank line) is searched.
pub fn patch_subject(patch: &str) -> Option<String> {
    let mut lines = patch.lines().take_while(|line| !line.is_empty());
    let first = lines.find_map(|line| line.strip_prefix("Subject:"))?;

    let mut subject = first.trim().to_string();
    for continuation in lines.take_while(|line| line.starts_with([' ', '\t'])) {
        subject.push(' ');
        subject.push_str(continuation.trim());
    }
    Some(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockRunner;

    const REPO: &str = "/src/linux";
    const FULL: &str = "1111111111111111111111111111111111111111";
    const OTHER: &str = "2222222222222222222222222222222222222222";
    const DIFF_TREE: &str = "git diff-tree --no-renames --pretty=email -r -p --cc --stat";

    const PATCH: &str = "From 1111111111111111111111111111111111111111 Mon Sep 17 00:00:00 2001
From: Jane Dev <jane@example.com>
Date: Tue, 1 Oct 2024 10:00:00 +0200
Subject: [PATCH] mm: fix a very long subject line that git
 folded onto a second line

Body text.
---
 mm/page_alloc.c | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)
";

    fn upstream_runner(rev_list: &str) -> MockRunner {
        MockRunner::new()
            .respond("git symbolic-ref --short HEAD", "master\n")
            .respond("git config --get branch.master.remote", "origin\n")
            .respond("git rev-list HEAD --not --remotes origin", rev_list)
    }

    #[test]
    fn test_confirm_when_nothing_is_local() {
        let runner = upstream_runner("");
        assert!(confirm_commit(&runner, FULL, Path::new(REPO)).unwrap());
    }

    #[test]
    fn test_reject_local_commit() {
        let runner = upstream_runner(&format!("{}\n{}\n", OTHER, FULL));
        assert!(!confirm_commit(&runner, FULL, Path::new(REPO)).unwrap());
    }

    #[test]
    fn test_confirm_commit_not_in_local_list() {
        let runner = upstream_runner(&format!("{}\n", OTHER));
        assert!(confirm_commit(&runner, FULL, Path::new(REPO)).unwrap());
    }

    #[test]
    fn test_abbreviated_id_is_matched() {
        let runner = upstream_runner(&format!("{}\n", FULL));
        assert!(!confirm_commit(&runner, "1111111", Path::new(REPO)).unwrap());
    }

    #[test]
    fn test_detached_head_checks_all_remotes() {
        let runner = MockRunner::new()
            .fail("git symbolic-ref --short HEAD", 128, "not a symbolic ref")
            .respond("git rev-list HEAD --not --remotes", "");
        assert!(confirm_commit(&runner, FULL, Path::new(REPO)).unwrap());
        assert!(runner
            .command_lines()
            .contains(&"git rev-list HEAD --not --remotes".to_string()));
    }

    #[test]
    fn test_branch_remote_is_extra_exclusion_not_a_filter() {
        // Published to another remote only: git lists nothing, so confirmed.
        let runner = upstream_runner("");
        assert!(confirm_commit(&runner, FULL, Path::new(REPO)).unwrap());

        let rev_list = runner.calls().pop().unwrap();
        assert_eq!(rev_list.args, vec!["rev-list", "HEAD", "--not", "--remotes", "origin"]);
    }

    #[test]
    fn test_option_like_commit_is_rejected() {
        let runner = MockRunner::new();
        let err = get_commit(&runner, "--output=/tmp/x", Path::new(REPO), true).unwrap_err();
        assert!(matches!(err, PatchOpsError::InvalidRevision { .. }));
        assert!(confirm_commit(&runner, "-x", Path::new(REPO)).is_err());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_commit_matches_rules() {
        assert!(commit_matches(FULL, FULL));
        assert!(commit_matches(FULL, "1111"));
        assert!(!commit_matches(FULL, "111"));
        assert!(!commit_matches(FULL, "HEAD"));
        assert!(!commit_matches(FULL, "11112"));
    }

    #[test]
    fn test_get_commit_confirmed() {
        let runner =
            upstream_runner("").respond(format!("{} {}", DIFF_TREE, FULL), PATCH);
        let patch = get_commit(&runner, FULL, Path::new(REPO), false).unwrap();
        assert_eq!(patch.as_deref(), Some(PATCH));
    }

    #[test]
    fn test_get_commit_local_is_refused() {
        let runner = upstream_runner(&format!("{}\n", FULL))
            .respond(format!("{} {}", DIFF_TREE, FULL), PATCH);
        let err = get_commit(&runner, FULL, Path::new(REPO), false).unwrap_err();
        assert!(err.is_local_commit());
        assert!(err.to_string().contains("Use -f to override"));
    }

    #[test]
    fn test_get_commit_force_skips_check() {
        let runner =
            MockRunner::new().respond(format!("{} {}", DIFF_TREE, FULL), PATCH);
        let patch = get_commit(&runner, FULL, Path::new(REPO), true).unwrap();
        assert_eq!(patch.as_deref(), Some(PATCH));
        assert_eq!(runner.command_lines().len(), 1);
    }

    #[test]
    fn test_get_commit_empty_output_skips_check() {
        let runner = MockRunner::new().respond(format!("{} {}", DIFF_TREE, FULL), "");
        assert_eq!(get_commit(&runner, FULL, Path::new(REPO), false).unwrap(), None);
        assert_eq!(runner.command_lines().len(), 1);
    }

    #[test]
    fn test_diffstat_pipes_message() {
        let runner = MockRunner::new().respond(
            "diffstat -p1",
            " mm/page_alloc.c |    2 +-\n 1 file changed, 1 insertion(+), 1 deletion(-)\n",
        );
        let stat = get_diffstat(&runner, PATCH).unwrap();
        assert!(stat.starts_with(" mm/page_alloc.c"));
        assert_eq!(runner.calls()[0].input.as_deref(), Some(PATCH));
        assert_eq!(runner.calls()[0].current_dir, None);
    }

    #[test]
    fn test_patch_subject_joins_folded_lines() {
        assert_eq!(
            patch_subject(PATCH).as_deref(),
            Some("[PATCH] mm: fix a very long subject line that git folded onto a second line")
        );
    }

    #[test]
    fn test_patch_subject_missing() {
        assert_eq!(patch_subject("From: x\n\nSubject: in the body\n"), None);
    }
}
