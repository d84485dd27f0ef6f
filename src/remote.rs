use crate::error::Result;
use crate::runner::{check_revision, CommandRunner, Invocation};
use log::debug;
use regex::Regex;
use std::path::Path;

/// Looks up the fetch URL of the `origin` remote of `repo`.
///
/// # Returns
/// * `Ok(Some(url))` - The first `URL:` line printed by `git remote show origin -n`
/// * `Ok(None)` - If git printed no URL
/// * `Err` - If git failed
pub fn get_git_repo_url<R>(runner: &R, repo: &Path) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    get_remote_url(runner, repo, "origin")
}

/// Looks up the fetch URL of any remote without contacting it
pub fn get_remote_url<R>(runner: &R, repo: &Path, remote: &str) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    check_revision(remote)?;
    let invocation = Invocation::git(["remote", "show", remote, "-n"]).current_dir(repo);
    let output = runner.run(&invocation)?;

    let Ok(re) = Regex::new(r"URL:\s+(\S+)") else {
        return Ok(None);
    };
    Ok(output
        .lines()
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Name of the current branch, or `None` on a detached HEAD
pub fn current_branch<R>(runner: &R, repo: &Path) -> Option<String>
where
    R: CommandRunner + ?Sized,
{
    let invocation = Invocation::git(["symbolic-ref", "--short", "HEAD"]).current_dir(repo);
    match runner.run(&invocation) {
        Ok(out) => Some(out.trim().to_string()).filter(|b| !b.is_empty()),
        Err(e) => {
            debug!("No current branch: {}", e);
            None
        }
    }
}

/// Remote configured for the current branch (`branch.<name>.remote`)
///
/// Returns `None` on a detached HEAD or when the branch has no upstream.
pub fn current_branch_remote<R>(runner: &R, repo: &Path) -> Option<String>
where
    R: CommandRunner + ?Sized,
{
    let branch = current_branch(runner, repo)?;
    let key = format!("branch.{}.remote", branch);
    let invocation = Invocation::git(["config", "--get", key.as_str()]).current_dir(repo);
    match runner.run(&invocation) {
        Ok(out) => Some(out.trim().to_string()).filter(|r| !r.is_empty()),
        Err(e) => {
            debug!("Branch {} has no configured remote: {}", branch, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockRunner;

    const SHOW_ORIGIN: &str = "* remote origin
  Fetch URL: https://git.kernel.org/pub/scm/linux/kernel/git/torvalds/linux.git
  Push  URL: git@example.com:linux.git
  HEAD branch: (not queried)
";

    #[test]
    fn test_first_url_wins() {
        let runner = MockRunner::new().respond("git remote show origin -n", SHOW_ORIGIN);
        let url = get_git_repo_url(&runner, Path::new("/repo")).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://git.kernel.org/pub/scm/linux/kernel/git/torvalds/linux.git")
        );
    }

    #[test]
    fn test_no_url_line() {
        let runner = MockRunner::new().respond("git remote show origin -n", "* remote origin\n");
        assert_eq!(get_git_repo_url(&runner, Path::new("/repo")).unwrap(), None);
    }

    #[test]
    fn test_other_remote() {
        let runner = MockRunner::new()
            .respond("git remote show stable -n", "  Fetch URL: /srv/git/stable.git\n");
        let url = get_remote_url(&runner, Path::new("/repo"), "stable").unwrap();
        assert_eq!(url.as_deref(), Some("/srv/git/stable.git"));
    }

    #[test]
    fn test_option_like_remote_is_refused() {
        let runner = MockRunner::new();
        assert!(get_remote_url(&runner, Path::new("/repo"), "--upload-pack=x").is_err());
        assert!(runner.command_lines().is_empty());
    }

    #[test]
    fn test_branch_remote_lookup() {
        let runner = MockRunner::new()
            .respond("git symbolic-ref --short HEAD", "master\n")
            .respond("git config --get branch.master.remote", "origin\n");
        assert_eq!(
            current_branch_remote(&runner, Path::new("/repo")).as_deref(),
            Some("origin")
        );
    }

    #[test]
    fn test_detached_head_has_no_remote() {
        let runner = MockRunner::new().fail(
            "git symbolic-ref --short HEAD",
            128,
            "fatal: ref HEAD is not a symbolic ref",
        );
        assert_eq!(current_branch_remote(&runner, Path::new("/repo")), None);
        assert_eq!(runner.command_lines().len(), 1);
    }

    #[test]
    fn test_branch_without_upstream() {
        let runner = MockRunner::new()
            .respond("git symbolic-ref --short HEAD", "topic\n")
            .fail("git config --get branch.topic.remote", 1, "");
        assert_eq!(current_branch_remote(&runner, Path::new("/repo")), None);
    }
}
