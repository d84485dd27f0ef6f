use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use patchops::config::{self, Config};
use patchops::runner::SystemRunner;
use patchops::{ui, PatchOpsError};

#[derive(Parser)]
#[command(
    name = "patchops",
    about = "Helpers for exporting and tracking patches in a git repository"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log every command that is run")]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Show the release tag that first contains a commit
    Tag {
        commit: String,
        #[arg(short, long, help = "Repository path")]
        repo: Option<PathBuf>,
    },
    /// Predict the tag of the next release
    NextTag {
        #[arg(short, long, help = "Repository path")]
        repo: Option<PathBuf>,
    },
    /// Check that a commit has been pushed to the branch's remote
    Confirm {
        commit: String,
        #[arg(short, long, help = "Repository path")]
        repo: Option<PathBuf>,
    },
    /// Export a commit as an email-formatted patch
    Export {
        commit: String,
        #[arg(short, long, help = "Repository path")]
        repo: Option<PathBuf>,
        #[arg(short, long, help = "Export even if the commit is not on the remote")]
        force: bool,
        #[arg(short, long, help = "Write the patch to a file named after its subject")]
        write: bool,
    },
    /// Print the diffstat of a patch read from stdin
    Diffstat,
    /// Show the URL of the origin remote
    Url {
        #[arg(short, long, help = "Repository path")]
        repo: Option<PathBuf>,
    },
    /// Turn a commit subject into a safe file name
    Filename { subject: String },
    /// Print tags in release order, oldest first
    SortTags { tags: Vec<String> },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let runner = SystemRunner::from_config(&config.tools);
    let repo_or_default = |repo: Option<PathBuf>| repo.unwrap_or_else(|| config.repo.clone());

    match args.command {
        Cmd::Tag { commit, repo } => {
            let repo = repo_or_default(repo);
            let tag = patchops::get_tag(&runner, &commit, &repo)?;
            ui::display_lookup(tag.as_deref(), &format!("No tag found for {}", commit));
        }
        Cmd::NextTag { repo } => {
            let repo = repo_or_default(repo);
            let next = patchops::get_next_tag(&runner, &repo)?;
            let next = next.map(|n| n.to_string());
            ui::display_lookup(next.as_deref(), "No release tags found");
        }
        Cmd::Confirm { commit, repo } => {
            let repo = repo_or_default(repo);
            if patchops::confirm_commit(&runner, &commit, &repo)? {
                ui::display_success(&format!("{} is on the remote", commit));
            } else {
                ui::display_error(&format!("{} exists only in the local repository", commit));
                std::process::exit(1);
            }
        }
        Cmd::Export {
            commit,
            repo,
            force,
            write,
        } => {
            let repo = repo_or_default(repo);
            export(&runner, &config, &commit, &repo, force, write)?;
        }
        Cmd::Diffstat => {
            let mut message = String::new();
            std::io::stdin()
                .read_to_string(&mut message)
                .context("Failed to read patch from stdin")?;
            print!("{}", patchops::get_diffstat(&runner, &message)?);
        }
        Cmd::Url { repo } => {
            let repo = repo_or_default(repo);
            let url = patchops::get_git_repo_url(&runner, &repo)?;
            ui::display_lookup(url.as_deref(), "Remote 'origin' has no URL");
        }
        Cmd::Filename { subject } => {
            println!("{}", patchops::safe_filename(Some(subject.as_str())).unwrap_or_default());
        }
        Cmd::SortTags { mut tags } => {
            patchops::sort_tags(&mut tags);
            for tag in tags {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}

fn export(
    runner: &SystemRunner,
    config: &Config,
    commit: &str,
    repo: &std::path::Path,
    force: bool,
    write: bool,
) -> Result<()> {
    let patch = match patchops::get_commit(runner, commit, repo, force) {
        Ok(Some(patch)) => patch,
        Ok(None) => {
            ui::display_error(&format!("No patch produced for {}", commit));
            std::process::exit(1);
        }
        Err(e @ PatchOpsError::LocalCommit { .. }) => {
            ui::display_error(&e.to_string());
            ui::display_hint("push the commit first, or pass --force to export it anyway");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if !write {
        print!("{}", patch);
        return Ok(());
    }

    let subject = patchops::patch_subject(&patch);
    debug!("Patch subject: {:?}", subject);
    let slug = patchops::patch_file_stem(subject.as_deref(), commit);
    let path = config.export.patch_path(&slug);

    fs::create_dir_all(&config.export.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.export.output_dir.display()
        )
    })?;
    fs::write(&path, &patch).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Exported {} ({} bytes)", commit, patch.len());
    ui::display_success(&format!("Wrote {}", path.display()));
    Ok(())
}
