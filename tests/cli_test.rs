// tests/cli_test.rs
use std::process::Command;

fn patchops(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_patchops"))
        .args(args)
        .env_remove("PATCHOPS_CONFIG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_lists_subcommands() {
    let output = patchops(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("patchops"));
    for sub in ["tag", "next-tag", "confirm", "export", "diffstat", "url", "filename"] {
        assert!(stdout.contains(sub), "help should mention {}", sub);
    }
}

#[test]
fn test_filename_subcommand() {
    let output = patchops(&["filename", "[PATCH 1/3] Fix foo|bar (urgent)"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "fix-foo_bar-urgent\n");
}

#[test]
fn test_sort_tags_subcommand() {
    let output = patchops(&["sort-tags", "v1.2.0", "v1.2-rc1", "v1.1.9"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "v1.1.9\nv1.2-rc1\nv1.2.0\n"
    );
}

#[test]
fn test_missing_config_file_fails() {
    let output = patchops(&["--config", "/nonexistent/patchops.toml", "filename", "x"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Configuration error"));
}
