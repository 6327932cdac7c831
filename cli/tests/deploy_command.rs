#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the deploy command.
//!
//! Each test builds a throwaway home directory with a `dotfiles/` repository
//! inside it and runs the full command pipeline against the real filesystem.

mod common;

use std::path::Path;
use std::time::{Duration, SystemTime};

use common::*;
use dotstow_cli::deploy::{PathMapper, TargetState, classify};
use dotstow_cli::error::DeployError;
use dotstow_cli::logging::ProjectStatus;
use dotstow_cli::operations::SystemFileSystemOps;

fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// A: a missing target is linked under `--YES`.
#[test]
fn creates_link_for_absent_target() {
    let fx = Fixture::new();
    let source = fx.source("shell/.bashrc");

    let out = fx.run(&["-Y"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&fx.home.join(".bashrc")), Some(source));
    assert_eq!(out.log.status_of("shell"), Some(ProjectStatus::Ok));
    assert_eq!(out.prompts(), 0);
}

/// B: an existing real file is left alone under `--skip`.
#[test]
fn skip_leaves_existing_file() {
    let fx = Fixture::new();
    fx.source("shell/.bashrc");
    let target = fx.home_file(".bashrc");

    let out = fx.run(&["--skip"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert!(!is_symlink(&target));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "local");
    assert!(out.log.contains("already exists. Skipping..."));
    assert_eq!(out.log.status_of("shell"), Some(ProjectStatus::Skipped));
}

/// C: a broken link is replaced with a fresh one.
#[cfg(unix)]
#[test]
fn broken_link_is_repaired() {
    let fx = Fixture::new();
    let source = fx.source("vim/.vimrc");
    let target = fx.home_link(".vimrc", &fx.home.join("deleted"));

    let out = fx.run(&["-Y"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&target), Some(source));
}

/// C, under `--skip`: broken links are repaired even when conflicts are skipped.
#[cfg(unix)]
#[test]
fn broken_link_is_repaired_under_skip() {
    let fx = Fixture::new();
    let source = fx.source("vim/.vimrc");
    let target = fx.home_link(".vimrc", &fx.home.join("deleted"));

    let out = fx.run(&["-s"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&target), Some(source));
}

/// C, under `--NO`: broken links are only reported.
#[cfg(unix)]
#[test]
fn broken_link_is_only_reported_under_no() {
    let fx = Fixture::new();
    fx.source("vim/.vimrc");
    let dangling = fx.home.join("deleted");
    let target = fx.home_link(".vimrc", &dangling);

    let out = fx.run(&["-N"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&target), Some(dangling));
    assert!(out.log.contains(&format!("DRY unlink {}", target.display())));
    assert_eq!(out.log.status_of("vim"), Some(ProjectStatus::DryRun));
}

/// D: "always no" at a prompt ends the run with no further entries handled.
#[test]
fn always_no_aborts_the_run() {
    let fx = Fixture::new();
    fx.source("a/.bashrc");
    fx.source("b/.profile");
    let dir = fx.home_dir(".bashrc");
    let profile = fx.home_file(".profile");

    let out = fx.run(&["--remove"], ScriptedPrompter::new(&["N"]));

    assert!(matches!(out.result, Err(DeployError::Aborted)));
    assert_eq!(out.exit_code(), 2);
    assert_eq!(out.prompts(), 1);
    assert!(dir.join("keep").exists());
    assert!(profile.exists());
    let question = out.asked.lock().unwrap()[0].clone();
    assert!(question.contains("WARNING: This will delete all contents in the directory"));
}

/// E: an elevated run without `--root` refuses every change.
#[test]
fn elevated_without_root_changes_nothing() {
    let fx = Fixture::new();
    fx.source("shell/.bashrc");
    fx.source("git/.gitconfig");
    let existing = fx.home_file(".gitconfig");

    for args in [&["-Y"][..], &["-Y", "-R"][..], &["-Y", "-r"][..]] {
        let out = fx.run_with(args, true, &SystemFileSystemOps, ScriptedPrompter::none());
        assert_eq!(out.exit_code(), 0, "args {args:?}");
        assert!(out.log.contains("running elevated without --root"));
    }

    assert!(!fx.home.join(".bashrc").exists());
    assert!(!is_symlink(&existing));
}

/// E, with `--root`: elevated runs may act.
#[test]
fn elevated_with_root_acts() {
    let fx = Fixture::new();
    let source = fx.source("shell/.bashrc");

    let out = fx.run_with(
        &["-Y", "--root"],
        true,
        &SystemFileSystemOps,
        ScriptedPrompter::none(),
    );

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&fx.home.join(".bashrc")), Some(source));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn second_run_is_a_no_op() {
    let fx = Fixture::new();
    fx.source("shell/.bashrc");
    fx.source("nvim/.config/nvim/init.lua");
    fx.home_dir(".config");

    let first = fx.run(&["-Y"], ScriptedPrompter::none());
    assert_eq!(first.exit_code(), 0);

    let deny_all = DenyingFs::under(&fx.home);
    let second = fx.run_with(&["-Y"], false, &deny_all, ScriptedPrompter::none());

    assert_eq!(second.exit_code(), 0);
    assert!(
        second
            .log
            .projects()
            .iter()
            .all(|(_, status, _)| *status == ProjectStatus::Ok),
        "{:?}",
        second.log.projects()
    );
}

#[test]
fn mapping_is_deterministic() {
    let fx = Fixture::new();
    let mapper = PathMapper::new(fx.dotfiles.clone(), fx.home.clone(), fx.etc.clone());
    for rel in ["shell/.bashrc", "nvim/.config/nvim/init.lua", "etc/hosts"] {
        let source = fx.dotfiles.join(rel);
        assert_eq!(mapper.map(&source), mapper.map(&source));
    }
    assert_eq!(
        mapper.map(&fx.dotfiles.join("etc/hosts")),
        Some(fx.etc.join("hosts"))
    );
}

#[test]
fn destructive_actions_outside_home_are_refused() {
    let fx = Fixture::new();
    fx.route_etc_to_fixture("");
    fx.source("etc/hosts");
    let hosts = fx.etc.join("hosts");
    std::fs::write(&hosts, "127.0.0.1 localhost").unwrap();

    for args in [&["-Y", "-R"][..], &["-Y", "-r"][..]] {
        let out = fx.run(args, ScriptedPrompter::none());
        assert_eq!(out.exit_code(), 0);
        assert!(out.log.contains("is outside of home folder. Skipping..."));
    }
    assert_eq!(std::fs::read_to_string(&hosts).unwrap(), "127.0.0.1 localhost");
}

#[test]
fn root_aware_allows_destructive_actions_outside_home() {
    let fx = Fixture::new();
    fx.route_etc_to_fixture("");
    let source = fx.source("etc/hosts");
    std::fs::write(fx.etc.join("hosts"), "old").unwrap();

    let out = fx.run(&["-Y", "-R", "--root"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&fx.etc.join("hosts")), Some(source));
}

#[cfg(unix)]
#[test]
fn broken_link_classification_takes_precedence() {
    let fx = Fixture::new();
    let link = fx.home_link(".dangling", &fx.home.join("nowhere"));
    assert_eq!(
        classify(&SystemFileSystemOps, &link).unwrap(),
        TargetState::BrokenSymlink
    );
}

// ---------------------------------------------------------------------------
// Modes and refinements
// ---------------------------------------------------------------------------

#[test]
fn replace_with_prompt_deletes_file_after_yes() {
    let fx = Fixture::new();
    let source = fx.source("shell/.bashrc");
    fx.home_file(".bashrc");

    let out = fx.run(&["-R"], ScriptedPrompter::new(&["y"]));

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&fx.home.join(".bashrc")), Some(source));
    let question = out.asked.lock().unwrap()[0].clone();
    assert!(question.starts_with("Replace '"));
    assert!(question.contains("WARNING: This will delete the target file"));
}

#[test]
fn yes_to_all_stops_prompting() {
    let fx = Fixture::new();
    fx.source("a/.one");
    fx.source("b/.two");
    fx.source("c/.three");

    let out = fx.run(&[], ScriptedPrompter::new(&["Y"]));

    assert_eq!(out.exit_code(), 0);
    assert_eq!(out.prompts(), 1);
    for name in [".one", ".two", ".three"] {
        assert!(is_symlink(&fx.home.join(name)), "{name}");
    }
}

#[test]
fn declined_prompt_skips_only_that_entry() {
    let fx = Fixture::new();
    fx.source("shell/.bashrc");
    fx.source("shell/.profile");

    let out = fx.run(&[], ScriptedPrompter::new(&["n", "y"]));

    assert_eq!(out.exit_code(), 0);
    assert!(!fx.home.join(".bashrc").exists());
    assert!(is_symlink(&fx.home.join(".profile")));
    assert_eq!(out.log.status_of("shell"), Some(ProjectStatus::Skipped));
}

#[cfg(unix)]
#[test]
fn remove_mode_unlinks_deployed_links() {
    let fx = Fixture::new();
    let source = fx.source("shell/.bashrc");
    fx.home_link(".bashrc", &source);

    let out = fx.run(&["-Y", "-r"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert!(!is_symlink(&fx.home.join(".bashrc")));
    assert!(source.exists());
}

#[test]
fn newer_keeps_targets_that_are_not_stale() {
    let fx = Fixture::new();
    let fresh_src = fx.source("a/.fresh");
    let stale_src = fx.source("b/.stale");
    let fresh = fx.home_file(".fresh");
    let stale = fx.home_file(".stale");
    let now = SystemTime::now();
    set_mtime(&fresh_src, now - Duration::from_secs(3600));
    set_mtime(&fresh, now);
    set_mtime(&stale_src, now);
    set_mtime(&stale, now - Duration::from_secs(3600));

    let out = fx.run(&["-Y", "-R", "--newer"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert!(!is_symlink(&fresh));
    assert_eq!(link_of(&stale), Some(stale_src));
}

#[test]
fn files_setting_from_repository_file() {
    let fx = Fixture::new();
    fx.route_etc_to_fixture("files = true\n");
    let init = fx.source("nvim/.config/nvim/init.lua");

    let out = fx.run(&["-Y"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert!(!is_symlink(&fx.home.join(".config")));
    assert!(!is_symlink(&fx.home.join(".config/nvim")));
    assert_eq!(link_of(&fx.home.join(".config/nvim/init.lua")), Some(init));
}

#[test]
fn extra_ignore_names_are_pruned() {
    let fx = Fixture::new();
    fx.route_etc_to_fixture("ignore = [\"scripts\"]\n");
    fx.source("scripts/install.sh");
    fx.source("shell/.bashrc");

    let out = fx.run(&["-Y"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert!(!fx.home.join("install.sh").exists());
    assert_eq!(out.log.status_of("scripts"), Some(ProjectStatus::NotApplicable));
}

#[test]
fn permission_denied_is_reported_and_run_continues() {
    let fx = Fixture::new();
    fx.source("a/.locked/config");
    let bashrc = fx.source("b/.bashrc");
    let fs = DenyingFs::under(fx.home.join(".locked"));

    let out = fx.run_with(&["-Y"], false, &fs, ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(out.log.status_of("a"), Some(ProjectStatus::Failed));
    assert_eq!(link_of(&fx.home.join(".bashrc")), Some(bashrc));
    assert!(out.log.contains("ERROR Permission denied when attempting to access"));
}

#[test]
fn invalid_repository_file_is_a_config_error() {
    let fx = Fixture::new();
    std::fs::write(fx.dotfiles.join("dotstow.toml"), "files = \"yes\"").unwrap();

    let out = fx.run(&["-Y"], ScriptedPrompter::none());

    assert!(matches!(out.result, Err(DeployError::Config(_))));
    assert_eq!(out.exit_code(), 1);
}

#[cfg(unix)]
#[test]
fn files_mode_skips_directory_whose_target_links_to_a_file() {
    let fx = Fixture::new();
    fx.source("nvim/.config/nvim/init.lua");
    let settings = fx.home_file("settings");
    let config = fx.home_link(".config", &settings);

    let out = fx.run(&["-Y", "-f"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&config), Some(settings));
    assert!(out.log.contains(&format!(
        "WARN '{}' is not a directory, cannot link files into it. Skipping...",
        config.display()
    )));
    assert_eq!(out.log.status_of("nvim"), Some(ProjectStatus::Skipped));
}

#[cfg(unix)]
#[test]
fn files_mode_links_self_referencing_source_link_once() {
    let fx = Fixture::new();
    fx.source("shell/.bashrc");
    let looping = fx.dotfiles.join("shell/.loop");
    std::os::unix::fs::symlink(fx.dotfiles.join("shell"), &looping).unwrap();

    let out = fx.run(&["-Y", "-f"], ScriptedPrompter::none());

    assert_eq!(out.exit_code(), 0);
    assert_eq!(link_of(&fx.home.join(".loop")), Some(looping));
    assert_eq!(out.log.status_of("shell"), Some(ProjectStatus::Ok));
}
