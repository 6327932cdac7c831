//! The deploy command: resolve directories, load settings and walk the tree.
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::{self, ConfirmPolicy, Mode, RunConfig, file};
use crate::deploy::{Boundary, ConfirmationGate, Prompter, TerminalPrompter, TreeWalker};
use crate::error::DeployError;
use crate::logging::{Log, Logger};
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::style::Line;

/// Environment variables the command consults.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Value of the platform home variable (`HOME` or `USERPROFILE`).
    pub home: Option<OsString>,
    /// Value of `DOTFILES_ROOT`.
    pub dotfiles_root: Option<OsString>,
}

impl Environment {
    /// Read the variables from the current process.
    #[must_use]
    pub fn from_process(platform: &Platform) -> Self {
        Self {
            home: std::env::var_os(platform.home_var()),
            dotfiles_root: std::env::var_os("DOTFILES_ROOT"),
        }
    }
}

/// Run the deploy command against the real filesystem and terminal.
///
/// Prints the per-project summary whether or not the run completes.
///
/// # Errors
///
/// Returns an error if configuration fails, the operator aborts, or an
/// unrecoverable filesystem error occurs.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let platform = Platform::detect();
    let env = Environment::from_process(&platform);
    let prompter = Box::new(TerminalPrompter::stdio(log.color()));

    let version = option_env!("DOTSTOW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("dotstow {version} on {}", platform.os));

    let result = deploy(cli, &env, &platform, &SystemFileSystemOps, prompter, log);
    log.print_summary();
    result?;

    let failed = log.failure_count();
    if failed > 0 {
        log.warn(&format!(
            "{failed} project(s) had entries that could not be changed"
        ));
    }
    Ok(())
}

/// Resolve configuration from `cli` and `env`, then deploy every project.
///
/// # Errors
///
/// Returns [`DeployError::Config`] for an unusable home or dotfiles
/// directory, a bad `dotstow.toml` or an unsupported flag;
/// [`DeployError::Aborted`] when the operator stops the run; and I/O or
/// execution errors the walker cannot recover from.
pub fn deploy(
    cli: &Cli,
    env: &Environment,
    platform: &Platform,
    fs: &dyn FileSystemOps,
    mut prompter: Box<dyn Prompter>,
    log: &dyn Log,
) -> Result<(), DeployError> {
    let mut home = config::resolve_home(cli.home.as_deref(), env.home.clone())?;
    if platform.elevated && cli.home.is_none() {
        home = confirm_home(home, prompter.as_mut())?;
    }
    let home = config::require_dir(&home)?;

    let dotfiles = config::resolve_dotfiles_root(
        cli.dotfiles.as_deref(),
        env.dotfiles_root.clone(),
        &home,
    );
    let dotfiles = config::require_dir(&dotfiles)?;
    let settings = file::load(&dotfiles.join(file::FILE_NAME))?;
    let config = RunConfig::build(cli, dotfiles, home, settings)?;

    log.stage(&format!("Deploying {}", config.dotfiles_root.display()));
    log.info(&format!(
        "home: {}, mode: {}, confirm: {}",
        config.home.display(),
        mode_name(config.mode),
        policy_name(config.confirm)
    ));
    if platform.elevated && !config.root_aware {
        log.warn("running elevated without --root: nothing will be changed");
    }

    let boundary = Boundary::new(config.home.clone(), config.root_aware, platform.elevated);
    let gate = ConfirmationGate::new(config.confirm, boundary, prompter);
    TreeWalker::new(&config, fs, gate, log).run()
}

/// Ask the operator to accept `detected` or type another home directory.
fn confirm_home(detected: PathBuf, prompter: &mut dyn Prompter) -> Result<PathBuf, DeployError> {
    let question = [
        Line::new()
            .warning("Running with elevated privileges. ")
            .plain("Home directory is ")
            .quoted(detected.display())
            .plain("."),
        Line::new().plain("Press enter to accept or type another path: "),
    ];
    let reply = prompter
        .ask(&question)
        .map_err(|source| DeployError::Io {
            path: detected.clone(),
            source,
        })?
        .ok_or(DeployError::Aborted)?;

    let reply = reply.trim();
    if reply.is_empty() {
        Ok(detected)
    } else {
        Ok(PathBuf::from(reply))
    }
}

const fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "link",
        Mode::Remove => "remove",
        Mode::Replace => "replace",
    }
}

const fn policy_name(policy: ConfirmPolicy) -> &'static str {
    match policy {
        ConfirmPolicy::Prompt => "prompt",
        ConfirmPolicy::AutoYes => "yes to all",
        ConfirmPolicy::AutoNo => "dry run",
        ConfirmPolicy::AutoSkip => "skip conflicts",
    }
}
