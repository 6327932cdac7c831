//! Command-line surface.
use std::path::PathBuf;

use clap::{Args, Parser};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotstow",
    about = "Symlink a dotfiles tree into your home directory, stow-style",
    long_about = "Symlink a dotfiles tree into your home directory, stow-style.\n\n\
                  Every first-level directory of the dotfiles root is a project whose \
                  contents are mirrored into the home directory; a project named `etc` \
                  is mirrored into /etc instead.\n\n\
                  WARNING: replace and remove modes delete files and whole directories. \
                  Read the prompts carefully.",
    version
)]
pub struct Cli {
    /// Only symlink files, never whole directories
    #[arg(short, long)]
    pub files: bool,

    /// Copy files instead of linking them (not supported)
    #[arg(short, long)]
    pub copy: bool,

    #[allow(missing_docs, reason = "flattened arg group; documented on its type")]
    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[allow(missing_docs, reason = "flattened arg group; documented on its type")]
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Allow changes outside the home directory (needed when running as root)
    #[arg(long)]
    pub root: bool,

    /// With --replace, only replace targets that are older than their source
    #[arg(long, requires = "replace")]
    pub newer: bool,

    /// Dotfiles root directory (default: $DOTFILES_ROOT or ~/dotfiles)
    #[arg(long, value_name = "DIR")]
    pub dotfiles: Option<PathBuf>,

    /// Home directory to deploy into (default: $HOME)
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

/// How conflicts and confirmations are answered; at most one may be given.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct ConfirmArgs {
    /// Skip any conflicts
    #[arg(short, long)]
    pub skip: bool,

    /// Say yes to all prompts
    #[arg(short = 'Y', long = "YES")]
    pub yes: bool,

    /// Say no to all prompts (dry run)
    #[arg(short = 'N', long = "NO")]
    pub no: bool,
}

/// What to do with existing targets; at most one may be given.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// Remove all existing targets (you will be prompted)
    #[arg(short, long)]
    pub remove: bool,

    /// Replace all existing targets (you will be prompted)
    #[arg(short = 'R', long)]
    pub replace: bool,
}
