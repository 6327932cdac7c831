//! Stow-style dotfile deployment.
//!
//! Mirrors a dotfiles tree into the home directory with symbolic links.
//! Every first-level directory of the dotfiles root is a project; its
//! contents are linked into home (or `/etc` for the `etc` project), and
//! every existing target is resolved under an explicit confirmation policy.
//!
//! The crate is organised into these layers:
//!
//! - **[`cli`]** and **[`config`]**: flags, `dotstow.toml` and the immutable run configuration
//! - **[`deploy`]**: the engine (mapping, classification, confirmation, execution, traversal)
//! - **[`operations`]**: the filesystem capability the engine mutates through
//! - **[`commands`]**: top-level orchestration
//! - **[`logging`]** and **[`style`]**: console and log-file output
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod style;
