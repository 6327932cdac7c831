//! The deployment engine.
//!
//! For every entry under the dotfiles root the [`TreeWalker`] runs one
//! pipeline: [`PathMapper`] computes the target, [`classify`] inspects it,
//! [`plan`] picks an [`Action`], the [`ConfirmationGate`] authorizes it and
//! [`execute`] applies it.
pub mod action;
pub mod classify;
pub mod executor;
pub mod gate;
pub mod mapper;
pub mod prompt;
pub mod stats;
pub mod walker;

pub use action::{Action, PathPair, SkipReason, plan};
pub use classify::{Recency, TargetState, already_linked, classify, recency};
pub use executor::execute;
pub use gate::{Boundary, ConfirmationGate};
pub use mapper::PathMapper;
pub use prompt::{Answer, Prompter, TerminalPrompter};
pub use stats::ProjectStats;
pub use walker::TreeWalker;
