//! Scripted arena skirmish.
//!
//! The `arena` binary is the composition root: it loads configuration and
//! templates, builds an [`combat_runtime::Arena`], and hands it to
//! [`run_skirmish`]. Everything printed comes from the event bus through
//! [`presentation::describe`].

pub mod logging;
pub mod presentation;
pub mod skirmish;

pub use presentation::describe;
pub use skirmish::{SkirmishOptions, run_skirmish};
