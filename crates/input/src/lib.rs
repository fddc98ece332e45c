//! Pointer input mapped to camera actions.
//!
//! # Invariants
//! - Camera controls consume actions, never raw window events.
//! - Only one button drives a drag at a time; the first one pressed wins.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerButton, PointerTracker};
