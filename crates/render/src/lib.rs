//! Rendering adapter: renderer-agnostic interface and the frame loop.
//!
//! # Invariants
//! - Renderers read the diorama; they never mutate it.
//! - One tick samples the clock once and writes that value to every `time`
//!   uniform before anything is drawn.
//! - The loop never reschedules itself; the host calls `tick` on each
//!   display refresh.

mod frame_loop;
mod renderer;

pub use frame_loop::FrameLoop;
pub use renderer::{Renderer, TextRenderer};
