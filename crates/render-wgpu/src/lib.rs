//! wgpu render backend for the portal diorama.
//!
//! Draws the baked scene, the pole lamps, the animated portal and the
//! firefly particles into an offscreen target at drawing-buffer resolution,
//! then blits it to the window surface.
//!
//! # Invariants
//! - The renderer never mutates the diorama.
//! - Colors are written unconverted. The offscreen target is `Rgba8Unorm`;
//!   sRGB surfaces get a decoding blit so stored values survive presentation.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
