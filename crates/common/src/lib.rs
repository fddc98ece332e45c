//! Shared value types used across the diorama crates.
//!
//! Nothing here touches the GPU or the window system; the types are plain
//! data so the kernel, asset pipeline, and renderers can agree on them.

pub mod color;
pub mod types;

pub use color::{ColorParseError, Rgb};
pub use types::{LoadedModel, LoadedNode, MeshData, TextureData};
