//! Developer tooling for the diorama.
//!
//! The debug panel owns the editable values; the diorama's uniforms only ever
//! receive copies, pushed when an edit is applied.

pub mod panel;

pub use panel::{DebugEdit, DebugOption, DebugPanel, DebugValues};
