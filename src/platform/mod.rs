//! Platform abstraction layer
//!
//! Browser implementations of the seams the settings logic runs against:
//! - Storage (LocalStorage)
//! - Document attributes, input controls and the color scheme query
//! - The settings overlay owned by page script
//!
//! Native builds use `MemoryStore` and `HeadlessPage` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;
