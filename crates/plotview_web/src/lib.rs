//! Browser-hosted plot widget.
//!
//! This crate is a stub by default so the workspace builds on native targets
//! without a wasm toolchain.
//!
//! Enable the real widget with: `--features web` (and a wasm32 target). The
//! host page must load BokehJS (and its widget bundle) before the first plot
//! becomes ready.

/// Placeholder function for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{render_into, BokehEngine, BokehRuntime, ElementAnchor, Plot, WindowSandbox};
