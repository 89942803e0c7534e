//! Custom model code shipped alongside a plot.
//!
//! The backend compiles extension models into a standalone snippet written
//! as the top level of its own module: it reaches the plotting runtime
//! through its self-reference (`this.Bokeh`). Before evaluation the first
//! self-reference is renamed to a binding the sandbox provides, so the
//! snippet finds the runtime without any module wrapper.
//!
//! The snippet is trusted backend output. It is not inspected or sanitized;
//! whatever sandbox evaluates it decides what it can touch.

use serde::{Deserialize, Serialize};

use crate::config::PlotConfig;

/// Custom model source ready for evaluation with `binding` in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedScript {
    pub binding: String,
    pub source: String,
}

impl PreparedScript {
    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// Rewrites the first occurrence of `cfg.self_reference` to `cfg.binding_name`.
pub fn prepare_custom_model(source: &str, cfg: &PlotConfig) -> PreparedScript {
    PreparedScript {
        binding: cfg.binding_name.clone(),
        source: source.replacen(&cfg.self_reference, &cfg.binding_name, 1),
    }
}

/// The object a prepared script sees under its binding name: the runtime
/// handle, keyed by the name the engine publishes it under.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeBinding<H> {
    pub name: String,
    pub runtime_name: String,
    pub handle: H,
}
