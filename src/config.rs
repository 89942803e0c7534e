use serde::{Deserialize, Serialize};
use tracing::warn;

/// Names and messages the widget uses when talking to the page and the
/// plotting engine. Defaults match what BokehJS expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Class on the outer scaffold element.
    #[serde(default = "default_root_class")]
    pub root_class: String,
    /// Class on the inner element that carries the render target id.
    #[serde(default = "default_plot_class")]
    pub plot_class: String,
    /// Global name the engine's runtime handle is published under.
    #[serde(default = "default_runtime_name")]
    pub runtime_name: String,
    /// Token custom model code uses to refer to its module scope.
    #[serde(default = "default_self_reference")]
    pub self_reference: String,
    /// Name the rewritten code sees the runtime binding under.
    #[serde(default = "default_binding_name")]
    pub binding_name: String,

    #[serde(default = "default_error_message")]
    pub error_message: String,
    #[serde(default = "default_loading_message")]
    pub loading_message: String,
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

fn default_root_class() -> String {
    "bk-root".to_string()
}

fn default_plot_class() -> String {
    "bk-plotdiv".to_string()
}

fn default_runtime_name() -> String {
    "Bokeh".to_string()
}

fn default_self_reference() -> String {
    "this".to_string()
}

fn default_binding_name() -> String {
    "root".to_string()
}

fn default_error_message() -> String {
    "Error: Could not fetch plotting data".to_string()
}

fn default_loading_message() -> String {
    "Please wait while we load your plotting data...".to_string()
}

fn default_empty_message() -> String {
    "No data to plot.".to_string()
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            root_class: default_root_class(),
            plot_class: default_plot_class(),
            runtime_name: default_runtime_name(),
            self_reference: default_self_reference(),
            binding_name: default_binding_name(),
            error_message: default_error_message(),
            loading_message: default_loading_message(),
            empty_message: default_empty_message(),
        }
    }
}

impl PlotConfig {
    /// Defaults, then `PLOTVIEW_*` overrides from the environment.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // PLOTVIEW_ROOT_CLASS=bk-root
        override_name(&mut self.root_class, "PLOTVIEW_ROOT_CLASS", &lookup);
        // PLOTVIEW_PLOT_CLASS=bk-plotdiv
        override_name(&mut self.plot_class, "PLOTVIEW_PLOT_CLASS", &lookup);
        // PLOTVIEW_RUNTIME_NAME=Bokeh
        override_name(&mut self.runtime_name, "PLOTVIEW_RUNTIME_NAME", &lookup);
    }
}

fn override_name(slot: &mut String, key: &str, lookup: &impl Fn(&str) -> Option<String>) {
    let Some(v) = lookup(key) else {
        return;
    };
    let v = v.trim();
    if v.is_empty() || v.chars().any(char::is_whitespace) {
        warn!("Ignoring {}={:?}: expected a single non-empty name", key, v);
        return;
    }
    *slot = v.to_string();
}
