//! # plotview
//!
//! Display widget for server-produced plots.
//!
//! Given a plot identifier the widget asks the host store for the plot's
//! payload exactly once per instance, shows a placeholder while it waits,
//! and once the payload lands hands it to the plotting engine through a
//! small DOM scaffold.
//!
//! ## Quick Start
//!
//! ```
//! use plotview::prelude::*;
//!
//! let cfg = PlotConfig::default();
//! let mut store = PlotsState::new();
//! let mut widget = PlotWidget::new(PlotProps::new("/api/sources/ZTF18abc/plot"));
//! let mut requests = Vec::new();
//!
//! // First cycle: nothing cached, one fetch goes out.
//! let (_, state) = widget.cycle(&store, &mut |r: FetchRequest| requests.push(r));
//! assert_eq!(state, WidgetState::Loading);
//!
//! // The host store fills in; the next cycle is ready to render.
//! store.record(
//!     requests[0].id.clone(),
//!     PlotPayload {
//!         docs_json: "{}".into(),
//!         render_items: r#"[{"elementid":"p1"}]"#.into(),
//!         custom_model_js: String::new(),
//!     },
//! );
//! let (_, state) = widget.cycle(&store, &mut |r: FetchRequest| requests.push(r));
//! if let WidgetState::Ready(payload) = state {
//!     let engine = HeadlessEngine::new("bokeh");
//!     let mut sandbox = InertSandbox::new();
//!     let mut anchor = MemoryAnchor::new();
//!     RenderBridge::new(&engine, &mut sandbox, &cfg)
//!         .render_payload(&mut anchor, payload)
//!         .unwrap();
//! }
//! assert_eq!(requests.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`controller`]: per-instance fetch deduplication
//! - [`widget`]: props and derived display state
//! - [`bridge`]: handoff to the plotting engine
//! - [`headless`]: in-memory adapters for the bridge

pub mod bridge;
pub mod cache;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod headless;
pub mod payload;
pub mod pending;
pub mod script;
pub mod widget;

pub mod prelude {
    pub use crate::bridge::{PlotAnchor, PlottingEngine, RenderBridge, Scaffold, ScriptSandbox};
    pub use crate::cache::{PlotCache, PlotsState};
    pub use crate::config::PlotConfig;
    pub use crate::controller::{CycleOutcome, FetchController};
    pub use crate::dispatch::{Dispatch, FetchKind, FetchRequest};
    pub use crate::error::{BridgeError, BridgeResult};
    pub use crate::headless::{HeadlessEngine, InertSandbox, MemoryAnchor};
    pub use crate::payload::{PlotDocument, PlotIdentifier, PlotPayload, RenderManifest};
    pub use crate::script::{PreparedScript, RuntimeBinding};
    pub use crate::widget::{PlotProps, PlotWidget, WidgetState};
}
