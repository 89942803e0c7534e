//! One-shot handoff of a parsed plot to the plotting engine.
//!
//! The bridge owns no page state. The anchor, the engine and the script
//! sandbox are all passed in, so the same sequence drives a real browser
//! page and the headless adapters in [`crate::headless`]:
//!
//! 1. wipe the anchor's children;
//! 2. append a two-level scaffold (`root_class` > `plot_class#elementid`);
//! 3. publish the engine's runtime handle through the sandbox;
//! 4. evaluate the custom model code with the runtime bound in scope;
//! 5. inside the engine's `safely` wrapper, embed the document.
//!
//! Nothing here catches errors. The engine's `safely` wrapper sees failures
//! from step 5 first and decides whether they continue to the caller.

use tracing::{info, trace};

use crate::config::PlotConfig;
use crate::error::BridgeResult;
use crate::payload::{PlotDocument, PlotPayload, RenderManifest};
use crate::script::{prepare_custom_model, PreparedScript, RuntimeBinding};

/// The element tree the engine draws into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub root_class: String,
    pub plot_class: String,
    pub element_id: String,
}

impl Scaffold {
    pub fn new(cfg: &PlotConfig, element_id: impl Into<String>) -> Self {
        Self {
            root_class: cfg.root_class.clone(),
            plot_class: cfg.plot_class.clone(),
            element_id: element_id.into(),
        }
    }
}

/// A page node the widget owns exclusively while attached.
pub trait PlotAnchor {
    fn clear_children(&mut self) -> BridgeResult<()>;

    fn append_scaffold(&mut self, scaffold: &Scaffold) -> BridgeResult<()>;
}

/// The external plotting engine.
pub trait PlottingEngine {
    type Handle: Clone;

    fn runtime_handle(&self) -> Self::Handle;

    /// Runs `f` under the engine's own error guard.
    fn safely(&self, f: &mut dyn FnMut() -> BridgeResult<()>) -> BridgeResult<()>;

    fn embed_items(&self, document: &PlotDocument, manifest: &RenderManifest) -> BridgeResult<()>;
}

/// Where custom model code runs. Implementations choose what the code can
/// reach; the bridge hands over the source as-is.
pub trait ScriptSandbox<H> {
    /// Make `handle` resolvable under `runtime_name` for code that expects an
    /// ambient runtime.
    fn publish(&mut self, runtime_name: &str, handle: &H) -> BridgeResult<()>;

    fn evaluate(&mut self, script: &PreparedScript, binding: &RuntimeBinding<H>) -> BridgeResult<()>;
}

pub struct RenderBridge<'a, E, S> {
    engine: &'a E,
    sandbox: &'a mut S,
    cfg: &'a PlotConfig,
}

impl<'a, E, S> RenderBridge<'a, E, S>
where
    E: PlottingEngine,
    S: ScriptSandbox<E::Handle>,
{
    pub fn new(engine: &'a E, sandbox: &'a mut S, cfg: &'a PlotConfig) -> Self {
        Self {
            engine,
            sandbox,
            cfg,
        }
    }

    /// Parses the payload, then renders it. Malformed fields fail before the
    /// anchor is touched.
    pub fn render_payload<A>(&mut self, anchor: &mut A, payload: &PlotPayload) -> BridgeResult<()>
    where
        A: PlotAnchor + ?Sized,
    {
        let document = payload.parse_document()?;
        let manifest = payload.parse_manifest()?;
        self.render(anchor, &document, &manifest, &payload.custom_model_js)
    }

    pub fn render<A>(
        &mut self,
        anchor: &mut A,
        document: &PlotDocument,
        manifest: &RenderManifest,
        custom_model_js: &str,
    ) -> BridgeResult<()>
    where
        A: PlotAnchor + ?Sized,
    {
        // An empty manifest or a first item without an id fails here, before
        // the anchor is wiped.
        let scaffold = Scaffold::new(self.cfg, manifest.first_element_id()?);

        anchor.clear_children()?;
        anchor.append_scaffold(&scaffold)?;

        let handle = self.engine.runtime_handle();
        self.sandbox.publish(&self.cfg.runtime_name, &handle)?;

        let script = prepare_custom_model(custom_model_js, self.cfg);
        if script.is_empty() {
            trace!("no custom model code");
        } else {
            let binding = RuntimeBinding {
                name: script.binding.clone(),
                runtime_name: self.cfg.runtime_name.clone(),
                handle,
            };
            self.sandbox.evaluate(&script, &binding)?;
        }

        let engine = self.engine;
        engine.safely(&mut || engine.embed_items(document, manifest))?;

        info!(element = %scaffold.element_id, items = manifest.items().len(), "plot embedded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::headless::{HeadlessEngine, InertSandbox, MemoryAnchor, MemoryNode};

    fn payload() -> PlotPayload {
        PlotPayload {
            docs_json: r#"{"d1":{"roots":{"references":[{"id":"1001","type":"Plot"}]}}}"#.to_string(),
            render_items: r#"[{"docid":"d1","elementid":"e-42","roots":{"1001":"e-42"}},{"docid":"d1","elementid":"e-43"}]"#
                .to_string(),
            custom_model_js: "(function(root){ root.Bokeh.register_plugin({}); })(this);".to_string(),
        }
    }

    fn stale_anchor() -> MemoryAnchor {
        MemoryAnchor::with_children(vec![
            MemoryNode::element("p").with_text("old"),
            MemoryNode::element("span"),
            MemoryNode::element("div").with_class("leftover"),
        ])
    }

    #[test]
    fn render_replaces_prior_children_with_one_scaffold() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh-3.4");
        let mut sandbox = InertSandbox::new();
        let mut anchor = stale_anchor();

        RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &payload())
            .unwrap();

        assert_eq!(anchor.children().len(), 1);
        let root = &anchor.children()[0];
        assert_eq!(root.class.as_deref(), Some("bk-root"));
        assert_eq!(root.children.len(), 1);
        let inner = &root.children[0];
        assert_eq!(inner.class.as_deref(), Some("bk-plotdiv"));
        assert_eq!(inner.id.as_deref(), Some("e-42"));
    }

    #[test]
    fn rerender_on_same_anchor_does_not_duplicate() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::new();
        let mut anchor = stale_anchor();

        let mut bridge = RenderBridge::new(&engine, &mut sandbox, &cfg);
        bridge.render_payload(&mut anchor, &payload()).unwrap();
        bridge.render_payload(&mut anchor, &payload()).unwrap();

        assert_eq!(anchor.children().len(), 1);
        assert_eq!(anchor.children()[0].children.len(), 1);
        assert_eq!(engine.embeds().len(), 2);
    }

    #[test]
    fn runtime_is_published_and_script_runs_before_embed() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh-3.4");
        let mut sandbox = InertSandbox::new();
        let mut anchor = MemoryAnchor::new();

        RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &payload())
            .unwrap();

        assert_eq!(sandbox.published(), &[("Bokeh".to_string(), "bokeh-3.4".to_string())]);
        assert_eq!(sandbox.scripts().len(), 1);
        let (script, binding) = &sandbox.scripts()[0];
        assert_eq!(script.source, "(function(root){ root.Bokeh.register_plugin({}); })(root);");
        assert_eq!(binding.name, "root");
        assert_eq!(binding.runtime_name, "Bokeh");
        assert_eq!(binding.handle, "bokeh-3.4");
        assert_eq!(engine.embeds().len(), 1);
    }

    #[test]
    fn embed_receives_exactly_the_serialized_structure() {
        let docs = serde_json::json!({"d1": {"roots": {"references": [{"id": "7", "attributes": {"x": [1, 2, 3]}}]}}});
        let items = serde_json::json!([{"docid": "d1", "elementid": "el", "notebook_comms_target": null}]);
        let payload = PlotPayload {
            docs_json: serde_json::to_string(&docs).unwrap(),
            render_items: serde_json::to_string(&items).unwrap(),
            custom_model_js: String::new(),
        };

        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::new();
        RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut MemoryAnchor::new(), &payload)
            .unwrap();

        let embeds = engine.embeds();
        assert_eq!(embeds[0].document.0, docs);
        assert_eq!(serde_json::to_value(&embeds[0].manifest).unwrap(), items);
        assert!(sandbox.scripts().is_empty());
    }

    #[test]
    fn empty_manifest_fails_without_touching_the_anchor() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::new();
        let mut anchor = stale_anchor();
        let p = PlotPayload {
            docs_json: "{}".to_string(),
            render_items: "[]".to_string(),
            custom_model_js: String::new(),
        };

        let err = RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &p)
            .unwrap_err();

        assert!(matches!(err, BridgeError::EmptyManifest));
        assert_eq!(anchor.children().len(), 3);
        assert!(engine.embeds().is_empty());
    }

    #[test]
    fn later_items_without_element_id_are_embedded_as_given() {
        let items = serde_json::json!([
            {"docid": "d1", "elementid": "e-1"},
            {"docid": "d1", "roots": {"1": "x"}}
        ]);
        let p = PlotPayload {
            render_items: serde_json::to_string(&items).unwrap(),
            ..payload()
        };

        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::new();
        let mut anchor = MemoryAnchor::new();
        RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &p)
            .unwrap();

        assert_eq!(anchor.children()[0].children[0].id.as_deref(), Some("e-1"));
        assert_eq!(serde_json::to_value(&engine.embeds()[0].manifest).unwrap(), items);
    }

    #[test]
    fn malformed_document_fails_before_any_side_effect() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::new();
        let mut anchor = stale_anchor();
        let p = PlotPayload {
            docs_json: "{\"d1\":".to_string(),
            ..payload()
        };

        let err = RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &p)
            .unwrap_err();

        assert!(matches!(err, BridgeError::MalformedDocument(_)));
        assert_eq!(anchor.children().len(), 3);
        assert!(sandbox.published().is_empty());
    }

    #[test]
    fn script_failure_propagates_and_skips_embed() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh");
        let mut sandbox = InertSandbox::rejecting();
        let mut anchor = MemoryAnchor::new();

        let err = RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &payload())
            .unwrap_err();

        assert!(matches!(err, BridgeError::Script(_)));
        // Scaffold and publication already happened.
        assert_eq!(anchor.children().len(), 1);
        assert_eq!(sandbox.published().len(), 1);
        assert!(engine.embeds().is_empty());
    }

    #[test]
    fn engine_guard_reports_and_rethrows_embed_failures() {
        let cfg = PlotConfig::default();
        let engine = HeadlessEngine::new("bokeh").failing_embeds();
        let mut sandbox = InertSandbox::new();
        let mut anchor = MemoryAnchor::new();

        let err = RenderBridge::new(&engine, &mut sandbox, &cfg)
            .render_payload(&mut anchor, &payload())
            .unwrap_err();

        assert!(matches!(err, BridgeError::Embed(_)));
        assert!(engine.embeds().is_empty());
        assert_eq!(engine.guarded_failures().len(), 1);
        assert_eq!(anchor.children().len(), 1);
    }
}
