use plotview::bridge::PlottingEngine;
use plotview::error::{BridgeError, BridgeResult};
use plotview::payload::{PlotDocument, RenderManifest};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// The `Bokeh` object BokehJS installs on the page.
    #[derive(Clone, Debug)]
    pub type BokehRuntime;

    #[wasm_bindgen(method, catch)]
    fn safely(this: &BokehRuntime, f: &mut dyn FnMut() -> Result<(), JsValue>) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter)]
    fn embed(this: &BokehRuntime) -> BokehEmbed;

    type BokehEmbed;

    #[wasm_bindgen(method, catch)]
    fn embed_items(this: &BokehEmbed, docs_json: &JsValue, render_items: &JsValue) -> Result<JsValue, JsValue>;
}

pub(super) fn js_error(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{e:?}")
}

fn to_js(value: &impl serde::Serialize) -> BridgeResult<JsValue> {
    let raw = serde_json::to_string(value).map_err(|e| BridgeError::Embed(format!("serialize: {e}")))?;
    js_sys::JSON::parse(&raw).map_err(|e| BridgeError::Embed(js_error(&e)))
}

/// Engine backed by the page's BokehJS runtime.
pub struct BokehEngine {
    runtime: BokehRuntime,
}

impl BokehEngine {
    pub fn new(runtime: BokehRuntime) -> Self {
        Self { runtime }
    }

    /// Looks the runtime up under `name` on the global object.
    pub fn from_global(name: &str) -> BridgeResult<Self> {
        let v = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
            .map_err(|e| BridgeError::Embed(js_error(&e)))?;
        if v.is_undefined() || v.is_null() {
            return Err(BridgeError::Embed(format!("{name} is not loaded on this page")));
        }
        Ok(Self::new(v.unchecked_into()))
    }
}

impl PlottingEngine for BokehEngine {
    type Handle = BokehRuntime;

    fn runtime_handle(&self) -> BokehRuntime {
        self.runtime.clone()
    }

    fn safely(&self, f: &mut dyn FnMut() -> BridgeResult<()>) -> BridgeResult<()> {
        // Errors are rethrown into JS so Bokeh's guard sees them.
        let mut guarded = || f().map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())));
        self.runtime
            .safely(&mut guarded)
            .map_err(|e| BridgeError::Embed(js_error(&e)))
    }

    fn embed_items(&self, document: &PlotDocument, manifest: &RenderManifest) -> BridgeResult<()> {
        let docs = to_js(document)?;
        let items = to_js(manifest)?;
        self.runtime
            .embed()
            .embed_items(&docs, &items)
            .map(|_| ())
            .map_err(|e| BridgeError::Embed(js_error(&e)))
    }
}
