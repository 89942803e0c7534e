use plotview::bridge::ScriptSandbox;
use plotview::error::{BridgeError, BridgeResult};
use plotview::script::{PreparedScript, RuntimeBinding};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::bokeh::{js_error, BokehRuntime};

/// Runs custom model code in the page's global scope.
///
/// The runtime is published on `window` for code that expects it there, and
/// the script's binding is passed in as a function parameter. This is not
/// isolation: the code can reach anything the page can. Only feed it code
/// from the plot backend.
#[derive(Debug, Default)]
pub struct WindowSandbox;

impl WindowSandbox {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptSandbox<BokehRuntime> for WindowSandbox {
    fn publish(&mut self, runtime_name: &str, handle: &BokehRuntime) -> BridgeResult<()> {
        js_sys::Reflect::set(&js_sys::global(), &JsValue::from_str(runtime_name), handle)
            .map(|_| ())
            .map_err(|e| BridgeError::Script(js_error(&e)))
    }

    fn evaluate(&mut self, script: &PreparedScript, binding: &RuntimeBinding<BokehRuntime>) -> BridgeResult<()> {
        let scope = js_sys::Object::new();
        js_sys::Reflect::set(&scope, &JsValue::from_str(&binding.runtime_name), &binding.handle)
            .map_err(|e| BridgeError::Script(js_error(&e)))?;

        let wrapped = format!("(function({}) {{\n{}\n}})", binding.name, script.source);
        let func = js_sys::eval(&wrapped)
            .map_err(|e| BridgeError::Script(js_error(&e)))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| BridgeError::Script("custom model wrapper is not a function".to_string()))?;

        func.call1(&JsValue::UNDEFINED, &scope)
            .map(|_| ())
            .map_err(|e| BridgeError::Script(js_error(&e)))
    }
}
