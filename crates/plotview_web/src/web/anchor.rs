use plotview::bridge::{PlotAnchor, Scaffold};
use plotview::error::{BridgeError, BridgeResult};

use super::bokeh::js_error;

/// A live page element used as the plot anchor.
pub struct ElementAnchor {
    el: web_sys::Element,
}

impl ElementAnchor {
    pub fn new(el: web_sys::Element) -> Self {
        Self { el }
    }

    fn create_div(&self, class: &str) -> BridgeResult<web_sys::Element> {
        let doc = self
            .el
            .owner_document()
            .ok_or_else(|| BridgeError::Dom("anchor is not in a document".to_string()))?;
        let div = doc
            .create_element("div")
            .map_err(|e| BridgeError::Dom(js_error(&e)))?;
        div.set_attribute("class", class)
            .map_err(|e| BridgeError::Dom(js_error(&e)))?;
        Ok(div)
    }
}

impl PlotAnchor for ElementAnchor {
    fn clear_children(&mut self) -> BridgeResult<()> {
        while let Some(child) = self.el.last_child() {
            self.el
                .remove_child(&child)
                .map_err(|e| BridgeError::Dom(js_error(&e)))?;
        }
        Ok(())
    }

    fn append_scaffold(&mut self, scaffold: &Scaffold) -> BridgeResult<()> {
        let outer = self.create_div(&scaffold.root_class)?;
        let inner = self.create_div(&scaffold.plot_class)?;
        inner
            .set_attribute("id", &scaffold.element_id)
            .map_err(|e| BridgeError::Dom(js_error(&e)))?;

        outer
            .append_child(&inner)
            .map_err(|e| BridgeError::Dom(js_error(&e)))?;
        self.el
            .append_child(&outer)
            .map_err(|e| BridgeError::Dom(js_error(&e)))?;
        Ok(())
    }
}
