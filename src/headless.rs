//! Page-less adapters for the render bridge: an in-memory element tree, an
//! engine that records what it was asked to embed, and a sandbox that keeps
//! scripts instead of running them.

use std::cell::{Ref, RefCell};
use std::fmt::Write as _;

use tracing::{error, warn};

use crate::bridge::{PlotAnchor, PlottingEngine, Scaffold, ScriptSandbox};
use crate::error::{BridgeError, BridgeResult};
use crate::payload::{PlotDocument, RenderManifest};
use crate::script::{PreparedScript, RuntimeBinding};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNode {
    pub tag: String,
    pub class: Option<String>,
    pub id: Option<String>,
    pub text: Option<String>,
    pub children: Vec<MemoryNode>,
}

impl MemoryNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: MemoryNode) -> Self {
        self.children.push(child);
        self
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        let _ = write!(out, "{pad}<{}", self.tag);
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{class}\"");
        }
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{id}\"");
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        if !self.children.is_empty() {
            out.push('\n');
            for c in &self.children {
                c.write_html(out, depth + 1);
            }
            out.push_str(&pad);
        }
        let _ = writeln!(out, "</{}>", self.tag);
    }
}

/// Anchor backed by an in-memory child list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAnchor {
    children: Vec<MemoryNode>,
}

impl MemoryAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<MemoryNode>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[MemoryNode] {
        &self.children
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            c.write_html(&mut out, 0);
        }
        out
    }
}

impl PlotAnchor for MemoryAnchor {
    fn clear_children(&mut self) -> BridgeResult<()> {
        self.children.clear();
        Ok(())
    }

    fn append_scaffold(&mut self, scaffold: &Scaffold) -> BridgeResult<()> {
        let inner = MemoryNode::element("div")
            .with_class(scaffold.plot_class.clone())
            .with_id(scaffold.element_id.clone());
        let outer = MemoryNode::element("div")
            .with_class(scaffold.root_class.clone())
            .with_child(inner);
        self.children.push(outer);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedCall {
    pub document: PlotDocument,
    pub manifest: RenderManifest,
}

/// Engine stand-in that records embed calls. Its `safely` guard logs and
/// records a failure, then passes it on to the caller.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    handle: String,
    fail_embeds: bool,
    embeds: RefCell<Vec<EmbedCall>>,
    guarded_failures: RefCell<Vec<String>>,
}

impl HeadlessEngine {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Default::default()
        }
    }

    /// Every embed call errors instead of recording.
    pub fn failing_embeds(mut self) -> Self {
        self.fail_embeds = true;
        self
    }

    pub fn embeds(&self) -> Ref<'_, Vec<EmbedCall>> {
        self.embeds.borrow()
    }

    pub fn guarded_failures(&self) -> Ref<'_, Vec<String>> {
        self.guarded_failures.borrow()
    }
}

impl PlottingEngine for HeadlessEngine {
    type Handle = String;

    fn runtime_handle(&self) -> String {
        self.handle.clone()
    }

    fn safely(&self, f: &mut dyn FnMut() -> BridgeResult<()>) -> BridgeResult<()> {
        f().inspect_err(|e| {
            error!("{}", e);
            self.guarded_failures.borrow_mut().push(e.to_string());
        })
    }

    fn embed_items(&self, document: &PlotDocument, manifest: &RenderManifest) -> BridgeResult<()> {
        if self.fail_embeds {
            return Err(BridgeError::Embed("headless engine configured to fail".to_string()));
        }
        self.embeds.borrow_mut().push(EmbedCall {
            document: document.clone(),
            manifest: manifest.clone(),
        });
        Ok(())
    }
}

/// Sandbox with no capabilities: it keeps what it is given and runs nothing.
#[derive(Debug)]
pub struct InertSandbox<H> {
    reject: bool,
    published: Vec<(String, H)>,
    scripts: Vec<(PreparedScript, RuntimeBinding<H>)>,
}

impl<H> Default for InertSandbox<H> {
    fn default() -> Self {
        Self {
            reject: false,
            published: Vec::new(),
            scripts: Vec::new(),
        }
    }
}

impl<H> InertSandbox<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses every script with [`BridgeError::Script`].
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> &[(String, H)] {
        &self.published
    }

    pub fn scripts(&self) -> &[(PreparedScript, RuntimeBinding<H>)] {
        &self.scripts
    }
}

impl<H: Clone> ScriptSandbox<H> for InertSandbox<H> {
    fn publish(&mut self, runtime_name: &str, handle: &H) -> BridgeResult<()> {
        self.published.push((runtime_name.to_string(), handle.clone()));
        Ok(())
    }

    fn evaluate(&mut self, script: &PreparedScript, binding: &RuntimeBinding<H>) -> BridgeResult<()> {
        if self.reject {
            return Err(BridgeError::Script("sandbox does not execute code".to_string()));
        }
        warn!(bytes = script.source.len(), "custom model code kept, not executed");
        self.scripts.push((script.clone(), binding.clone()));
        Ok(())
    }
}
