use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::PlotIdentifier;

/// Which kind of plot a fetch is for. Only source plots exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchKind {
    #[serde(rename = "FETCH_SOURCE_PLOT")]
    SourcePlot,
}

impl FetchKind {
    pub fn tag(self) -> &'static str {
        match self {
            FetchKind::SourcePlot => "FETCH_SOURCE_PLOT",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub id: PlotIdentifier,
    pub kind: FetchKind,
}

impl FetchRequest {
    pub fn source_plot(id: PlotIdentifier) -> Self {
        Self {
            id,
            kind: FetchKind::SourcePlot,
        }
    }
}

/// Fire-and-forget sink for fetch requests. Completion shows up later as a
/// cache change, never as a return value.
pub trait Dispatch {
    fn dispatch(&mut self, request: FetchRequest);
}

impl<F> Dispatch for F
where
    F: FnMut(FetchRequest),
{
    fn dispatch(&mut self, request: FetchRequest) {
        self(request)
    }
}
