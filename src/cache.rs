//! Read side of the shared plot store.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::payload::{PlotIdentifier, PlotPayload};

/// What the widget needs from the store. The widget only reads; writes are
/// the store's business.
pub trait PlotCache {
    /// True once the store has accepted a response for `id`.
    fn is_known(&self, id: &PlotIdentifier) -> bool;

    fn payload(&self, id: &PlotIdentifier) -> Option<&PlotPayload>;
}

/// Snapshot of the `plots` slice of the host store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotsState {
    #[serde(default, rename = "plotIDList")]
    pub plot_id_list: Vec<PlotIdentifier>,
    #[serde(default, rename = "plotData")]
    pub plot_data: HashMap<PlotIdentifier, PlotPayload>,
}

impl PlotsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a successful fetch. Payloads are immutable once written, so a
    /// second response for the same identifier is dropped.
    pub fn record(&mut self, id: PlotIdentifier, payload: PlotPayload) -> bool {
        if self.plot_data.contains_key(&id) {
            warn!(plot = %id, "ignoring second payload for an already cached plot");
            return false;
        }
        if !self.plot_id_list.contains(&id) {
            self.plot_id_list.push(id.clone());
        }
        self.plot_data.insert(id, payload);
        true
    }
}

impl PlotCache for PlotsState {
    fn is_known(&self, id: &PlotIdentifier) -> bool {
        self.plot_id_list.contains(id)
    }

    fn payload(&self, id: &PlotIdentifier) -> Option<&PlotPayload> {
        self.plot_data.get(id)
    }
}
