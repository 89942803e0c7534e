//! Per-instance fetch deduplication.
//!
//! Each observation cycle (mount, identifier change, store change) runs two
//! independent checks against the current identifier:
//!
//! 1. not known to the store and not pending → dispatch one source-plot fetch
//!    and mark the identifier pending;
//! 2. payload present and still pending → forget it.
//!
//! There is no retry and no timeout. An identifier whose fetch never lands
//! stays pending until the instance is dropped.

use tracing::debug;

use crate::cache::PlotCache;
use crate::dispatch::{Dispatch, FetchRequest};
use crate::payload::PlotIdentifier;
use crate::pending::PendingSet;

/// What one cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub requested: bool,
    pub resolved: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FetchController {
    pending: PendingSet,
}

impl FetchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    pub fn is_pending(&self, id: &PlotIdentifier) -> bool {
        self.pending.contains(id)
    }

    pub fn needs_fetch<C: PlotCache + ?Sized>(&self, id: &PlotIdentifier, cache: &C) -> bool {
        !cache.is_known(id) && !self.pending.contains(id)
    }

    pub fn observe<C, D>(&mut self, id: &PlotIdentifier, cache: &C, dispatch: &mut D) -> CycleOutcome
    where
        C: PlotCache + ?Sized,
        D: Dispatch + ?Sized,
    {
        let mut outcome = CycleOutcome::default();
        // Both checks see the pending set as it was when the cycle began.
        let was_pending = self.pending.contains(id);

        if self.needs_fetch(id, cache) {
            debug!(plot = %id, "requesting plot data");
            dispatch.dispatch(FetchRequest::source_plot(id.clone()));
            self.pending.insert(id.clone());
            outcome.requested = true;
        }

        if was_pending && cache.payload(id).is_some() {
            self.pending.remove(id);
            debug!(plot = %id, "plot data arrived");
            outcome.resolved = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PlotsState;
    use crate::dispatch::FetchKind;
    use crate::payload::PlotPayload;

    fn payload() -> PlotPayload {
        PlotPayload {
            docs_json: "{}".to_string(),
            render_items: r#"[{"elementid":"e"}]"#.to_string(),
            custom_model_js: String::new(),
        }
    }

    #[test]
    fn first_cycle_dispatches_once_and_marks_pending() {
        let store = PlotsState::new();
        let mut ctl = FetchController::new();
        let mut sent = Vec::new();
        let id = PlotIdentifier::from("abc");

        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));

        assert!(out.requested);
        assert!(!out.resolved);
        assert_eq!(sent, vec![FetchRequest { id: id.clone(), kind: FetchKind::SourcePlot }]);
        assert!(ctl.is_pending(&id));
    }

    #[test]
    fn pending_identifier_is_not_requested_again() {
        let store = PlotsState::new();
        let mut ctl = FetchController::new();
        let mut sent = Vec::new();
        let id = PlotIdentifier::from("abc");

        for _ in 0..5 {
            ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        }

        assert_eq!(sent.len(), 1);
        assert_eq!(ctl.pending().len(), 1);
    }

    #[test]
    fn arrival_clears_pending_without_refetching() {
        let mut store = PlotsState::new();
        let mut ctl = FetchController::new();
        let mut sent = Vec::new();
        let id = PlotIdentifier::from("abc");

        ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        store.record(id.clone(), payload());

        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        assert!(!out.requested);
        assert!(out.resolved);
        assert!(ctl.pending().is_empty());

        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        assert_eq!(out, CycleOutcome::default());
        assert_eq!(sent.len(), 1);
    }

    #[test]
    fn cached_identifier_is_never_requested() {
        let mut store = PlotsState::new();
        let id = PlotIdentifier::from("cached");
        store.record(id.clone(), payload());

        let mut ctl = FetchController::new();
        let mut sent = Vec::new();
        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));

        assert_eq!(out, CycleOutcome::default());
        assert!(sent.is_empty());
        assert!(!ctl.is_pending(&id));
    }

    #[test]
    fn switching_identifier_keeps_the_old_one_pending() {
        let store = PlotsState::new();
        let mut ctl = FetchController::new();
        let mut sent = Vec::new();
        let a = PlotIdentifier::from("a");
        let b = PlotIdentifier::from("b");

        ctl.observe(&a, &store, &mut |r: FetchRequest| sent.push(r));
        ctl.observe(&b, &store, &mut |r: FetchRequest| sent.push(r));
        ctl.observe(&a, &store, &mut |r: FetchRequest| sent.push(r));

        assert_eq!(sent.len(), 2);
        assert!(ctl.is_pending(&a));
        assert!(ctl.is_pending(&b));
    }

    #[test]
    fn payload_without_listing_resolves_on_the_following_cycle() {
        let mut store = PlotsState::new();
        let id = PlotIdentifier::from("unlisted");
        store.plot_data.insert(id.clone(), payload());

        let mut ctl = FetchController::new();
        let mut sent = Vec::new();

        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        assert_eq!(out, CycleOutcome { requested: true, resolved: false });

        let out = ctl.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        assert_eq!(out, CycleOutcome { requested: false, resolved: true });
        assert_eq!(sent.len(), 1);
    }

    #[test]
    fn separate_instances_do_not_share_dedup() {
        let store = PlotsState::new();
        let mut first = FetchController::new();
        let mut second = FetchController::new();
        let mut sent = Vec::new();
        let id = PlotIdentifier::from("shared");

        first.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));
        second.observe(&id, &store, &mut |r: FetchRequest| sent.push(r));

        assert_eq!(sent.len(), 2);
    }
}
