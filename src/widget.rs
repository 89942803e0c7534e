//! The plot widget: props, per-instance fetch bookkeeping, and the display
//! state derived fresh from the store on every cycle.

use tracing::trace;

use crate::cache::PlotCache;
use crate::config::PlotConfig;
use crate::controller::{CycleOutcome, FetchController};
use crate::dispatch::Dispatch;
use crate::payload::{PlotIdentifier, PlotPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotProps {
    pub url: PlotIdentifier,
    pub class_name: String,
}

impl PlotProps {
    pub fn new(url: impl Into<PlotIdentifier>) -> Self {
        Self {
            url: url.into(),
            class_name: String::new(),
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

/// What the widget shows right now. Never stored; see [`PlotWidget::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState<'a> {
    Error,
    Loading,
    Empty,
    Ready(&'a PlotPayload),
}

impl<'a> WidgetState<'a> {
    pub fn classify(error: bool, payload: Option<&'a PlotPayload>) -> Self {
        if error {
            return WidgetState::Error;
        }
        match payload {
            None => WidgetState::Loading,
            Some(p) if !p.has_document() => WidgetState::Empty,
            Some(p) => WidgetState::Ready(p),
        }
    }

    /// Inline message for the non-plot states.
    pub fn placeholder<'c>(self, cfg: &'c PlotConfig) -> Option<&'c str> {
        match self {
            WidgetState::Error => Some(&cfg.error_message),
            WidgetState::Loading => Some(&cfg.loading_message),
            WidgetState::Empty => Some(&cfg.empty_message),
            WidgetState::Ready(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WidgetState::Error => "error",
            WidgetState::Loading => "loading",
            WidgetState::Empty => "empty",
            WidgetState::Ready(_) => "ready",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotWidget {
    props: PlotProps,
    controller: FetchController,
    // Nothing sets this yet; a fetch-failure hook would.
    error: bool,
}

impl PlotWidget {
    pub fn new(props: PlotProps) -> Self {
        Self {
            props,
            controller: FetchController::new(),
            error: false,
        }
    }

    pub fn props(&self) -> &PlotProps {
        &self.props
    }

    pub fn url(&self) -> &PlotIdentifier {
        &self.props.url
    }

    pub fn controller(&self) -> &FetchController {
        &self.controller
    }

    /// Point the widget at another plot. Earlier pending entries are kept.
    pub fn set_url(&mut self, url: impl Into<PlotIdentifier>) {
        self.props.url = url.into();
    }

    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    /// One observation cycle: reconcile fetch bookkeeping, then derive.
    pub fn cycle<'c, C, D>(&mut self, cache: &'c C, dispatch: &mut D) -> (CycleOutcome, WidgetState<'c>)
    where
        C: PlotCache + ?Sized,
        D: Dispatch + ?Sized,
    {
        let outcome = self.controller.observe(&self.props.url, cache, dispatch);
        (outcome, self.state(cache))
    }

    pub fn state<'c, C>(&self, cache: &'c C) -> WidgetState<'c>
    where
        C: PlotCache + ?Sized,
    {
        let state = WidgetState::classify(self.error, cache.payload(&self.props.url));
        trace!(plot = %self.props.url, state = state.label(), "derived widget state");
        state
    }
}
