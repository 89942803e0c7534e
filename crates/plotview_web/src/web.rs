use leptos::html::Div;
use leptos::prelude::*;
use plotview::prelude::*;
use tracing::error;
use wasm_bindgen::JsCast;

mod anchor;
mod bokeh;
mod sandbox;

pub use anchor::ElementAnchor;
pub use bokeh::{BokehEngine, BokehRuntime};
pub use sandbox::WindowSandbox;

/// What the component shows, owned so it can live in a memo.
#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Message { text: String, italic: bool },
    Ready(PlotPayload),
}

impl Shown {
    fn derive(state: WidgetState<'_>, cfg: &PlotConfig) -> Self {
        match state {
            WidgetState::Ready(p) => Shown::Ready(p.clone()),
            other => Shown::Message {
                text: other.placeholder(cfg).unwrap_or_default().to_string(),
                italic: other == WidgetState::Empty,
            },
        }
    }
}

/// Renders `payload` into `el` with the page's BokehJS runtime.
pub fn render_into(el: web_sys::Element, payload: &PlotPayload, cfg: &PlotConfig) -> BridgeResult<()> {
    let engine = BokehEngine::from_global(&cfg.runtime_name)?;
    let mut sandbox = WindowSandbox::new();
    let mut anchor = ElementAnchor::new(el);
    RenderBridge::new(&engine, &mut sandbox, cfg).render_payload(&mut anchor, payload)
}

/// A server-produced plot.
///
/// `plots` is the host store's plot slice; `dispatch` receives fetch
/// requests and is expected to fill `plots` in later.
#[component]
pub fn Plot(
    #[prop(into)] url: Signal<String>,
    #[prop(optional, into)] class_name: String,
    plots: Signal<PlotsState>,
    dispatch: Callback<FetchRequest>,
    #[prop(optional)] config: Option<PlotConfig>,
) -> impl IntoView {
    let cfg = StoredValue::new(config.unwrap_or_default());
    let widget = StoredValue::new(PlotWidget::new(
        PlotProps::new(url.get_untracked()).with_class_name(class_name.clone()),
    ));

    // Observation cycle: runs on mount and whenever the url or the store changes.
    Effect::new(move |_| {
        let id = url.get();
        let mut requests = Vec::new();
        plots.with(|store| {
            widget.update_value(|w| {
                w.set_url(id);
                w.cycle(store, &mut |r: FetchRequest| requests.push(r));
            });
        });
        // Dispatch outside the read so the store may update synchronously.
        for r in requests {
            dispatch.run(r);
        }
    });

    let shown = Memo::new(move |_| {
        let id = PlotIdentifier::new(url.get());
        let error = widget.with_value(|w| w.has_error());
        plots.with(|store| {
            cfg.with_value(|cfg| Shown::derive(WidgetState::classify(error, store.payload(&id)), cfg))
        })
    });

    let anchor_ref = NodeRef::<Div>::new();

    Effect::new(move |_| {
        let Some(div) = anchor_ref.get() else {
            return;
        };
        let Shown::Ready(payload) = shown.get() else {
            return;
        };
        let el = div.unchecked_into::<web_sys::Element>();
        if let Err(e) = cfg.with_value(|cfg| render_into(el, &payload, cfg)) {
            error!("plot render failed: {}", e);
        }
    });

    view! {
        {move || match shown.get() {
            Shown::Message { text, italic: false } => view! { <b>{text}</b> }.into_any(),
            Shown::Message { text, italic: true } => view! { <b><i>{text}</i></b> }.into_any(),
            Shown::Ready(_) => {
                view! { <div class=class_name.clone() node_ref=anchor_ref></div> }.into_any()
            }
        }}
    }
}
