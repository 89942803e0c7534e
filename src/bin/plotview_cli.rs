//! Headless driver for the plot widget.
//!
//! Loads a plot payload from a JSON file, runs the widget's observation
//! cycles against an in-memory store, then renders into an in-memory anchor
//! and prints what the page would contain.
//!
//! Examples:
//!   plotview-cli payload.json
//!   plotview-cli --id /api/sources/ZTF18abc/plot payload.json
//!   plotview-cli --config plot_config.json payload.json
//!
//! Log verbosity follows RUST_LOG (default: info).

use std::path::Path;
use std::process;

use plotview::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    id: Option<String>,
    config: Option<String>,
    payload: String,
}

fn usage() -> ! {
    eprintln!("plotview-cli (renders a plot payload headlessly)");
    eprintln!("Usage: plotview-cli [--id <identifier>] [--config <config.json>] <payload.json>\n");
    eprintln!("Options:");
    eprintln!("  --id <identifier>     Plot identifier (default: payload path)");
    eprintln!("  --config <file>       PlotConfig JSON (default: PLOTVIEW_* env overrides)");
    process::exit(1);
}

fn parse_args() -> Args {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut id = None;
    let mut config = None;

    while args.len() >= 2 && args[0].starts_with("--") {
        match args[0].as_str() {
            "--id" => id = Some(args[1].clone()),
            "--config" => config = Some(args[1].clone()),
            _ => usage(),
        }
        args.drain(0..2);
    }

    if args.len() != 1 {
        usage();
    }

    Args {
        id,
        config,
        payload: args.remove(0),
    }
}

fn load_config(path: Option<&str>) -> Result<PlotConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(PlotConfig::from_env()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();
    let cfg = load_config(args.config.as_deref())?;

    let raw = std::fs::read_to_string(Path::new(&args.payload))?;
    let payload: PlotPayload = serde_json::from_str(&raw)?;
    let id = PlotIdentifier::new(args.id.unwrap_or_else(|| args.payload.clone()));

    let mut store = PlotsState::new();
    let mut widget = PlotWidget::new(PlotProps::new(id));
    let mut requests: Vec<FetchRequest> = Vec::new();

    let (_, state) = widget.cycle(&store, &mut |r: FetchRequest| requests.push(r));
    println!("[{}] {}", state.label(), state.placeholder(&cfg).unwrap_or_default());

    // Stand-in for the transport: every request is answered with the file.
    for req in requests.drain(..) {
        info!(plot = %req.id, kind = %req.kind, "answering fetch from file");
        store.record(req.id, payload.clone());
    }

    let (outcome, state) = widget.cycle(&store, &mut |r: FetchRequest| requests.push(r));
    debug_assert!(!outcome.requested);

    match state {
        WidgetState::Ready(p) => {
            let engine = HeadlessEngine::new(cfg.runtime_name.clone());
            let mut sandbox = InertSandbox::new();
            let mut anchor = MemoryAnchor::new();
            RenderBridge::new(&engine, &mut sandbox, &cfg).render_payload(&mut anchor, p)?;

            println!("[ready]");
            print!("{}", anchor.to_html());
            for call in engine.embeds().iter() {
                println!(
                    "embed_items: {} document key(s), {} render item(s)",
                    call.document.0.as_object().map_or(0, |o| o.len()),
                    call.manifest.items().len()
                );
            }
            for (script, _) in sandbox.scripts() {
                println!("custom model code ({} bytes) bound to `{}`", script.source.len(), script.binding);
            }
        }
        other => {
            println!("[{}] {}", other.label(), other.placeholder(&cfg).unwrap_or_default());
        }
    }

    Ok(())
}
