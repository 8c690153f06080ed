//! # Tableau
//!
//! Seeds the stock catalog, composes the demo scene and prints a report.

use anyhow::Context;
use clap::Parser;
use tableau_cli::{CliArgs, CliConfig, Report, Stage};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tableau_cache=debug,tableau_core=debug";

/// Install the subscriber. Output goes to stderr so stdout only carries the
/// report; `RUST_LOG_FORMAT=json` selects structured lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();
}

fn print_report(report: &Report) {
    let summary = &report.scene;
    println!("Scene {} ({})", summary.scene_id, summary.name);
    println!(
        "  layers: {} (background {}, character {}, ui {})",
        summary.layer_count, summary.background_count, summary.character_count, summary.ui_count
    );
    for layer in &report.layers {
        println!(
            "  {:>4}  {:<16} at ({:.0}, {:.0}) {}x{}{}",
            layer.z_index,
            layer.asset_id,
            layer.x,
            layer.y,
            layer.width,
            layer.height,
            if layer.visible { "" } else { " hidden" }
        );
    }

    if report.validation.valid {
        println!("Validation: ok");
    } else {
        println!("Validation: {} issue(s)", report.validation.issues.len());
        for message in report.validation.messages() {
            println!("  - {message}");
        }
    }

    let cache = &report.cache;
    println!(
        "Cache: {}/{} resident, {} fetches, {} hits, {} coalesced, {} failures, {} evictions, {} bytes",
        cache.size,
        cache.capacity,
        cache.fetches,
        cache.hits,
        cache.coalesced,
        cache.failures,
        cache.evictions,
        cache.bytes_loaded
    );
    println!("  resident: {}", cache.asset_ids.join(", "));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CliConfig::from(CliArgs::parse());
    tracing::info!(
        "Canvas {}x{}, cache capacity {}",
        config.width,
        config.height,
        config.capacity
    );

    let mut stage = Stage::new(&config);
    let report = stage
        .run(&config)
        .await
        .context("Failed to compose demo scene")?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
