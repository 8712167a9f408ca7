use anyhow::Context;
use mapdash::prelude::*;

/// Headless dashboard client: loads places and events, applies an optional
/// search, and reports what the map and list panel would show.
///
/// Usage: `mapdash-app [config.json] [search text]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mapdash::init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            DashboardConfig::from_json_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => DashboardProfile::default().resolve(),
    };
    let search = args.next();

    let backend = HttpBackend::new(config.backend.clone())?;
    let mut dashboard = Dashboard::new(config, backend, RecordingCanvas::new());

    let report = dashboard
        .load()
        .await
        .context("loading places and events")?;
    log::info!(
        "{} markers rendered, {} entities without coordinates",
        report.created.len(),
        report.skipped.len()
    );

    if let Some(text) = search {
        dashboard.sync_mut().set_search(text);
    }

    let sync = dashboard.sync();
    for entity in sync.list_view() {
        let marker = match sync.registry().get(&entity.key()) {
            Some(handle) => handle.id().to_string(),
            None => "-".to_string(),
        };
        println!("{:<12} {:<10} {}", entity.key().to_string(), marker, entity.name);
    }
    if let Some(bounds) = sync.registry().bounds() {
        println!("markers span {} .. {}", bounds.south_west, bounds.north_east);
    }

    Ok(())
}
