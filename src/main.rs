use qa_tracker_page::{
    ControllerConfig, DomEvent, HttpTransport, PageController, load_page, persist_page,
    resolve_page_path,
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let events: Vec<_> = env::args()
        .skip(1)
        .filter_map(|arg| match arg.parse::<DomEvent>() {
            Ok(event) => Some(event),
            Err(err) => {
                error!("skipping argument: {err}");
                None
            }
        })
        .collect();

    let config = ControllerConfig::from_env();
    let page_path = resolve_page_path();
    let mut doc = load_page(&page_path).await;

    info!("driving {} against {}", doc.location, config.base_url);
    let transport = HttpTransport::new(config.base_url.clone());
    let controller = PageController::new(config, transport);

    for state in controller.on_load(&mut doc) {
        info!("{}: {} rows, empty state {:?}", state.region, state.rows, state.empty_state);
    }

    let failed = controller
        .replay(&mut doc, &events)
        .await
        .iter()
        .filter(|result| result.is_err())
        .count();
    if failed > 0 {
        error!("{failed} of {} events failed", events.len());
    }

    persist_page(&page_path, &doc).await?;
    info!("page saved to {}", page_path.display());

    Ok(())
}
