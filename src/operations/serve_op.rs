use crate::app_config::ApplicationConfig;
use crate::core::camera_manager::CameraRegistry;
use crate::operations::op_helper;
use crate::server::{self, ServerState};
use anyhow::{Context, Result};
use log::{info, warn};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

/// Probes cameras, starts their pipelines and serves the feeds until Ctrl-C.
/// On shutdown every camera is released. Feeds still open on their own
/// connection tasks end when the runtime shuts down after this returns.
pub async fn handle_serve(config: &ApplicationConfig) -> Result<()> {
    let output_dir = op_helper::prepare_output_directory(config)?;
    info!("💾 Recording segments to {}", output_dir.display());

    let provider = op_helper::build_device_provider(config);
    let sink_factory = op_helper::build_sink_factory(config)?;
    let settings = config.pipeline_settings(output_dir);
    let probe_limit = config.capture.probe_limit;
    let max_cameras = config.capture.max_cameras;

    let probe_start = Instant::now();
    let registry = tokio::task::spawn_blocking(move || {
        CameraRegistry::probe(provider.as_ref(), sink_factory, &settings, probe_limit, max_cameras)
    })
    .await
    .context("Camera probe task failed")?;
    let registry = Arc::new(registry);
    if registry.is_empty() {
        warn!("⚠️ No cameras could be opened after {:?}; serving an empty index.", probe_start.elapsed());
    } else {
        info!("🚀 {} camera pipeline(s) running: {:?}", registry.len(), registry.display_ids());
    }

    let app = server::create_router(ServerState {
        registry: Arc::clone(&registry),
        fps: config.capture.fps,
        jpeg_quality: config.stream.jpeg_quality,
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", config.server.bind_address))?;
    info!("🌐 Serving camera feeds on http://{}", listener.local_addr()?);

    // Feeds never end on their own, so there is no graceful drain. Dropping
    // the serve future stops the accept loop only; spawned connections keep
    // running until the runtime is torn down.
    let serve_result = tokio::select! {
        res = axum::serve(listener, app).into_future() => res.context("HTTP server failed"),
        res = tokio::signal::ctrl_c() => {
            res.context("Failed to listen for Ctrl-C").map(|()| info!("🛑 Shutdown requested"))
        }
    };

    let releasing = Arc::clone(&registry);
    tokio::task::spawn_blocking(move || releasing.release_all())
        .await
        .context("Camera release task failed")?;
    info!("✅ All cameras released");
    serve_result
}
