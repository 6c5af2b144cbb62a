use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_forms_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wohngeld_forms::config::AppConfig;
use wohngeld_forms::error::AppError;
use wohngeld_forms::forms::FormFillService;
use wohngeld_forms::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        output_dir: Arc::new(config.forms.output_dir.clone()),
    };

    let service = Arc::new(FormFillService::new(config.forms.clone()));
    let app = with_forms_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        output_dir = %config.forms.output_dir.display(),
        "wohngeld form service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
