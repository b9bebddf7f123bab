//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use calibration_tracker::Trace;
#[cfg(debug_assertions)]
use calibration_tracker::doc::ApiDoc;
use calibration_tracker::inbound::http::deadlines::{dashboard, list_deadlines};
use calibration_tracker::inbound::http::devices::{
    create_device, device_history, form_defaults, get_device, list_departments, list_devices,
    record_completion,
};
use calibration_tracker::inbound::http::error::{json_config, path_config, query_config};
use calibration_tracker::inbound::http::health::{HealthState, live, ready};
use calibration_tracker::inbound::http::imports::{preview_import, run_import};
use calibration_tracker::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    upload_limit_bytes: usize,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        upload_limit_bytes,
    } = deps;

    // Static device routes precede `/devices/{id}` so they are not captured
    // by the identifier segment.
    let api = web::scope("/api/v1")
        .app_data(web::PayloadConfig::new(upload_limit_bytes))
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(list_devices)
        .service(create_device)
        .service(list_departments)
        .service(form_defaults)
        .service(get_device)
        .service(device_history)
        .service(record_completion)
        .service(dashboard)
        .service(list_deadlines)
        .service(preview_import)
        .service(run_import);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let upload_limit_bytes = config.upload_limit_bytes;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            upload_limit_bytes,
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
