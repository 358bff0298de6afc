//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;
pub use state_builders::seed_example_data;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use marketplace::Trace;
#[cfg(debug_assertions)]
use marketplace::doc::ApiDoc;
use marketplace::inbound::http::admin::{best_clients, best_profession};
use marketplace::inbound::http::balances::deposit;
use marketplace::inbound::http::contracts::{get_contract, list_all_contracts, list_contracts};
use marketplace::inbound::http::health::{HealthState, live, ready};
use marketplace::inbound::http::jobs::{list_all_jobs, list_unpaid_jobs, pay_for_job};
use marketplace::inbound::http::profiles::list_profiles;
use marketplace::inbound::http::state::HttpState;
use marketplace::inbound::http::validation::{json_config, query_config};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
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
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(get_contract)
        .service(list_contracts)
        .service(list_all_contracts)
        .service(list_unpaid_jobs)
        .service(pay_for_job)
        .service(list_all_jobs)
        .service(deposit)
        .service(best_profession)
        .service(best_clients)
        .service(list_profiles)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] naming the bind address and store.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    use super::{
        AppDependencies, HealthState, ServerConfig, build_app, build_http_state,
        seed_example_data, web,
    };

    #[rstest]
    #[actix_web::test]
    async fn app_serves_seeded_store_with_trace_header() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
        seed_example_data(&config).await.expect("seed");
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(AppDependencies {
            health_state: health,
            http_state: build_http_state(&config),
        }))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/allContracts").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));

        let ready = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn undecodable_query_is_a_json_error() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
        let app = test::init_service(build_app(AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config),
        }))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin/best-clients?start=2020-08-01&end=2020-08-31&limit=x")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.headers().contains_key("trace-id"));
    }
}
