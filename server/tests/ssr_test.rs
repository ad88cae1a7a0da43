//! SSR integration tests
//!
//! The dashboard must render on the server, with or without a records file.

#![recursion_limit = "512"]
#![allow(clippy::unwrap_used)]

use app::api::DataFile;
use app::components::App;
use axum::{Router, body::Body, http::Request, routing::get};
use http_body_util::BodyExt;
use leptos::context::provide_context;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use std::path::PathBuf;
use tower::util::ServiceExt;

fn shell(options: LeptosOptions) -> impl IntoView {
    use leptos::hydration::{AutoReload, HydrationScripts};
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn setup_test_app(data_file: PathBuf) -> Router<()> {
    let leptos_options = LeptosOptions::builder()
        .output_name("frontend")
        .site_pkg_dir("pkg")
        .site_root("target/site")
        .build();

    let routes = generate_route_list(App);
    let data_file = DataFile(data_file);
    let options_clone = leptos_options.clone();

    Router::new()
        .leptos_routes_with_handler(
            routes,
            get(move |req: Request<Body>| {
                let data_file = data_file.clone();
                let options = options_clone.clone();
                async move {
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(data_file.clone());
                        },
                        move || shell(options.clone()),
                    );
                    handler(req).await
                }
            }),
        )
        .with_state(leptos_options)
}

async fn get_home(app: Router<()>) -> (axum::http::StatusCode, String) {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_dashboard_renders_with_records() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("risk_data.json");
    std::fs::write(
        &data_file,
        r#"{"Kerala": {"coordinates": [10.35, 76.51], "Risk_level": "Low Risk"}}"#,
    )
    .unwrap();

    let (status, body) = get_home(setup_test_app(data_file)).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert!(body.contains("Health Risk Analytics Dashboard"));
    assert!(body.contains("Kerala"));
}

#[tokio::test]
async fn test_dashboard_renders_without_records_file() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_home(setup_test_app(dir.path().join("missing.json"))).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert!(body.contains("Select a City"));
    assert!(body.contains("Select a city to view health data."));
}
