//! Axum application setup.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Datasets and their lifecycle
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets/:id", delete(handlers::remove_dataset))
        .route("/datasets/:id/toggle", post(handlers::toggle_dataset))
        .route("/datasets/:id/tags", post(handlers::add_tag))
        .route("/datasets/:id/tags/:tag", delete(handlers::remove_tag))
        // Per-dataset views
        .route("/datasets/:id/view", get(handlers::get_view))
        .route("/datasets/:id/filters", get(handlers::get_filter_options))
        .route("/datasets/:id/filter", post(handlers::set_filter))
        .route("/datasets/:id/sort", post(handlers::set_sort))
        .route("/datasets/:id/page", post(handlers::set_page))
        .route("/datasets/:id/page-size", post(handlers::set_page_size))
        // Groups
        .route("/groups", get(handlers::get_groups))
        .route("/inactive", get(handlers::get_inactive));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use reportdeck::Deck;

    fn test_router() -> Router {
        let mut deck = Deck::new();
        deck.ingest_sources([
            (
                "orders.csv",
                "region,status,owner\neast,open,kim\nwest,closed,lee\neast,closed,ann\n",
            ),
            ("costs.csv", "region,total\neast,4\n"),
        ])
        .unwrap();
        create_router(AppState::new(deck))
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_list_datasets() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/datasets", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["orders.csv", "costs.csv"]);
        assert_eq!(body[0]["active"], json!(true));
    }

    #[tokio::test]
    async fn test_unknown_dataset_view_is_404() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/datasets/nope.csv/view", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_filter_then_sort() {
        let router = test_router();

        let (_, body) = send(
            &router,
            "POST",
            "/api/datasets/orders.csv/filter",
            Some(json!({"header": "region", "value": "east"})),
        )
        .await;
        assert_eq!(body["changed"], json!(true));
        assert_eq!(body["view"]["rows"].as_array().unwrap().len(), 2);

        send(
            &router,
            "POST",
            "/api/datasets/orders.csv/sort",
            Some(json!({"header": "owner"})),
        )
        .await;

        let (status, view) = send(&router, "GET", "/api/datasets/orders.csv/view", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["rows"][0][2], "ann");
        assert_eq!(view["rows"][1][2], "kim");
        assert_eq!(view["sort"]["direction"], "asc");
        assert_eq!(view["showing"]["total"], json!(2));
    }

    #[tokio::test]
    async fn test_page_size_all_and_page_rejection() {
        let router = test_router();

        let (_, body) = send(
            &router,
            "POST",
            "/api/datasets/orders.csv/page-size",
            Some(json!({"page_size": "All"})),
        )
        .await;
        assert_eq!(body["view"]["page_size"], "All");
        assert_eq!(
            body["view"]["page_size_options"],
            json!([20, 50, 100, 1000, "All"])
        );
        assert_eq!(body["view"]["total_pages"], json!(1));

        let (_, body) = send(
            &router,
            "POST",
            "/api/datasets/orders.csv/page",
            Some(json!({"page": 2})),
        )
        .await;
        assert_eq!(body["changed"], json!(false));
        assert_eq!(body["view"]["current_page"], json!(1));
    }

    #[tokio::test]
    async fn test_mutation_on_unknown_dataset_is_noop() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/api/datasets/nope.csv/sort",
            Some(json!({"header": "region"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], json!(false));
        assert_eq!(body["view"], Value::Null);
    }

    #[tokio::test]
    async fn test_tag_groups_and_inactive() {
        let router = test_router();

        send(
            &router,
            "POST",
            "/api/datasets/costs.csv/tags",
            Some(json!({"tag": "Q"})),
        )
        .await;
        let (_, groups) = send(&router, "GET", "/api/groups?mode=tags", None).await;
        let titles: Vec<&str> = groups
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Untagged", "Q"]);

        let (_, body) = send(&router, "POST", "/api/datasets/costs.csv/toggle", None).await;
        assert_eq!(body["dataset"]["active"], json!(false));

        let (_, inactive) = send(&router, "GET", "/api/inactive", None).await;
        assert_eq!(inactive[0]["id"], "costs.csv");
        assert_eq!(inactive[0]["tags"], json!(["Q"]));

        let (_, groups) = send(&router, "GET", "/api/groups?mode=tags", None).await;
        assert_eq!(groups.as_array().unwrap().len(), 1);

        let (_, body) = send(&router, "DELETE", "/api/datasets/costs.csv/tags/Q", None).await;
        assert_eq!(body["dataset"]["tags"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_group_mode_is_400() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/groups?mode=week", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "deck_error");
    }

    #[tokio::test]
    async fn test_filter_options_and_remove() {
        let router = test_router();

        let (_, options) = send(&router, "GET", "/api/datasets/orders.csv/filters", None).await;
        assert_eq!(options["region"], json!(["east", "west"]));

        let (_, body) = send(&router, "DELETE", "/api/datasets/orders.csv", None).await;
        assert_eq!(body["removed"], json!(true));

        let (status, _) = send(&router, "GET", "/api/datasets/orders.csv/filters", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
