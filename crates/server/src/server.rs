use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{categories, orders, report};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/report/stock-summary", get(report::stock_summary))
        .route("/order/grades", get(orders::grades))
        .route("/order/sync", post(orders::sync))
        .route("/category/list", get(categories::list))
        .route("/category/sync", post(categories::sync))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use engine::{
        Category, Direction, GradedItem, RequestedCategory, SubCategory, Transaction,
        TransactionParties,
    };
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn seeded_router() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build();

        let order = |direction, order_id: &str, grade: &str, price, quantity, total| {
            Transaction::new(
                direction,
                order_id.to_string(),
                TransactionParties::default(),
                NaiveDate::from_ymd_opt(2024, 5, 1),
                Some("10:30".to_string()),
                vec![RequestedCategory {
                    category_id: "01".to_string(),
                    sub_category_id: "0101".to_string(),
                    items: vec![GradedItem {
                        grade: Some(grade.to_string()),
                        price,
                        quantity,
                        total,
                    }],
                }],
            )
        };

        engine
            .replace_transactions(&[
                order(Direction::Buy, "ORD-B1", "A", 10.0, 5.0, 50.0),
                order(Direction::Buy, "ORD-B2", "C", 25.0, 2.0, 50.0),
                order(Direction::Sell, "ORD-S1", "A", 10.0, 2.0, 20.0),
            ])
            .await
            .unwrap();
        engine
            .replace_categories(&[Category::new(
                "01".to_string(),
                "Metal".to_string(),
                vec![SubCategory {
                    sub_category_id: "0101".to_string(),
                    sub_category_name: "Copper".to_string(),
                }],
            )])
            .await
            .unwrap();

        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn stock_summary_without_filter_merges_directions() {
        let router = seeded_router().await;

        let (status, body) = get_json(router, "/report/stock-summary").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["categoryId"], "01");
        assert_eq!(rows[0]["subCategoryId"], "0101");
        assert_eq!(rows[0]["productName"], "Metal / Copper");
        assert_eq!(rows[0]["totalBuyWeight"], 7.0);
        assert_eq!(rows[0]["totalBuyAmount"], 100.0);
        assert_eq!(rows[0]["totalSellWeight"], 2.0);
        assert_eq!(rows[0]["remainWeight"], 5.0);
        assert_eq!(rows[0]["remainAmount"], 80.0);
    }

    #[tokio::test]
    async fn stock_summary_applies_grade_and_price_filters() {
        let router = seeded_router().await;

        let (status, body) = get_json(
            router,
            "/report/stock-summary?grade=A,B&priceMin=5&priceMax=20",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        // The grade C / price 25 buy order is filtered out.
        assert_eq!(rows[0]["totalBuyWeight"], 5.0);
        assert_eq!(rows[0]["totalSellWeight"], 2.0);
    }

    #[tokio::test]
    async fn stock_summary_rejects_malformed_date() {
        let router = seeded_router().await;

        let (status, body) = get_json(router, "/report/stock-summary?startOrderFinishDate=soon").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("startOrderFinishDate"));
    }

    #[tokio::test]
    async fn stock_summary_with_excluding_filter_is_empty_array() {
        let router = seeded_router().await;

        let (status, body) = get_json(router, "/report/stock-summary?orderId=ORD-NONE").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn grades_endpoint_lists_sorted_unique_grades() {
        let router = seeded_router().await;

        let (status, body) = get_json(router, "/order/grades").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["grades"], serde_json::json!(["A", "C"]));
    }

    #[tokio::test]
    async fn category_list_returns_the_catalog() {
        let router = seeded_router().await;

        let (status, body) = get_json(router, "/category/list").await;

        assert_eq!(status, StatusCode::OK);
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0]["categoryId"], "01");
        assert_eq!(categories[0]["subcategory"][0]["subCategoryName"], "Copper");
    }
}
