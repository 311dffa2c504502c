use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use dashboard::{DataSource, QueryClient};
use models::{QueryParams, Resource};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Served {
    fail: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<(Method, String, String)>>>,
}

async fn data(
    State(served): State<Served>,
    method: Method,
    Path(resource): Path<String>,
    body: String,
) -> Response {
    served
        .calls
        .lock()
        .unwrap()
        .push((method, resource.clone(), body.clone()));

    if served.fail.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database is locked" })),
        )
            .into_response();
    }

    match resource.as_str() {
        "symbols" => Json(json!([{ "Symbol": "AAPL" }, { "Symbol": "WFC" }])).into_response(),
        "overview" => {
            let params: QueryParams = serde_json::from_str(&body).unwrap_or_default();
            Json(json!([{ "Symbol": params.symbol, "Name": "Wells Fargo" }])).into_response()
        }
        "wordcloud" => Json(json!({
            "result": [{ "word": "bank", "occurrence_count": 6, "weighted_sentiment_score": 0.1 }]
        }))
        .into_response(),
        "intraday" => Json(json!([])).into_response(),
        "cash_flow_senkey" => "not json".into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "Unknown resource" }))).into_response(),
    }
}

async fn serve() -> (QueryClient, Served) {
    let served = Served::default();
    let app = Router::new()
        .route("/data/:resource", any(data))
        .with_state(served.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = QueryClient::new(&format!("http://{addr}/data/")).unwrap();
    (client, served)
}

#[tokio::test]
async fn test_get_without_params_post_with_params() {
    let (client, served) = serve().await;

    let symbols = client.query(Resource::Symbols, None).await.unwrap();
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0]["Symbol"], "AAPL");

    let overview = client
        .query(Resource::Overview, Some(QueryParams::for_symbol("WFC")))
        .await
        .unwrap();
    assert_eq!(overview[0]["Symbol"], "WFC");

    let calls = served.calls.lock().unwrap().clone();
    assert_eq!(calls[0].0, Method::GET);
    assert_eq!(calls[0].1, "symbols");
    assert!(calls[0].2.is_empty());
    assert_eq!(calls[1].0, Method::POST);
    assert_eq!(calls[1].1, "overview");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&calls[1].2).unwrap(),
        json!({ "symbol": "WFC" })
    );
}

#[tokio::test]
async fn test_server_error_becomes_none() {
    let (client, served) = serve().await;
    served.fail.store(true, Ordering::SeqCst);

    assert!(client.query(Resource::Symbols, None).await.is_none());
    assert!(client
        .query(Resource::Overview, Some(QueryParams::for_symbol("WFC")))
        .await
        .is_none());
}

#[tokio::test]
async fn test_word_cloud_envelope_is_unwrapped() {
    let (client, _) = serve().await;
    let words = client
        .query(Resource::WordCloud, Some(QueryParams::for_symbol("WFC")))
        .await
        .unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["word"], "bank");
}

#[tokio::test]
async fn test_empty_and_undecodable_results_are_distinct() {
    let (client, _) = serve().await;

    let empty = client
        .query(Resource::Intraday, Some(QueryParams::for_symbol("WFC")))
        .await;
    assert_eq!(empty, Some(Vec::new()));

    let garbage = client
        .query(Resource::CashFlowFlow, Some(QueryParams::for_symbol("WFC")))
        .await;
    assert!(garbage.is_none());
}

#[tokio::test]
async fn test_unreachable_server_becomes_none() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = QueryClient::new(&format!("http://{addr}/data/")).unwrap();
    assert!(client.query(Resource::Symbols, None).await.is_none());
}
