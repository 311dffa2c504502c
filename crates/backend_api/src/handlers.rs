use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use models::{QueryParams, QueryResult, ReportType, ReportVariant, Resource, WordCloudEnvelope};
use std::sync::Arc;

use crate::{
    error::ApiError,
    repository::{DateWindow, FinanceRepository},
    Result,
};

pub type RepositoryState = Arc<dyn FinanceRepository>;

/// GET /data/:resource
/// Runs the resource query without parameters
pub async fn get_resource(
    State(repo): State<RepositoryState>,
    Path(resource): Path<String>,
) -> Result<Response> {
    run_resource(repo.as_ref(), &resource, QueryParams::default()).await
}

/// POST /data/:resource
/// Runs the resource query with the named parameters from the JSON body
pub async fn post_resource(
    State(repo): State<RepositoryState>,
    Path(resource): Path<String>,
    body: std::result::Result<Json<QueryParams>, JsonRejection>,
) -> Result<Response> {
    let Json(params) = body.map_err(|rejection| ApiError::InvalidParameter(rejection.body_text()))?;
    run_resource(repo.as_ref(), &resource, params).await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "finance-dashboard-api"
    }))
}

async fn run_resource(
    repo: &dyn FinanceRepository,
    path: &str,
    params: QueryParams,
) -> Result<Response> {
    let resource =
        Resource::from_path(path).ok_or_else(|| ApiError::UnknownResource(path.to_string()))?;
    tracing::debug!(%resource, ?params, "running query");

    let rows = fetch(repo, resource, &params).await?;

    // The word cloud keeps its historical `result` wrapper on the wire
    if resource.is_enveloped() {
        return Ok(Json(WordCloudEnvelope { result: rows }).into_response());
    }
    Ok(Json(rows).into_response())
}

async fn fetch(
    repo: &dyn FinanceRepository,
    resource: Resource,
    params: &QueryParams,
) -> Result<QueryResult> {
    let window = DateWindow::new(params.start.clone(), params.end.clone());

    match resource {
        Resource::Symbols => repo.fetch_symbols().await,
        Resource::TableSchema => {
            let table = required(&params.table, "table")?;
            repo.fetch_table_schema(table).await
        }
        Resource::Overview => repo.fetch_overview(required(&params.symbol, "symbol")?).await,
        Resource::Intraday => {
            repo.fetch_intraday(required(&params.symbol, "symbol")?, &window)
                .await
        }
        Resource::BalanceSheetFlow | Resource::IncomeStatementFlow | Resource::CashFlowFlow => {
            let variant = match resource {
                Resource::BalanceSheetFlow => ReportVariant::Balance,
                Resource::IncomeStatementFlow => ReportVariant::Income,
                _ => ReportVariant::CashFlow,
            };
            let report_type = match params.report_type.as_deref() {
                None => ReportType::default(),
                Some(raw) => ReportType::parse(raw).ok_or_else(|| {
                    ApiError::InvalidParameter(format!("report_type '{raw}'"))
                })?,
            };
            repo.fetch_statement_flow(
                variant,
                required(&params.symbol, "symbol")?,
                report_type,
                &window,
            )
            .await
        }
        Resource::WordCloud => {
            repo.fetch_word_cloud(required(&params.symbol, "symbol")?, &window)
                .await
        }
        Resource::SentimentGauge => {
            repo.fetch_sentiment(required(&params.symbol, "symbol")?, &window)
                .await
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}
