use models::{QueryParams, QueryResult, Resource, SentimentRow};
use serde::Serialize;

use super::SentimentBand;
use crate::state::{DateKind, EventKind, ViewState};
use crate::widget::{typed_rows, Chart, Request, ShapeError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeReading {
    pub score: f64,
    pub band: SentimentBand,
    pub label: &'static str,
    pub article_count: i64,
}

/// Relevance-weighted news sentiment for the ticker.
#[derive(Debug, Default)]
pub struct SentimentGauge;

impl Chart for SentimentGauge {
    type Shape = GaugeReading;
    const NAME: &'static str = "sentiment";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Symbol, EventKind::Time]
    }

    fn request(&self, state: &ViewState) -> Option<Request> {
        let range = state.query_date_range(DateKind::News);
        Some(Request::post(
            Resource::SentimentGauge,
            QueryParams::for_symbol(state.symbol().as_str()).with_range(range.start, range.end),
        ))
    }

    fn shape(&self, _state: &ViewState, rows: QueryResult) -> Result<GaugeReading, ShapeError> {
        let rows: Vec<SentimentRow> = typed_rows(rows, &["value"])?;
        let row = rows.into_iter().next().ok_or(ShapeError::Empty)?;
        // No articles in range: the aggregate comes back NULL
        let score = row.value.ok_or(ShapeError::Empty)?;
        let band = SentimentBand::classify(score);

        Ok(GaugeReading {
            score,
            band,
            label: band.label(),
            article_count: row.article_count,
        })
    }
}
