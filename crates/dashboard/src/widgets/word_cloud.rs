use models::{QueryParams, QueryResult, Resource, WordRow};
use serde::Serialize;

use super::SentimentBand;
use crate::state::{DateKind, EventKind, ViewState};
use crate::widget::{typed_rows, Chart, Request, ShapeError};

const MIN_FONT: f64 = 20.0;
const MAX_FONT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTerm {
    pub word: String,
    pub occurrences: f64,
    pub font_size: f64,
    pub sentiment: f64,
    pub band: SentimentBand,
}

/// Most frequent news keywords, sized by count and coloured by sentiment.
#[derive(Debug, Default)]
pub struct WordCloud;

impl Chart for WordCloud {
    type Shape = Vec<WeightedTerm>;
    const NAME: &'static str = "word cloud";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Symbol, EventKind::Time]
    }

    fn request(&self, state: &ViewState) -> Option<Request> {
        let range = state.query_date_range(DateKind::News);
        Some(Request::post(
            Resource::WordCloud,
            QueryParams::for_symbol(state.symbol().as_str()).with_range(range.start, range.end),
        ))
    }

    fn shape(&self, _state: &ViewState, rows: QueryResult) -> Result<Vec<WeightedTerm>, ShapeError> {
        let rows: Vec<WordRow> =
            typed_rows(rows, &["word", "occurrence_count", "weighted_sentiment_score"])?;
        if rows.is_empty() {
            return Err(ShapeError::Empty);
        }

        let min = rows.iter().map(|r| r.occurrence_count).fold(f64::INFINITY, f64::min);
        let max = rows.iter().map(|r| r.occurrence_count).fold(f64::NEG_INFINITY, f64::max);

        Ok(rows
            .into_iter()
            .map(|row| WeightedTerm {
                font_size: font_size(row.occurrence_count, min, max),
                band: SentimentBand::classify(row.weighted_sentiment_score),
                sentiment: row.weighted_sentiment_score,
                occurrences: row.occurrence_count,
                word: row.word,
            })
            .collect())
    }
}

/// Linear map of `count` from `[min, max]` onto the font range; a flat domain sits mid-range.
fn font_size(count: f64, min: f64, max: f64) -> f64 {
    if max > min {
        MIN_FONT + (count - min) / (max - min) * (MAX_FONT - MIN_FONT)
    } else {
        (MIN_FONT + MAX_FONT) / 2.0
    }
}
