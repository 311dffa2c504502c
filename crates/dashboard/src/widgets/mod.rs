//! The seven dashboard charts. Each one is a [`Chart`](crate::widget::Chart)
//! that the lifecycle controller mounts onto the shared view state.

mod flow;
mod gauge;
mod intraday;
mod overview;
mod slider;
mod table;
mod word_cloud;

pub use flow::{FlowDiagram, FlowGraph, FlowLink, FlowNode};
pub use gauge::{GaugeReading, SentimentGauge};
pub use intraday::{IntradayChart, PricePoint, PriceSeries};
pub use overview::{Overview, OverviewLine};
pub use slider::{SliderTick, SliderView, TimeSlider};
pub use table::{SortDirection, SortState, SymbolTable, TableRow, TableView};
pub use word_cloud::{WeightedTerm, WordCloud};

use serde::Serialize;
use serde_json::Value;

/// Sentiment buckets shared by the word cloud and the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentBand {
    Bearish,
    SomewhatBearish,
    Neutral,
    SomewhatBullish,
    Bullish,
}

impl SentimentBand {
    pub const ALL: [SentimentBand; 5] = [
        SentimentBand::Bearish,
        SentimentBand::SomewhatBearish,
        SentimentBand::Neutral,
        SentimentBand::SomewhatBullish,
        SentimentBand::Bullish,
    ];

    pub fn classify(score: f64) -> Self {
        if score < -0.35 {
            SentimentBand::Bearish
        } else if score < -0.15 {
            SentimentBand::SomewhatBearish
        } else if score <= 0.15 {
            SentimentBand::Neutral
        } else if score <= 0.35 {
            SentimentBand::SomewhatBullish
        } else {
            SentimentBand::Bullish
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentBand::Bearish => "Bearish",
            SentimentBand::SomewhatBearish => "Somewhat Bearish",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::SomewhatBullish => "Somewhat Bullish",
            SentimentBand::Bullish => "Bullish",
        }
    }

    /// Position on the gauge, 0 for Bearish through 4 for Bullish.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Reads a numeric cell that may arrive as a JSON number or as TEXT.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
