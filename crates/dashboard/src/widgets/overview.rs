use models::{QueryParams, QueryResult, Resource};
use serde::Serialize;
use serde_json::Value;

use crate::state::{EventKind, ViewState};
use crate::widget::{Chart, Request, ShapeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewLine {
    pub field: String,
    pub value: String,
}

/// Every column of the company overview as `field: value` lines.
#[derive(Debug, Default)]
pub struct Overview;

impl Chart for Overview {
    type Shape = Vec<OverviewLine>;
    const NAME: &'static str = "overview";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Symbol]
    }

    fn request(&self, state: &ViewState) -> Option<Request> {
        Some(Request::post(
            Resource::Overview,
            QueryParams::for_symbol(state.symbol().as_str()),
        ))
    }

    fn shape(&self, _state: &ViewState, rows: QueryResult) -> Result<Vec<OverviewLine>, ShapeError> {
        let row = rows.into_iter().next().ok_or(ShapeError::Empty)?;
        Ok(row
            .into_iter()
            .map(|(field, value)| OverviewLine {
                field,
                value: display(&value),
            })
            .collect())
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rows, state};
    use serde_json::json;

    #[test]
    fn test_lines_keep_column_order() {
        let lines = Overview
            .shape(
                &state("WFC"),
                rows(json!([{ "Symbol": "WFC", "PERatio": 12.5, "Beta": null }])),
            )
            .unwrap();

        let text: Vec<String> = lines.iter().map(|l| format!("{}: {}", l.field, l.value)).collect();
        assert_eq!(text, ["Symbol: WFC", "PERatio: 12.5", "Beta: None"]);
    }

    #[test]
    fn test_request_carries_symbol() {
        let request = Overview.request(&state("AAPL")).unwrap();
        assert_eq!(request.params, Some(QueryParams::for_symbol("AAPL")));
    }
}
