//! Shared helpers for unit tests.

use models::QueryResult;
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;

use crate::state::{StateConfig, Symbol, ViewState};

pub fn state(symbol: &str) -> Rc<ViewState> {
    let config = StateConfig {
        start_year: 2016,
        end_year: 2020,
        transition_duration: Duration::from_millis(750),
    };
    Rc::new(ViewState::new(config, Symbol::new(symbol).unwrap()))
}

/// `json!([{..}, {..}])` into query rows.
pub fn rows(value: Value) -> QueryResult {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row.as_object().cloned().unwrap())
        .collect()
}
