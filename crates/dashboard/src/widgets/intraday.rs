use chrono::NaiveDateTime;
use models::{IntradayRow, QueryParams, QueryResult, Resource};
use serde::Serialize;

use crate::state::{DateKind, EventKind, ViewState};
use crate::widget::{typed_rows, Chart, Request, ShapeError};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub datetime: NaiveDateTime,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
    pub min_close: f64,
    pub max_close: f64,
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    /// Axis label format: day resolution for a quarter, month for a year.
    pub tick_format: &'static str,
}

/// Closing price line over the selected period.
#[derive(Debug, Default)]
pub struct IntradayChart;

impl Chart for IntradayChart {
    type Shape = PriceSeries;
    const NAME: &'static str = "intraday";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Symbol, EventKind::Time]
    }

    fn request(&self, state: &ViewState) -> Option<Request> {
        let range = state.query_date_range(DateKind::Intraday);
        Some(Request::post(
            Resource::Intraday,
            QueryParams::for_symbol(state.symbol().as_str()).with_range(range.start, range.end),
        ))
    }

    fn shape(&self, state: &ViewState, rows: QueryResult) -> Result<PriceSeries, ShapeError> {
        let rows: Vec<IntradayRow> = typed_rows(rows, &["datetime", "close"])?;

        let mut points = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let datetime = NaiveDateTime::parse_from_str(&row.datetime, DATETIME_FORMAT)
                    .map_err(|e| ShapeError::InvalidValue {
                        row: idx,
                        reason: format!("datetime '{}': {e}", row.datetime),
                    })?;
                Ok(PricePoint {
                    datetime,
                    close: row.close,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;
        points.sort_by_key(|p| p.datetime);

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.datetime, last.datetime),
            _ => return Err(ShapeError::Empty),
        };
        let min_close = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
        let max_close = points.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);

        Ok(PriceSeries {
            points,
            min_close,
            max_close,
            first,
            last,
            tick_format: if state.report_period().is_quarterly() {
                "%y-%b-%d"
            } else {
                "%y-%b"
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rows, state};
    use serde_json::json;

    #[test]
    fn test_series_is_sorted_with_bounds() {
        let state = state("WFC");
        state.set_quarter(1);
        let series = IntradayChart
            .shape(
                &state,
                rows(json!([
                    { "datetime": "2016-02-01 10:00:00", "close": 31.0 },
                    { "datetime": "2016-01-04 10:00:00", "close": 29.5 },
                    { "datetime": "2016-03-01 10:00:00", "close": 30.25 }
                ])),
            )
            .unwrap();

        assert_eq!(series.points[0].close, 29.5);
        assert_eq!(series.min_close, 29.5);
        assert_eq!(series.max_close, 31.0);
        assert_eq!(series.last.to_string(), "2016-03-01 10:00:00");
        assert_eq!(series.tick_format, "%y-%b-%d");
    }

    #[test]
    fn test_bad_timestamp_fails_closed() {
        let err = IntradayChart
            .shape(
                &state("WFC"),
                rows(json!([{ "datetime": "yesterday", "close": 1.0 }])),
            )
            .unwrap_err();
        assert!(matches!(err, ShapeError::InvalidValue { row: 0, .. }));
    }

    #[test]
    fn test_request_uses_intraday_range() {
        let state = state("WFC");
        let request = IntradayChart.request(&state).unwrap();
        let params = request.params.unwrap();
        assert_eq!(params.start.as_deref(), Some("2016-01-01 00:00:00"));
        assert_eq!(params.end.as_deref(), Some("2016-12-31 23:59:59"));
    }
}
