use models::{FlowRow, QueryParams, QueryResult, ReportType, Resource};
use serde::Serialize;
use serde_json::Value;

use super::numeric;
use crate::state::{DateKind, EventKind, ViewState};
use crate::widget::{typed_rows, Chart, Request, ShapeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    fn node(&mut self, name: String) -> usize {
        match self.nodes.iter().position(|n| n.name == name) {
            Some(idx) => idx,
            None => {
                self.nodes.push(FlowNode { name });
                self.nodes.len() - 1
            }
        }
    }

    /// Total flowing out of `name`.
    pub fn outflow(&self, name: &str) -> f64 {
        match self.nodes.iter().position(|n| n.name == name) {
            Some(idx) => self
                .links
                .iter()
                .filter(|l| l.source == idx)
                .map(|l| l.value)
                .sum(),
            None => 0.0,
        }
    }
}

/// Balance sheet, income statement or cash flow as a node/link graph,
/// switched by the report variant in view state.
#[derive(Debug, Default)]
pub struct FlowDiagram;

impl Chart for FlowDiagram {
    type Shape = FlowGraph;
    const NAME: &'static str = "financial statement";

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::Symbol,
            EventKind::Time,
            EventKind::ReportVariantSelect,
        ]
    }

    fn dataset_name(&self, state: &ViewState) -> &'static str {
        state.report_variant().dataset_name()
    }

    fn request(&self, state: &ViewState) -> Option<Request> {
        let range = state.query_date_range(DateKind::Report);
        let report_type = if state.report_period().is_quarterly() {
            ReportType::Quarterly
        } else {
            ReportType::Annual
        };
        Some(Request::post(
            Resource::for_variant(state.report_variant()),
            QueryParams::for_symbol(state.symbol().as_str())
                .with_range(range.start, range.end)
                .with_report_type(report_type),
        ))
    }

    fn shape(&self, _state: &ViewState, rows: QueryResult) -> Result<FlowGraph, ShapeError> {
        let rows: Vec<FlowRow> = typed_rows(rows, &["source", "target", "value"])?;

        let mut graph = FlowGraph {
            nodes: Vec::new(),
            links: Vec::new(),
        };
        for (idx, row) in rows.into_iter().enumerate() {
            // Lines the filing omits come back as NULL or "None"
            let value = match &row.value {
                Value::Null => continue,
                Value::String(s) if s.trim() == "None" => continue,
                other => numeric(other).ok_or_else(|| ShapeError::InvalidValue {
                    row: idx,
                    reason: format!("value {other} is not a number"),
                })?,
            };

            let source = graph.node(row.source);
            let target = graph.node(row.target);
            graph.links.push(FlowLink {
                source,
                target,
                // Outflows are reported negative; link width is the magnitude
                value: value.abs(),
            });
        }

        if graph.links.is_empty() {
            return Err(ShapeError::Empty);
        }
        Ok(graph)
    }
}
