use serde::{Deserialize, Serialize};
use std::fmt;

// Rows travel as plain JSON objects; each widget owns the typed view of them
pub type Row = serde_json::Map<String, serde_json::Value>;
pub type QueryResult = Vec<Row>;

/// Named parameters accepted by every data endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub symbol: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub report_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub table: Option<String>,
}

impl QueryParams {
	pub fn for_symbol(symbol: impl Into<String>) -> Self {
		Self {
			symbol: Some(symbol.into()),
			..Self::default()
		}
	}

	pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
		self.start = Some(start.into());
		self.end = Some(end.into());
		self
	}

	pub fn with_report_type(mut self, report_type: ReportType) -> Self {
		self.report_type = Some(report_type.as_str().to_string());
		self
	}

	pub fn for_table(table: impl Into<String>) -> Self {
		Self {
			table: Some(table.into()),
			..Self::default()
		}
	}
}

/// Every dataset the backend can serve, keyed by its URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
	Symbols,
	TableSchema,
	Overview,
	Intraday,
	BalanceSheetFlow,
	IncomeStatementFlow,
	CashFlowFlow,
	WordCloud,
	SentimentGauge,
}

impl Resource {
	pub const ALL: [Resource; 9] = [
		Resource::Symbols,
		Resource::TableSchema,
		Resource::Overview,
		Resource::Intraday,
		Resource::BalanceSheetFlow,
		Resource::IncomeStatementFlow,
		Resource::CashFlowFlow,
		Resource::WordCloud,
		Resource::SentimentGauge,
	];

	pub fn path(self) -> &'static str {
		match self {
			Resource::Symbols => "symbols",
			Resource::TableSchema => "table_schema",
			Resource::Overview => "overview",
			Resource::Intraday => "intraday",
			Resource::BalanceSheetFlow => "balance_sheet_senkey",
			Resource::IncomeStatementFlow => "income_statement_senkey",
			Resource::CashFlowFlow => "cash_flow_senkey",
			Resource::WordCloud => "wordcloud",
			Resource::SentimentGauge => "symbol_sentiment_speedometer",
		}
	}

	pub fn from_path(path: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|r| r.path() == path)
	}

	pub fn for_variant(variant: ReportVariant) -> Self {
		match variant {
			ReportVariant::Balance => Resource::BalanceSheetFlow,
			ReportVariant::Income => Resource::IncomeStatementFlow,
			ReportVariant::CashFlow => Resource::CashFlowFlow,
		}
	}

	/// The word cloud payload is nested under `result`; everything else is a bare array.
	pub fn is_enveloped(self) -> bool {
		matches!(self, Resource::WordCloud)
	}
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.path())
	}
}

/// Which financial statement the flow diagram shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportVariant {
	#[default]
	Balance,
	Income,
	#[serde(rename = "cash")]
	CashFlow,
}

impl ReportVariant {
	pub fn as_str(self) -> &'static str {
		match self {
			ReportVariant::Balance => "balance",
			ReportVariant::Income => "income",
			ReportVariant::CashFlow => "cash",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"balance" => Some(ReportVariant::Balance),
			"income" => Some(ReportVariant::Income),
			"cash" | "cash_flow" | "cashflow" => Some(ReportVariant::CashFlow),
			_ => None,
		}
	}

	pub fn dataset_name(self) -> &'static str {
		match self {
			ReportVariant::Balance => "balance sheet",
			ReportVariant::Income => "income statement",
			ReportVariant::CashFlow => "cash flow",
		}
	}
}

/// Report granularity stored in the `reportType` column of the statement tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
	#[default]
	Annual,
	Quarterly,
}

impl ReportType {
	pub fn as_str(self) -> &'static str {
		match self {
			ReportType::Annual => "annual",
			ReportType::Quarterly => "quarterly",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"annual" => Some(ReportType::Annual),
			"quarterly" => Some(ReportType::Quarterly),
			_ => None,
		}
	}
}

/// Wire shape of the word cloud endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordCloudEnvelope {
	pub result: QueryResult,
}

// Settings models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
	#[serde(default = "default_api_base_url")]
	pub api_base_url: String,
	#[serde(default = "default_start_year")]
	pub start_year: i32,
	#[serde(default = "default_end_year")]
	pub end_year: i32,
	#[serde(default = "default_transition_duration_ms")]
	pub transition_duration_ms: u64,
	#[serde(default = "default_resize_debounce_ms")]
	pub resize_debounce_ms: u64,
	#[serde(default = "default_symbol")]
	pub default_symbol: String,
}

fn default_api_base_url() -> String {
	"http://localhost:3000/data/".to_string()
}

fn default_start_year() -> i32 {
	2016
}

fn default_end_year() -> i32 {
	2020
}

fn default_transition_duration_ms() -> u64 {
	750
}

fn default_resize_debounce_ms() -> u64 {
	250
}

fn default_symbol() -> String {
	"WFC".to_string()
}

impl Default for DashboardSettings {
	fn default() -> Self {
		Self {
			api_base_url: default_api_base_url(),
			start_year: default_start_year(),
			end_year: default_end_year(),
			transition_duration_ms: default_transition_duration_ms(),
			resize_debounce_ms: default_resize_debounce_ms(),
			default_symbol: default_symbol(),
		}
	}
}

// Typed views of the rows returned by the chart endpoints

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntradayRow {
	pub datetime: String,
	pub close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRow {
	pub source: String,
	pub target: String,
	// Statement columns are TEXT and may hold "None" when the filing omits the line
	pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRow {
	pub word: String,
	pub occurrence_count: f64,
	pub weighted_sentiment_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRow {
	pub value: Option<f64>,
	#[serde(default)]
	pub article_count: i64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resource_paths_round_trip() {
		for resource in Resource::ALL {
			assert_eq!(Resource::from_path(resource.path()), Some(resource));
		}
		assert_eq!(Resource::from_path("radar"), None);
	}

	#[test]
	fn only_word_cloud_is_enveloped() {
		let enveloped: Vec<_> = Resource::ALL.into_iter().filter(|r| r.is_enveloped()).collect();
		assert_eq!(enveloped, vec![Resource::WordCloud]);
	}

	#[test]
	fn params_skip_unset_fields() {
		let params = QueryParams::for_symbol("WFC").with_report_type(ReportType::Quarterly);
		let json = serde_json::to_value(&params).unwrap();
		assert_eq!(json, serde_json::json!({ "symbol": "WFC", "report_type": "quarterly" }));
	}

	#[test]
	fn settings_fill_missing_fields() {
		let settings: DashboardSettings = serde_json::from_str(r#"{ "start_year": 2018 }"#).unwrap();
		assert_eq!(settings.start_year, 2018);
		assert_eq!(settings.end_year, 2020);
		assert_eq!(settings.default_symbol, "WFC");
	}

	#[test]
	fn variant_parses_wire_names() {
		assert_eq!(ReportVariant::parse("cash"), Some(ReportVariant::CashFlow));
		assert_eq!(ReportVariant::parse(" Income "), Some(ReportVariant::Income));
		assert_eq!(ReportVariant::parse("radar"), None);
		assert_eq!(Resource::for_variant(ReportVariant::CashFlow).path(), "cash_flow_senkey");
	}
}
