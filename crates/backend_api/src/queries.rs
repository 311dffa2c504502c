//! SQL for every resource served under `/data`.
//!
//! Date bounds are optional: each range predicate is written as
//! `(?n IS NULL OR column >= ?n)` so a missing `start`/`end` leaves that side open.

use models::ReportVariant;

pub const SYMBOLS: &str = "
    SELECT Symbol,
           Name,
           Sector,
           Industry,
           CASE WHEN MarketCapitalization = 'None' THEN NULL
                ELSE CAST(MarketCapitalization AS REAL) END AS MarketCapitalization,
           CASE WHEN PERatio = 'None' THEN NULL ELSE CAST(PERatio AS REAL) END AS PERatio,
           CASE WHEN DividendYield = 'None' THEN NULL ELSE CAST(DividendYield AS REAL) END AS DividendYield
    FROM company_overview
    ORDER BY Symbol";

pub const TABLE_SCHEMA: &str = "SELECT name, type FROM pragma_table_info(?1) ORDER BY cid";

pub const OVERVIEW: &str = "SELECT * FROM company_overview WHERE Symbol = ?1";

pub const INTRADAY: &str = "
    SELECT datetime, close
    FROM company_intraday_data
    WHERE symbol = ?1
      AND (?2 IS NULL OR datetime >= ?2)
      AND (?3 IS NULL OR datetime <= ?3)
    ORDER BY datetime";

/// Article text and per-ticker score feeding the word cloud. Terms are counted in `terms`.
pub const NEWS_TEXT: &str = "
    SELECT a.title AS title,
           a.summary AS summary,
           s.ticker_sentiment_score AS ticker_sentiment_score
    FROM news_articles a
    JOIN news_ticker_sentiment s ON s.article_id = a.id
    WHERE s.ticker_symbol = ?1
      AND (?2 IS NULL OR a.time_published >= ?2)
      AND (?3 IS NULL OR a.time_published <= ?3)
    ORDER BY a.time_published";

pub const SENTIMENT: &str = "
    SELECT SUM(CAST(s.ticker_sentiment_score AS REAL) * CAST(s.relevance_score AS REAL))
               / NULLIF(SUM(CAST(s.relevance_score AS REAL)), 0) AS value,
           COUNT(*) AS article_count
    FROM news_ticker_sentiment s
    JOIN news_articles a ON a.id = s.article_id
    WHERE s.ticker_symbol = ?1
      AND (?2 IS NULL OR a.time_published >= ?2)
      AND (?3 IS NULL OR a.time_published <= ?3)";

/// One edge of a statement flow diagram: `column` of the selected report flows from `source` to `target`.
pub struct FlowEdge {
    pub source: &'static str,
    pub target: &'static str,
    pub column: &'static str,
}

const fn edge(source: &'static str, target: &'static str, column: &'static str) -> FlowEdge {
    FlowEdge {
        source,
        target,
        column,
    }
}

pub const BALANCE_SHEET_EDGES: &[FlowEdge] = &[
    edge("Cash & Equivalents", "Current Assets", "cashAndCashEquivalentsAtCarryingValue"),
    edge("Receivables", "Current Assets", "currentNetReceivables"),
    edge("Inventory", "Current Assets", "inventory"),
    edge("Other Current Assets", "Current Assets", "otherCurrentAssets"),
    edge("Property, Plant & Equipment", "Non-Current Assets", "propertyPlantEquipment"),
    edge("Goodwill", "Non-Current Assets", "goodwill"),
    edge("Long-Term Investments", "Non-Current Assets", "longTermInvestments"),
    edge("Current Assets", "Assets", "totalCurrentAssets"),
    edge("Non-Current Assets", "Assets", "totalNonCurrentAssets"),
    edge("Assets", "Liabilities", "totalLiabilities"),
    edge("Assets", "Shareholder Equity", "totalShareholderEquity"),
    edge("Liabilities", "Current Liabilities", "totalCurrentLiabilities"),
    edge("Liabilities", "Non-Current Liabilities", "totalNonCurrentLiabilities"),
    edge("Current Liabilities", "Accounts Payable", "currentAccountsPayable"),
    edge("Current Liabilities", "Short-Term Debt", "shortTermDebt"),
    edge("Non-Current Liabilities", "Long-Term Debt", "longTermDebtNoncurrent"),
    edge("Shareholder Equity", "Retained Earnings", "retainedEarnings"),
    edge("Shareholder Equity", "Common Stock", "commonStock"),
];

// The collected income_statement table carries the operating cash-flow columns
pub const INCOME_STATEMENT_EDGES: &[FlowEdge] = &[
    edge("Operating Proceeds", "Operating Cash Flow", "proceedsFromOperatingActivities"),
    edge("Depreciation & Amortization", "Operating Cash Flow", "depreciationDepletionAndAmortization"),
    edge("Operating Liabilities Change", "Operating Cash Flow", "changeInOperatingLiabilities"),
    edge("Operating Cash Flow", "Operating Payments", "paymentsForOperatingActivities"),
    edge("Operating Cash Flow", "Operating Assets Change", "changeInOperatingAssets"),
    edge("Operating Cash Flow", "Receivables Change", "changeInReceivables"),
    edge("Operating Cash Flow", "Inventory Change", "changeInInventory"),
    edge("Operating Cash Flow", "Profit / Loss", "profitLoss"),
    edge("Profit / Loss", "Net Income", "netIncome"),
];

pub const CASH_FLOW_EDGES: &[FlowEdge] = &[
    edge("Net Income", "Cash from Operations", "netIncome"),
    edge("Depreciation & Amortization", "Cash from Operations", "depreciationDepletionAndAmortization"),
    edge("Cash from Operations", "Capital Expenditure", "capitalExpenditures"),
    edge("Cash from Operations", "Dividends", "dividendPayout"),
    edge("Cash from Operations", "Stock Buybacks", "paymentsForRepurchaseOfCommonStock"),
    edge("Cash from Operations", "Cash from Investing", "cashflowFromInvestment"),
    edge("Cash from Operations", "Cash from Financing", "cashflowFromFinancing"),
];

pub fn statement_table(variant: ReportVariant) -> &'static str {
    match variant {
        ReportVariant::Balance => "balance_sheet",
        ReportVariant::Income => "income_statement",
        ReportVariant::CashFlow => "cash_flow",
    }
}

pub fn statement_edges(variant: ReportVariant) -> &'static [FlowEdge] {
    match variant {
        ReportVariant::Balance => BALANCE_SHEET_EDGES,
        ReportVariant::Income => INCOME_STATEMENT_EDGES,
        ReportVariant::CashFlow => CASH_FLOW_EDGES,
    }
}

/// Builds the `source, target, value` query for the most recent report of a statement.
///
/// Binds: `?1` symbol, `?2` report type, `?3` start, `?4` end. Table and column names come
/// from the static edge lists only.
pub fn statement_flow(variant: ReportVariant) -> String {
    let table = statement_table(variant);
    let selects = statement_edges(variant)
        .iter()
        .map(|e| {
            format!(
                "SELECT '{}' AS source, '{}' AS target, {} AS value FROM latest",
                e.source.replace('\'', "''"),
                e.target.replace('\'', "''"),
                e.column
            )
        })
        .collect::<Vec<_>>()
        .join("\n    UNION ALL ");

    format!(
        "WITH latest AS (
        SELECT * FROM {table}
        WHERE symbol = ?1
          AND reportType = ?2
          AND (?3 IS NULL OR fiscalDateEnding >= ?3)
          AND (?4 IS NULL OR fiscalDateEnding <= ?4)
        ORDER BY fiscalDateEnding DESC
        LIMIT 1
    )
    {selects}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_query_selects_every_edge() {
        let sql = statement_flow(ReportVariant::CashFlow);
        assert!(sql.contains("FROM cash_flow"));
        assert_eq!(sql.matches("UNION ALL").count(), CASH_FLOW_EDGES.len() - 1);
        assert!(sql.contains("'Depreciation & Amortization' AS source"));
    }

    #[test]
    fn edges_never_loop_back() {
        for variant in [ReportVariant::Balance, ReportVariant::Income, ReportVariant::CashFlow] {
            for e in statement_edges(variant) {
                assert_ne!(e.source, e.target);
            }
        }
    }
}
