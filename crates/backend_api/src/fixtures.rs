//! Seeded SQLite file shared by the router tests.
//!
//! Tables use the column lists the data collectors create, so a query naming a
//! column the collectors never write fails here too.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

pub struct SeededDb {
    // Keeps the directory alive for the duration of the test
    pub dir: TempDir,
}

impl SeededDb {
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("finance_data.db")
    }
}

pub fn seeded_db() -> SeededDb {
    let dir = tempfile::tempdir().unwrap();
    let db = SeededDb { dir };
    let conn = Connection::open(db.path()).unwrap();
    conn.execute_batch(COMPANY_OVERVIEW).unwrap();
    conn.execute_batch(COLLECTED_SCHEMA).unwrap();
    seed(&conn);
    db
}

/// Database holding only `company_overview`, so news queries fail with "no such table".
pub fn partial_db(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("partial.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(COMPANY_OVERVIEW).unwrap();
    path
}

const COMPANY_OVERVIEW: &str = "
    CREATE TABLE company_overview (
        Symbol TEXT PRIMARY KEY, AssetType TEXT, Name TEXT, Description TEXT, CIK TEXT,
        Exchange TEXT, Currency TEXT, Country TEXT, Sector TEXT, Industry TEXT, Address TEXT,
        OfficialSite TEXT, FiscalYearEnd TEXT, LatestQuarter TEXT, MarketCapitalization TEXT,
        EBITDA TEXT, PERatio TEXT, PEGRatio TEXT, BookValue TEXT, DividendPerShare TEXT,
        DividendYield TEXT, EPS TEXT, RevenuePerShareTTM TEXT, ProfitMargin TEXT,
        OperatingMarginTTM TEXT, ReturnOnAssetsTTM TEXT, ReturnOnEquityTTM TEXT, RevenueTTM TEXT,
        GrossProfitTTM TEXT, DilutedEPSTTM TEXT, QuarterlyEarningsGrowthYOY TEXT,
        QuarterlyRevenueGrowthYOY TEXT, AnalystTargetPrice TEXT, AnalystRatingStrongBuy TEXT,
        AnalystRatingBuy TEXT, AnalystRatingHold TEXT, AnalystRatingSell TEXT,
        AnalystRatingStrongSell TEXT, TrailingPE TEXT, ForwardPE TEXT, PriceToSalesRatioTTM TEXT,
        PriceToBookRatio TEXT, EVToRevenue TEXT, EVToEBITDA TEXT, Beta TEXT, Week52High TEXT,
        Week52Low TEXT, MovingAverage50Day TEXT, MovingAverage200Day TEXT,
        SharesOutstanding TEXT, DividendDate TEXT, ExDividendDate TEXT
    );";

const COLLECTED_SCHEMA: &str = "
    CREATE TABLE company_intraday_data (
        symbol TEXT, datetime DATETIME, open REAL, high REAL, low REAL, close REAL,
        volume INTEGER
    );

    CREATE TABLE balance_sheet (
        symbol TEXT, fiscalDateEnding TEXT, reportType TEXT, reportedCurrency TEXT,
        totalAssets TEXT, totalCurrentAssets TEXT, cashAndCashEquivalentsAtCarryingValue TEXT,
        cashAndShortTermInvestments TEXT, inventory TEXT, currentNetReceivables TEXT,
        totalNonCurrentAssets TEXT, propertyPlantEquipment TEXT,
        accumulatedDepreciationAmortizationPPE TEXT, intangibleAssets TEXT,
        intangibleAssetsExcludingGoodwill TEXT, goodwill TEXT, investments TEXT,
        longTermInvestments TEXT, shortTermInvestments TEXT, otherCurrentAssets TEXT,
        otherNonCurrentAssets TEXT, totalLiabilities TEXT, totalCurrentLiabilities TEXT,
        currentAccountsPayable TEXT, deferredRevenue TEXT, currentDebt TEXT, shortTermDebt TEXT,
        totalNonCurrentLiabilities TEXT, capitalLeaseObligations TEXT, longTermDebt TEXT,
        currentLongTermDebt TEXT, longTermDebtNoncurrent TEXT, shortLongTermDebtTotal TEXT,
        otherCurrentLiabilities TEXT, otherNonCurrentLiabilities TEXT,
        totalShareholderEquity TEXT, treasuryStock TEXT, retainedEarnings TEXT, commonStock TEXT,
        commonStockSharesOutstanding TEXT,
        PRIMARY KEY (symbol, fiscalDateEnding, reportType)
    );

    CREATE TABLE income_statement (
        symbol TEXT, fiscalDateEnding TEXT, reportType TEXT, reportedCurrency TEXT,
        operatingCashflow TEXT, paymentsForOperatingActivities TEXT,
        proceedsFromOperatingActivities TEXT, changeInOperatingLiabilities TEXT,
        changeInOperatingAssets TEXT, depreciationDepletionAndAmortization TEXT,
        capitalExpenditures TEXT, changeInReceivables TEXT, changeInInventory TEXT,
        profitLoss TEXT, cashflowFromInvestment TEXT, cashflowFromFinancing TEXT,
        proceedsFromRepaymentsOfShortTermDebt TEXT, paymentsForRepurchaseOfCommonStock TEXT,
        paymentsForRepurchaseOfEquity TEXT, paymentsForRepurchaseOfPreferredStock TEXT,
        dividendPayout TEXT, dividendPayoutCommonStock TEXT, dividendPayoutPreferredStock TEXT,
        proceedsFromIssuanceOfCommonStock TEXT,
        proceedsFromIssuanceOfLongTermDebtAndCapitalSecuritiesNet TEXT,
        proceedsFromIssuanceOfPreferredStock TEXT, proceedsFromRepurchaseOfEquity TEXT,
        proceedsFromSaleOfTreasuryStock TEXT, changeInCashAndCashEquivalents TEXT,
        changeInExchangeRate TEXT, netIncome TEXT,
        PRIMARY KEY (symbol, fiscalDateEnding, reportType)
    );

    CREATE TABLE cash_flow (
        symbol TEXT, fiscalDateEnding TEXT, reportType TEXT, reportedCurrency TEXT,
        operatingCashflow TEXT, paymentsForOperatingActivities TEXT,
        proceedsFromOperatingActivities TEXT, changeInOperatingLiabilities TEXT,
        changeInOperatingAssets TEXT, depreciationDepletionAndAmortization TEXT,
        capitalExpenditures TEXT, changeInReceivables TEXT, changeInInventory TEXT,
        profitLoss TEXT, cashflowFromInvestment TEXT, cashflowFromFinancing TEXT,
        proceedsFromRepaymentsOfShortTermDebt TEXT, paymentsForRepurchaseOfCommonStock TEXT,
        paymentsForRepurchaseOfEquity TEXT, paymentsForRepurchaseOfPreferredStock TEXT,
        dividendPayout TEXT, dividendPayoutCommonStock TEXT, dividendPayoutPreferredStock TEXT,
        proceedsFromIssuanceOfCommonStock TEXT,
        proceedsFromIssuanceOfLongTermDebtAndCapitalSecuritiesNet TEXT,
        proceedsFromIssuanceOfPreferredStock TEXT, proceedsFromRepurchaseOfEquity TEXT,
        proceedsFromSaleOfTreasuryStock TEXT, changeInCashAndCashEquivalents TEXT,
        changeInExchangeRate TEXT, netIncome TEXT,
        PRIMARY KEY (symbol, fiscalDateEnding, reportType)
    );

    CREATE TABLE news_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, url TEXT UNIQUE,
        time_published TEXT, authors TEXT, summary TEXT, banner_image TEXT, source TEXT,
        category_within_source TEXT, source_domain TEXT, topics TEXT,
        overall_sentiment_score REAL, overall_sentiment_label TEXT, fetch_date TEXT
    );

    CREATE TABLE news_ticker_sentiment (
        article_id INTEGER, ticker_symbol TEXT, relevance_score TEXT,
        ticker_sentiment_score TEXT, ticker_sentiment_label TEXT
    );";

fn seed(conn: &Connection) {
    conn.execute_batch(
        "INSERT INTO company_overview
             (Symbol, AssetType, Name, Sector, Industry, MarketCapitalization, PERatio, DividendYield)
         VALUES
             ('WFC', 'Common Stock', 'Wells Fargo & Company', 'FINANCE', 'NATIONAL COMMERCIAL BANKS',
              '180000000000', '12.5', '0.028'),
             ('AAPL', 'Common Stock', 'Apple Inc', 'TECHNOLOGY', 'ELECTRONIC COMPUTERS',
              '2800000000000', 'None', '0.005');

         INSERT INTO company_intraday_data VALUES
             ('WFC', '2020-03-02 10:00:00', 30.0, 31.0, 29.5, 30.5, 1000),
             ('WFC', '2020-03-02 11:00:00', 30.5, 31.5, 30.0, 31.0, 1200),
             ('WFC', '2020-06-01 10:00:00', 27.0, 27.5, 26.5, 27.25, 900),
             ('AAPL', '2020-03-02 10:00:00', 70.0, 71.0, 69.0, 70.5, 5000);

         INSERT INTO balance_sheet
             (symbol, fiscalDateEnding, reportType, reportedCurrency,
              totalCurrentAssets, totalLiabilities, goodwill)
         VALUES
             ('WFC', '2018-12-31', 'annual', 'USD', '100', '900', '25'),
             ('WFC', '2019-12-31', 'annual', 'USD', '120', '950', 'None'),
             ('WFC', '2019-09-30', 'quarterly', 'USD', '110', '940', '26');

         INSERT INTO income_statement
             (symbol, fiscalDateEnding, reportType, reportedCurrency,
              proceedsFromOperatingActivities, depreciationDepletionAndAmortization,
              changeInOperatingLiabilities, paymentsForOperatingActivities,
              changeInOperatingAssets, changeInReceivables, changeInInventory,
              profitLoss, netIncome)
         VALUES
             ('WFC', '2019-12-31', 'annual', 'USD',
              '5000', '1200', '300', '4100', '-200', '150', 'None', '1900', '1850');

         INSERT INTO cash_flow
             (symbol, fiscalDateEnding, reportType, reportedCurrency, netIncome,
              depreciationDepletionAndAmortization, capitalExpenditures, dividendPayout,
              paymentsForRepurchaseOfCommonStock, cashflowFromInvestment, cashflowFromFinancing)
         VALUES
             ('WFC', '2019-12-31', 'annual', 'USD',
              '1850', '1200', '900', '800', '500', '-2500', '-1400');

         INSERT INTO news_articles (title, url, time_published, summary, source) VALUES
             ('Bank earnings beat estimates', 'https://news.test/1', '20200302T093000',
              'The bank reported strong earnings.', 'Wire'),
             ('Bank fined again', 'https://news.test/2', '20200303T120000',
              'Regulators fined the bank.', 'Wire'),
             ('Phones everywhere', 'https://news.test/3', '20200302T150000',
              'Phone sales rise.', 'Wire');

         INSERT INTO news_ticker_sentiment
             (article_id, ticker_symbol, relevance_score, ticker_sentiment_score, ticker_sentiment_label)
         VALUES
             (1, 'WFC', '0.8', '0.4', 'Bullish'),
             (2, 'WFC', '0.2', '-0.6', 'Bearish'),
             (3, 'AAPL', '0.9', '0.1', 'Neutral');",
    )
    .unwrap();
}
