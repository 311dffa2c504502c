//! Word-cloud terms counted from news article text.

use models::{QueryResult, Row};
use serde_json::Value;
use std::collections::HashMap;

/// Number of terms returned to the word cloud.
pub const TERM_LIMIT: usize = 15;

const MIN_TERM_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "about", "after", "again", "against", "all", "also", "and", "any", "are", "because", "been",
    "before", "being", "between", "both", "but", "can", "could", "did", "does", "doing", "down",
    "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "her",
    "here", "hers", "him", "his", "how", "into", "its", "itself", "just", "more", "most", "new",
    "nor", "not", "now", "off", "once", "only", "other", "our", "ours", "out", "over", "own",
    "said", "same", "says", "she", "should", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "too", "under", "until",
    "very", "was", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "year", "you", "your",
];

#[derive(Debug, Default)]
struct Tally {
    count: u64,
    scored: u64,
    weighted: f64,
}

/// Counts terms over `title` and `summary` of each article row.
///
/// Each occurrence carries its article's `ticker_sentiment_score`. Rows without a
/// score still count but do not weigh in; a term with no scored occurrence is
/// neutral (0.0). Output is sorted by count, then term.
pub fn top_terms(articles: &QueryResult, limit: usize) -> QueryResult {
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for article in articles {
        let score = article.get("ticker_sentiment_score").and_then(score_of);
        for field in ["title", "summary"] {
            let Some(text) = article.get(field).and_then(Value::as_str) else {
                continue;
            };
            for term in tokenize(text) {
                let tally = tallies.entry(term).or_default();
                tally.count += 1;
                if let Some(score) = score {
                    tally.scored += 1;
                    tally.weighted += score;
                }
            }
        }
    }

    let mut ranked: Vec<(String, Tally)> = tallies.into_iter().collect();
    ranked.sort_by(|(a_term, a), (b_term, b)| b.count.cmp(&a.count).then_with(|| a_term.cmp(b_term)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(term, tally)| {
            let mut row = Row::new();
            row.insert("word".to_string(), Value::from(term));
            row.insert("occurrence_count".to_string(), Value::from(tally.count));
            let sentiment = if tally.scored > 0 {
                tally.weighted / tally.scored as f64
            } else {
                0.0
            };
            row.insert("weighted_sentiment_score".to_string(), Value::from(sentiment));
            row
        })
        .collect()
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TERM_LEN)
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_lowercase)
        .filter(|word| !STOPWORDS.contains(&word.as_str()))
}

// Scores are stored as text by the collector
fn score_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
