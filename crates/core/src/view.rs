//! Projection of a [`QueryState`] into what a front end should draw.
//!
//! Exactly one [`RenderBranch`] applies to any state, so a renderer that
//! matches on it cannot show a spinner next to an error banner.

use crate::state::{QueryState, SearchStatus};
use crate::SearchResult;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Try a different query.";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    /// Stable rendering key; the result id.
    pub key: String,
    pub id_label: String,
    pub score_label: String,
    pub line_label: String,
    pub source: Option<String>,
    pub document: String,
}

impl From<&SearchResult> for ResultCard {
    fn from(result: &SearchResult) -> Self {
        Self {
            key: result.id.clone(),
            id_label: format!("ID: {}", result.id),
            score_label: format_score(result.score),
            line_label: format_line(result.metadata.line_number),
            source: result.metadata.source.clone(),
            document: result.document.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBranch {
    /// Nothing to show: idle, or an empty success with no query text.
    Blank,
    Loading,
    ErrorBanner(String),
    /// Cards in the order the backend returned them.
    Results(Vec<ResultCard>),
    NoResults,
}

pub fn project(state: &QueryState) -> RenderBranch {
    match state.status() {
        SearchStatus::Idle => RenderBranch::Blank,
        SearchStatus::Loading { .. } => RenderBranch::Loading,
        SearchStatus::Error(message) => RenderBranch::ErrorBanner(message.clone()),
        SearchStatus::Success(results) if results.is_empty() => {
            if state.query_text().is_empty() {
                RenderBranch::Blank
            } else {
                RenderBranch::NoResults
            }
        }
        SearchStatus::Success(results) => {
            RenderBranch::Results(results.iter().map(ResultCard::from).collect())
        }
    }
}

/// Whether the submit control should be enabled.
pub fn submit_enabled(state: &QueryState) -> bool {
    !state.is_loading() && !state.query_text().trim().is_empty()
}

/// `0.873` becomes `"87.3%"`. Ties round away from zero, so `0.8125` is
/// `"81.3%"` rather than the banker's `"81.2%"`.
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", (score * 1000.0).round() / 10.0)
}

pub fn format_line(line_number: i64) -> String {
    format!("Line {line_number}")
}
