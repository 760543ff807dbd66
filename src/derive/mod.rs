//! The derivation engine.
//!
//! Pure functions mapping an `AnalysisData` snapshot into chart-ready
//! series and summary labels. No I/O, no hidden state: deriving twice from
//! the same snapshot yields identical output.

pub mod sentiment;
pub mod themes;
pub mod tone;

pub use sentiment::{SentimentDistribution, TimelinePoint};
pub use themes::{ThemeCount, DEFAULT_THEME_LIMIT};
pub use tone::{ToneChangePoint, TrendCategory, TrendIndicator};

use crate::models::AnalysisData;
use serde::Serialize;

/// Everything the rendering layer needs, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub ticker: String,
    pub quarters_analyzed: usize,
    pub analysis_timestamp: String,
    /// Chronological per-quarter signed sentiment scores.
    pub timeline: Vec<TimelinePoint>,
    pub distribution: SentimentDistribution,
    pub trend: TrendIndicator,
    /// Backend-written trend summary, passed through verbatim.
    pub summary: String,
    pub changes: Vec<ToneChangePoint>,
    pub top_themes: Vec<ThemeCount>,
}

/// Derive the full dashboard view from an analysis snapshot.
pub fn build_view(data: &AnalysisData, theme_limit: usize) -> DashboardView {
    DashboardView {
        ticker: data.ticker.clone(),
        quarters_analyzed: data.quarters_analyzed,
        analysis_timestamp: data.analysis_timestamp.clone(),
        timeline: sentiment::timeline(&data.transcripts),
        distribution: sentiment::distribution(&data.transcripts),
        trend: TrendIndicator::from_trend(&data.tone_changes.overall_trend),
        summary: data.tone_changes.summary.clone(),
        changes: tone::change_points(&data.tone_changes.changes),
        top_themes: themes::top_themes(&data.strategic_focuses, theme_limit),
    }
}
