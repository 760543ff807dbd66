//! Tone-change presentation mapping.
//!
//! Turns the backend's free-form tone-change strings into signed direction
//! indicators, display labels, and a coarse trend category.

use crate::models::ToneChangeRecord;
use serde::Serialize;

/// Coarse color/icon category for a trend string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Positive,
    Negative,
    Neutral,
}

impl TrendCategory {
    /// Marker glyph for the category.
    pub fn marker(&self) -> &'static str {
        match self {
            TrendCategory::Positive => "🟢",
            TrendCategory::Negative => "🔴",
            TrendCategory::Neutral => "⚪",
        }
    }
}

/// Map a tone-change string to a signed direction indicator.
///
/// "improving" is +1, "deteriorating" is -1, anything else (stable,
/// unknown, insufficient data) is 0.
pub fn direction(change: &str) -> i8 {
    match change {
        "improving" => 1,
        "deteriorating" => -1,
        _ => 0,
    }
}

/// Classify a trend string by substring match.
///
/// This is deliberately fuzzy, matching the original behavior: any value
/// containing "improving" is positive, any containing "deteriorating" is
/// negative, and everything else ("mixed" included) falls through to
/// neutral.
pub fn trend_category(trend: &str) -> TrendCategory {
    if trend.contains("improving") {
        TrendCategory::Positive
    } else if trend.contains("deteriorating") {
        TrendCategory::Negative
    } else {
        TrendCategory::Neutral
    }
}

/// Display label for a trend string: underscores become spaces, upper-cased.
pub fn trend_label(trend: &str) -> String {
    trend.replace('_', " ").to_uppercase()
}

/// Icon for the known trend values, with a fallback for anything else.
pub fn trend_icon(trend: &str) -> &'static str {
    match trend {
        "consistently_improving" => "📈",
        "consistently_deteriorating" => "📉",
        "generally_improving" => "↗️",
        "generally_deteriorating" => "↘️",
        "mixed" => "↔️",
        _ => "❓",
    }
}

/// Trend header for the dashboard: raw value plus its derived presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendIndicator {
    pub raw: String,
    pub label: String,
    pub category: TrendCategory,
    pub icon: &'static str,
}

impl TrendIndicator {
    pub fn from_trend(trend: &str) -> Self {
        Self {
            raw: trend.to_string(),
            label: trend_label(trend),
            category: trend_category(trend),
            icon: trend_icon(trend),
        }
    }
}

/// One chart-ready quarter-over-quarter change entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneChangePoint {
    /// Period label, e.g. "Q3 2024 → Q4 2024".
    pub period: String,
    pub score_change: f64,
    pub management_direction: i8,
    pub qa_direction: i8,
    pub overall_change: String,
}

/// Derive per-entry direction indicators for the change chart.
pub fn change_points(changes: &[ToneChangeRecord]) -> Vec<ToneChangePoint> {
    changes
        .iter()
        .map(|change| ToneChangePoint {
            period: change.period_label(),
            score_change: change.score_change,
            management_direction: direction(&change.management_tone_change),
            qa_direction: direction(&change.qa_tone_change),
            overall_change: change.overall_change.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_mapping() {
        assert_eq!(direction("improving"), 1);
        assert_eq!(direction("deteriorating"), -1);
        assert_eq!(direction("stable"), 0);
        assert_eq!(direction("volatile"), 0);
        assert_eq!(direction(""), 0);
    }

    #[test]
    fn test_trend_category_substring_match() {
        assert_eq!(
            trend_category("consistently_improving"),
            TrendCategory::Positive
        );
        assert_eq!(
            trend_category("generally_improving"),
            TrendCategory::Positive
        );
        assert_eq!(
            trend_category("consistently_deteriorating"),
            TrendCategory::Negative
        );
        assert_eq!(
            trend_category("generally_deteriorating"),
            TrendCategory::Negative
        );
    }

    #[test]
    fn test_mixed_falls_through_to_neutral() {
        // Inherited fuzzy rule: "mixed" matches neither substring
        assert_eq!(trend_category("mixed"), TrendCategory::Neutral);
        assert_eq!(trend_category("insufficient_data"), TrendCategory::Neutral);
        assert_eq!(trend_category("volatile"), TrendCategory::Neutral);
    }

    #[test]
    fn test_trend_label_display() {
        assert_eq!(
            trend_label("consistently_deteriorating"),
            "CONSISTENTLY DETERIORATING"
        );
        assert_eq!(trend_label("mixed"), "MIXED");
    }

    #[test]
    fn test_deteriorating_indicator() {
        let indicator = TrendIndicator::from_trend("consistently_deteriorating");
        assert_eq!(indicator.category, TrendCategory::Negative);
        assert_eq!(indicator.label, "CONSISTENTLY DETERIORATING");
        assert_eq!(indicator.icon, "📉");
    }

    #[test]
    fn test_unknown_trend_icon_fallback() {
        assert_eq!(trend_icon("volatile"), "❓");
        assert_eq!(trend_icon("generally_improving"), "↗️");
    }

    #[test]
    fn test_change_points() {
        let change = ToneChangeRecord {
            from_quarter: "Q1 2025".to_string(),
            to_quarter: "Q2 2025".to_string(),
            management_tone_change: "improving".to_string(),
            qa_tone_change: "deteriorating".to_string(),
            overall_change: "stable".to_string(),
            score_change: 0.05,
            tone_shift_description: None,
            confidence_changes: None,
            key_topics_evolved: None,
            strategic_messaging_shift: None,
            language_style_changes: None,
            forward_looking_tone: None,
            llm_confidence: None,
            llm_analysis: None,
        };

        let points = change_points(&[change]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].period, "Q1 2025 → Q2 2025");
        assert_eq!(points[0].management_direction, 1);
        assert_eq!(points[0].qa_direction, -1);
        assert_eq!(points[0].score_change, 0.05);
    }
}
