//! Data models for the earnings-call dashboard.
//!
//! These types mirror the backend JSON exactly. An `AnalysisData` value is
//! an immutable snapshot: it is replaced wholesale on each successful
//! analysis request and never mutated or merged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label assigned by the backend to a transcript segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Lowercase wire form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Uppercase form used in card badges.
    pub fn badge(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-label probability scores for a transcript segment.
///
/// The backend emits scores that sum to roughly 1; this layer does not
/// enforce that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// A labeled confidence distribution for one transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentiment: SentimentLabel,
    /// Confidence in the winning label, in [0, 1].
    pub confidence: f64,
    pub scores: SentimentScores,
}

/// Sentiment analysis of a single quarterly earnings call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Fiscal quarter, 1 through 4.
    pub quarter: u8,
    pub year: i32,
    pub transcript_url: String,
    pub management_sentiment: SentimentRecord,
    pub qa_sentiment: SentimentRecord,
    /// Number of prepared-remarks segments analyzed.
    pub prepared_remarks_count: usize,
    /// Number of Q&A exchanges analyzed.
    pub qa_count: usize,
}

impl TranscriptRecord {
    /// Display label for the quarter, e.g. "Q3 2024".
    pub fn quarter_label(&self) -> String {
        format!("Q{} {}", self.quarter, self.year)
    }
}

/// Derived qualitative comparison between two adjacent quarters.
///
/// The tone-change strings (`management_tone_change`, `qa_tone_change`,
/// `overall_change`) are free-form backend output. The enhanced-narrative
/// fields are optional; their absence is the first-class "no enhanced
/// analysis available" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneChangeRecord {
    pub from_quarter: String,
    pub to_quarter: String,
    pub management_tone_change: String,
    pub qa_tone_change: String,
    pub overall_change: String,
    /// Signed score delta in [-1, 1].
    pub score_change: f64,

    // Enhanced LLM analysis fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_shift_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_topics_evolved: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategic_messaging_shift: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_style_changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_looking_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_confidence: Option<String>,
    /// Legacy field kept for older cached payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_analysis: Option<String>,
}

impl ToneChangeRecord {
    /// Display label for the compared period, e.g. "Q2 2024 → Q3 2024".
    pub fn period_label(&self) -> String {
        format!("{} → {}", self.from_quarter, self.to_quarter)
    }

    /// Whether any enhanced-narrative field is present.
    pub fn has_narrative(&self) -> bool {
        self.tone_shift_description.is_some()
            || self.confidence_changes.is_some()
            || self
                .key_topics_evolved
                .as_ref()
                .is_some_and(|t| !t.is_empty())
            || self.strategic_messaging_shift.is_some()
            || self.language_style_changes.is_some()
            || self.forward_looking_tone.is_some()
    }
}

/// Tone-change section of the analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneChangesData {
    /// Free-form trend string, e.g. "generally_improving".
    pub overall_trend: String,
    pub summary: String,
    pub changes: Vec<ToneChangeRecord>,
}

/// Importance tier of a strategic focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    /// Returns a marker glyph for the importance tier.
    pub fn marker(&self) -> &'static str {
        match self {
            Importance::High => "🔴",
            Importance::Medium => "🟡",
            Importance::Low => "🟢",
        }
    }

    /// Uppercase form used in badges.
    pub fn badge(&self) -> &'static str {
        match self {
            Importance::High => "HIGH",
            Importance::Medium => "MEDIUM",
            Importance::Low => "LOW",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Importance::High => write!(f, "high"),
            Importance::Medium => write!(f, "medium"),
            Importance::Low => write!(f, "low"),
        }
    }
}

/// A named theme extracted by the backend from one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicFocus {
    pub title: String,
    pub description: String,
    pub importance: Importance,
}

/// Strategic focuses for one quarter, in backend ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFocus {
    pub quarter: u8,
    pub year: i32,
    pub focuses: Vec<StrategicFocus>,
}

impl QuarterlyFocus {
    pub fn quarter_label(&self) -> String {
        format!("Q{} {}", self.quarter, self.year)
    }
}

/// Root analysis payload, received per successful `/api/analyze` request.
///
/// Transcripts and tone changes are ordered most recent quarter first, as
/// the backend returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub ticker: String,
    pub quarters_analyzed: usize,
    pub transcripts: Vec<TranscriptRecord>,
    pub tone_changes: ToneChangesData,
    pub strategic_focuses: Vec<QuarterlyFocus>,
    pub analysis_timestamp: String,
}

/// Outcome discriminator of the backend response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Response envelope shared by all backend endpoints.
///
/// On error, `message` holds a human-readable explanation. On success from
/// `/api/analyze`, `data` holds the analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/analysis_nvda.json");

    #[test]
    fn test_sentiment_label_wire_form() {
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Positive).unwrap(),
            "\"positive\""
        );
        let label: SentimentLabel = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(label, SentimentLabel::Neutral);
        assert_eq!(label.badge(), "NEUTRAL");
    }

    #[test]
    fn test_importance_markers() {
        assert_eq!(Importance::High.marker(), "🔴");
        assert_eq!(Importance::Medium.marker(), "🟡");
        assert_eq!(Importance::Low.marker(), "🟢");
        assert_eq!(Importance::High.badge(), "HIGH");
    }

    #[test]
    fn test_quarter_label() {
        let record: TranscriptRecord = serde_json::from_value(serde_json::json!({
            "quarter": 3,
            "year": 2024,
            "transcript_url": "https://example.com/q3",
            "management_sentiment": {
                "sentiment": "positive",
                "confidence": 0.9,
                "scores": {"positive": 0.9, "negative": 0.05, "neutral": 0.05}
            },
            "qa_sentiment": {
                "sentiment": "neutral",
                "confidence": 0.6,
                "scores": {"positive": 0.3, "negative": 0.1, "neutral": 0.6}
            },
            "prepared_remarks_count": 12,
            "qa_count": 8
        }))
        .unwrap();

        assert_eq!(record.quarter_label(), "Q3 2024");
        assert_eq!(record.qa_sentiment.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn test_fixture_deserializes() {
        let response: ApiResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(response.status, ApiStatus::Success);
        assert_eq!(response.from_cache, Some(true));

        let data = response.data.expect("fixture has data");
        assert_eq!(data.ticker, "NVDA");
        assert_eq!(data.quarters_analyzed, 4);
        assert_eq!(data.transcripts.len(), 4);
        assert_eq!(data.tone_changes.changes.len(), 3);
        assert_eq!(data.strategic_focuses.len(), 4);
    }

    #[test]
    fn test_narrative_absence_is_explicit() {
        let response: ApiResponse = serde_json::from_str(FIXTURE).unwrap();
        let data = response.data.unwrap();

        let with_narrative = &data.tone_changes.changes[0];
        assert!(with_narrative.has_narrative());
        assert!(with_narrative.tone_shift_description.is_some());

        let without_narrative = &data.tone_changes.changes[2];
        assert!(!without_narrative.has_narrative());
        assert!(without_narrative.tone_shift_description.is_none());
    }

    #[test]
    fn test_period_label() {
        let response: ApiResponse = serde_json::from_str(FIXTURE).unwrap();
        let change = response.data.unwrap().tone_changes.changes[0].clone();
        assert_eq!(
            change.period_label(),
            format!("{} → {}", change.from_quarter, change.to_quarter)
        );
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"status": "error", "message": "No transcripts found for XYZ"}"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, ApiStatus::Error);
        assert_eq!(
            response.message.as_deref(),
            Some("No transcripts found for XYZ")
        );
        assert!(response.data.is_none());
    }
}
