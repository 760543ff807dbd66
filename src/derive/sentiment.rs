//! Sentiment score mapping and distribution aggregation.
//!
//! Maps labeled confidence records onto a signed [-1, 1] scale for the
//! timeline, and tallies label counts for the proportion displays. Neutral
//! records map to exactly 0 and are still plotted, so quarter coverage
//! stays visible.

use crate::models::{SentimentLabel, TranscriptRecord};
use serde::Serialize;

/// Map a (label, confidence) pair to a signed scalar in [-1, 1].
///
/// Positive maps to `+confidence`, negative to `-confidence`, neutral to
/// exactly 0 regardless of confidence.
pub fn sentiment_score(label: SentimentLabel, confidence: f64) -> f64 {
    match label {
        SentimentLabel::Positive => confidence,
        SentimentLabel::Negative => -confidence,
        SentimentLabel::Neutral => 0.0,
    }
}

/// One chart-ready point on the sentiment timeline.
///
/// Carries both the signed scores and the raw labels/confidences so the
/// rendering layer can annotate each bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// Quarter label, e.g. "Q3 2024".
    pub quarter: String,
    pub management: f64,
    pub qa: f64,
    pub management_label: SentimentLabel,
    pub qa_label: SentimentLabel,
    pub management_confidence: f64,
    pub qa_confidence: f64,
}

/// Build the sentiment timeline in chronological order.
///
/// The backend returns transcripts most recent quarter first, so the
/// sequence is reversed for charting.
pub fn timeline(transcripts: &[TranscriptRecord]) -> Vec<TimelinePoint> {
    transcripts
        .iter()
        .rev()
        .map(|t| TimelinePoint {
            quarter: t.quarter_label(),
            management: sentiment_score(
                t.management_sentiment.sentiment,
                t.management_sentiment.confidence,
            ),
            qa: sentiment_score(t.qa_sentiment.sentiment, t.qa_sentiment.confidence),
            management_label: t.management_sentiment.sentiment,
            qa_label: t.qa_sentiment.sentiment,
            management_confidence: t.management_sentiment.confidence,
            qa_confidence: t.qa_sentiment.confidence,
        })
        .collect()
}

/// Label counts for one transcript section across all quarters.
///
/// Zero-count categories remain valid entries in the tally; only the
/// proportion display drops them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    /// Total number of records tallied.
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Non-zero (label, count) entries for the proportion display, in
    /// positive/neutral/negative order.
    pub fn slices(&self) -> Vec<(SentimentLabel, usize)> {
        [
            (SentimentLabel::Positive, self.positive),
            (SentimentLabel::Neutral, self.neutral),
            (SentimentLabel::Negative, self.negative),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

/// Sentiment label distribution for management and Q&A sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub management: SentimentTally,
    pub qa: SentimentTally,
}

/// Tally management and Q&A sentiment labels across all transcripts.
pub fn distribution(transcripts: &[TranscriptRecord]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();

    for t in transcripts {
        dist.management.bump(t.management_sentiment.sentiment);
        dist.qa.bump(t.qa_sentiment.sentiment);
    }

    dist
}
