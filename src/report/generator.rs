//! Markdown dashboard generation.
//!
//! Renders the derived dashboard view (plus the raw snapshot for the
//! detail sections) as a Markdown report, and serializes the view for the
//! JSON output mode.

use crate::derive::DashboardView;
use crate::models::{AnalysisData, ToneChangeRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Metadata about the report itself, not the analysis.
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    pub backend_url: String,
    pub from_cache: bool,
    pub generated_at: DateTime<Utc>,
}

/// Rendering knobs from the `[report]` config section.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include the enhanced-narrative blocks on change cards.
    pub include_narratives: bool,
    /// Include the per-quarter transcript cards section.
    pub include_transcripts: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_narratives: true,
            include_transcripts: true,
        }
    }
}

/// Generate the complete Markdown dashboard report.
pub fn generate_markdown_report(
    data: &AnalysisData,
    view: &DashboardView,
    metadata: &ReportMetadata,
    options: &ReportOptions,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Earnings Tone Dashboard: {}\n\n", view.ticker));

    output.push_str(&generate_metadata_section(view, metadata));
    output.push_str(&generate_trend_section(view));
    output.push_str(&generate_timeline_section(view));
    output.push_str(&generate_distribution_section(view));
    output.push_str(&generate_changes_section(data, options));
    output.push_str(&generate_focus_section(data, view));

    if options.include_transcripts {
        output.push_str(&generate_transcript_section(data));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report from the derived view.
pub fn generate_json_report(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

/// Compact summary printed to the terminal after the report is written.
pub fn terminal_summary(view: &DashboardView, from_cache: bool) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "   Ticker: {} ({} quarters analyzed{})",
        view.ticker,
        view.quarters_analyzed,
        if from_cache { ", cached" } else { "" }
    ));
    lines.push(format!(
        "   Tone trend: {} {} {}",
        view.trend.icon,
        view.trend.label,
        view.trend.category.marker()
    ));

    if let Some(theme) = view.top_themes.first() {
        lines.push(format!(
            "   Top theme: {} ({} quarters)",
            theme.title, theme.count
        ));
    }

    lines.join("\n")
}

/// Generate the metadata section.
fn generate_metadata_section(view: &DashboardView, metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Ticker:** {}\n", view.ticker));
    section.push_str(&format!(
        "- **Quarters Analyzed:** {}\n",
        view.quarters_analyzed
    ));
    section.push_str(&format!(
        "- **Analysis Timestamp:** {}\n",
        view.analysis_timestamp
    ));
    section.push_str(&format!("- **Backend:** {}\n", metadata.backend_url));
    section.push_str(&format!(
        "- **Served From Cache:** {}\n",
        if metadata.from_cache { "yes" } else { "no" }
    ));
    section.push_str(&format!(
        "- **Report Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

/// Generate the tone trend indicator section.
fn generate_trend_section(view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str("## Tone Trend\n\n");
    section.push_str(&format!(
        "{} **{}** {}\n\n",
        view.trend.icon,
        view.trend.label,
        view.trend.category.marker()
    ));

    if !view.summary.is_empty() {
        section.push_str(&format!("> {}\n\n", view.summary));
    }

    section
}

/// Generate the chronological sentiment timeline table.
fn generate_timeline_section(view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Timeline\n\n");
    section.push_str("Signed scores in [-1, 1]: positive sentiment maps to +confidence, ");
    section.push_str("negative to -confidence, neutral to 0.\n\n");
    section.push_str("| Quarter | Management | Score | Q&A | Score |\n");
    section.push_str("|:---|:---|---:|:---|---:|\n");

    for point in &view.timeline {
        section.push_str(&format!(
            "| {} | {} ({}%) | {} | {} ({}%) | {} |\n",
            point.quarter,
            point.management_label.badge(),
            fmt_pct(point.management_confidence),
            fmt_signed(point.management),
            point.qa_label.badge(),
            fmt_pct(point.qa_confidence),
            fmt_signed(point.qa),
        ));
    }
    section.push('\n');

    section
}

/// Generate the sentiment distribution section.
fn generate_distribution_section(view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Distribution\n\n");

    for (name, tally) in [
        ("Management", &view.distribution.management),
        ("Q&A", &view.distribution.qa),
    ] {
        section.push_str(&format!("**{}:** ", name));

        let total = tally.total();
        let slices: Vec<String> = tally
            .slices()
            .into_iter()
            .map(|(label, count)| {
                let percent = (count as f64 / total as f64) * 100.0;
                format!("{} {} ({:.0}%)", label.badge(), count, percent)
            })
            .collect();

        section.push_str(&slices.join(" | "));
        section.push_str("\n\n");
    }

    section
}

/// Generate the quarter-over-quarter change cards.
fn generate_changes_section(data: &AnalysisData, options: &ReportOptions) -> String {
    let mut section = String::new();

    section.push_str("## Quarter-over-Quarter Tone Changes\n\n");

    if data.tone_changes.changes.is_empty() {
        section.push_str("No quarter-over-quarter changes available.\n\n");
        return section;
    }

    for change in &data.tone_changes.changes {
        section.push_str(&generate_change_card(change, options));
    }

    section
}

/// Generate one change card, with the optional narrative block.
fn generate_change_card(change: &ToneChangeRecord, options: &ReportOptions) -> String {
    let mut card = String::new();

    card.push_str(&format!("### {}\n\n", change.period_label()));
    card.push_str(&format!(
        "- **Management:** {} {}\n",
        direction_marker(&change.management_tone_change),
        change.management_tone_change.to_uppercase()
    ));
    card.push_str(&format!(
        "- **Q&A:** {} {}\n",
        direction_marker(&change.qa_tone_change),
        change.qa_tone_change.to_uppercase()
    ));
    card.push_str(&format!(
        "- **Overall:** {}\n",
        change.overall_change.to_uppercase()
    ));
    card.push_str(&format!(
        "- **Score Change:** {}\n\n",
        fmt_signed(change.score_change)
    ));

    if options.include_narratives {
        card.push_str(&generate_narrative_block(change));
    }

    card
}

/// Generate the enhanced-narrative block for one change card.
fn generate_narrative_block(change: &ToneChangeRecord) -> String {
    if !change.has_narrative() {
        return "_No enhanced analysis available._\n\n".to_string();
    }

    let mut block = String::new();
    block.push_str("#### 🤖 AI-Enhanced Analysis\n\n");

    let items: [(&str, &Option<String>); 5] = [
        ("📊 Tone Evolution", &change.tone_shift_description),
        ("🎯 Strategic Messaging", &change.strategic_messaging_shift),
        ("🎭 Confidence Changes", &change.confidence_changes),
        ("📝 Language Style", &change.language_style_changes),
        ("🔮 Forward Outlook", &change.forward_looking_tone),
    ];

    for (label, value) in items {
        if let Some(text) = value {
            block.push_str(&format!("- **{}:** {}\n", label, text));
        }
    }

    if let Some(topics) = &change.key_topics_evolved {
        if !topics.is_empty() {
            block.push_str(&format!("- **🔑 Evolved Topics:** {}\n", topics.join(", ")));
        }
    }

    if let Some(confidence) = &change.llm_confidence {
        block.push_str(&format!(
            "- **AI Confidence:** {}\n",
            confidence.to_uppercase()
        ));
    }

    block.push('\n');
    block
}

/// Generate the strategic focuses section with top themes.
fn generate_focus_section(data: &AnalysisData, view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str("## Strategic Focuses\n\n");

    if !view.top_themes.is_empty() {
        section.push_str("### Top Themes Across All Quarters\n\n");
        for theme in &view.top_themes {
            section.push_str(&format!("- **{}** ({}Q)\n", theme.title, theme.count));
        }
        section.push('\n');
    }

    for quarter in &data.strategic_focuses {
        section.push_str(&format!("### {}\n\n", quarter.quarter_label()));

        for focus in &quarter.focuses {
            section.push_str(&format!(
                "- {} **{}** [{}]: {}\n",
                focus.importance.marker(),
                focus.title,
                focus.importance.badge(),
                focus.description
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-quarter transcript cards.
fn generate_transcript_section(data: &AnalysisData) -> String {
    let mut section = String::new();

    section.push_str("## Transcripts\n\n");

    for transcript in &data.transcripts {
        section.push_str(&format!(
            "### {} Earnings Call\n\n",
            transcript.quarter_label()
        ));
        section.push_str(&format!(
            "[View Original Transcript]({})\n\n",
            transcript.transcript_url
        ));
        section.push_str(&format!(
            "- **Management Remarks:** {} segments — {} ({}%)\n",
            transcript.prepared_remarks_count,
            transcript.management_sentiment.sentiment.badge(),
            fmt_pct(transcript.management_sentiment.confidence)
        ));
        section.push_str(&format!(
            "- **Q&A Session:** {} exchanges — {} ({}%)\n\n",
            transcript.qa_count,
            transcript.qa_sentiment.sentiment.badge(),
            fmt_pct(transcript.qa_sentiment.confidence)
        ));

        let management = &transcript.management_sentiment.scores;
        let qa = &transcript.qa_sentiment.scores;
        section.push_str("| Section | Positive | Neutral | Negative |\n");
        section.push_str("|:---|---:|---:|---:|\n");
        section.push_str(&format!(
            "| Management | {}% | {}% | {}% |\n",
            fmt_pct(management.positive),
            fmt_pct(management.neutral),
            fmt_pct(management.negative)
        ));
        section.push_str(&format!(
            "| Q&A | {}% | {}% | {}% |\n\n",
            fmt_pct(qa.positive),
            fmt_pct(qa.neutral),
            fmt_pct(qa.negative)
        ));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by calltone*\n".to_string()
}

/// Map a tone-change string to a direction arrow.
fn direction_marker(change: &str) -> &'static str {
    match crate::derive::tone::direction(change) {
        1 => "▲",
        -1 => "▼",
        _ => "▬",
    }
}

/// Format a signed score with an explicit `+` for positive values.
fn fmt_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.3}", value)
    } else {
        format!("{:.3}", value)
    }
}

/// Format a [0, 1] fraction as a percentage with one decimal.
fn fmt_pct(value: f64) -> String {
    format!("{:.1}", value * 100.0)
}
