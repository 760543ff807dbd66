//! Strategic theme frequency aggregation.
//!
//! Counts recurring focus titles across quarters and ranks them for the
//! top-themes display.

use crate::models::QuarterlyFocus;
use serde::Serialize;
use std::collections::HashMap;

/// Number of themes shown in the top-themes display.
pub const DEFAULT_THEME_LIMIT: usize = 5;

/// A focus title with the number of quarters it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeCount {
    pub title: String,
    pub count: usize,
}

/// Rank focus titles by how often they occur across all quarters.
///
/// Titles match exactly (case-sensitive). Ordering is descending by count
/// with a stable first-seen tie-break, truncated to `limit` entries.
pub fn top_themes(focuses: &[QuarterlyFocus], limit: usize) -> Vec<ThemeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for quarter in focuses {
        for focus in &quarter.focuses {
            let entry = counts.entry(focus.title.as_str()).or_insert(0);
            if *entry == 0 {
                first_seen.push(focus.title.as_str());
            }
            *entry += 1;
        }
    }

    let mut ranked: Vec<ThemeCount> = first_seen
        .into_iter()
        .map(|title| ThemeCount {
            title: title.to_string(),
            count: counts[title],
        })
        .collect();

    // Stable sort preserves first-seen order among equal counts
    ranked.sort_by_key(|theme| std::cmp::Reverse(theme.count));
    ranked.truncate(limit);

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiResponse, Importance, StrategicFocus};

    const FIXTURE: &str = include_str!("../../fixtures/analysis_nvda.json");

    fn quarter(quarter: u8, year: i32, titles: &[(&str, Importance)]) -> QuarterlyFocus {
        QuarterlyFocus {
            quarter,
            year,
            focuses: titles
                .iter()
                .map(|(title, importance)| StrategicFocus {
                    title: title.to_string(),
                    description: String::new(),
                    importance: *importance,
                })
                .collect(),
        }
    }

    #[test]
    fn test_frequency_counts() {
        let focuses = vec![
            quarter(1, 2025, &[("A", Importance::High), ("B", Importance::Medium)]),
            quarter(2, 2025, &[("A", Importance::Low)]),
        ];

        let themes = top_themes(&focuses, DEFAULT_THEME_LIMIT);

        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].title, "A");
        assert_eq!(themes[0].count, 2);
        assert_eq!(themes[1].title, "B");
        assert_eq!(themes[1].count, 1);
    }

    #[test]
    fn test_titles_match_case_sensitively() {
        let focuses = vec![
            quarter(1, 2025, &[("AI Demand", Importance::High)]),
            quarter(2, 2025, &[("ai demand", Importance::High)]),
        ];

        let themes = top_themes(&focuses, DEFAULT_THEME_LIMIT);
        assert_eq!(themes.len(), 2);
        assert!(themes.iter().all(|t| t.count == 1));
    }

    #[test]
    fn test_stable_tie_break_is_first_seen() {
        let focuses = vec![
            quarter(
                1,
                2025,
                &[("First", Importance::High), ("Second", Importance::High)],
            ),
            quarter(
                2,
                2025,
                &[("Second", Importance::Low), ("First", Importance::Low)],
            ),
        ];

        let themes = top_themes(&focuses, DEFAULT_THEME_LIMIT);
        assert_eq!(themes[0].title, "First");
        assert_eq!(themes[1].title, "Second");
    }

    #[test]
    fn test_truncates_to_limit() {
        let focuses = vec![quarter(
            1,
            2025,
            &[
                ("A", Importance::High),
                ("B", Importance::High),
                ("C", Importance::High),
            ],
        )];

        let themes = top_themes(&focuses, 2);
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].title, "A");
        assert_eq!(themes[1].title, "B");
    }

    #[test]
    fn test_fixture_ranking() {
        let response: ApiResponse = serde_json::from_str(FIXTURE).unwrap();
        let data = response.data.unwrap();

        let themes = top_themes(&data.strategic_focuses, DEFAULT_THEME_LIMIT);

        assert_eq!(themes.len(), 5);
        // AI Demand and Supply Chain both appear in 3 quarters; AI Demand is
        // seen first (Q2 2025 is the first record)
        assert_eq!(themes[0].title, "AI Demand");
        assert_eq!(themes[0].count, 3);
        assert_eq!(themes[1].title, "Supply Chain");
        assert_eq!(themes[1].count, 3);
        assert_eq!(themes[2].title, "Data Center Growth");
        assert_eq!(themes[2].count, 2);
        // Gaming Recovery (count 1, last seen) is truncated away
        assert!(themes.iter().all(|t| t.title != "Gaming Recovery"));
    }

    #[test]
    fn test_empty_input() {
        assert!(top_themes(&[], DEFAULT_THEME_LIMIT).is_empty());
    }
}
