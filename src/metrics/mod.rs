//! Numbers derived on the client from server data.
//!
//! Everything here is a pure function over already-decoded records.

use serde::Serialize;

use crate::models::{BacklinkSummary, HistoryPoint, RankHistory, RankStats};

/// Monthly price the cost tracker compares usage against.
pub const COMPARISON_MONTHLY_PRICE: f64 = 129.0;

/// Lower bound of the rank history chart's position axis.
pub const HISTORY_AXIS_FLOOR: u32 = 20;

/// Days of history the movers widget compares.
pub const MOVERS_WINDOW_DAYS: u32 = 7;
pub const MOVERS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankBucket {
    pub label: &'static str,
    pub value: i64,
    pub color: &'static str,
}

/// Split cumulative top-N counts into disjoint chart slices.
pub fn rank_distribution(stats: &RankStats) -> Vec<RankBucket> {
    let top_3 = i64::from(stats.top_3);
    let top_10 = i64::from(stats.top_10);
    let top_20 = i64::from(stats.top_20);
    let top_50 = i64::from(stats.top_50);

    vec![
        RankBucket {
            label: "Top 3 (1-3)",
            value: top_3,
            color: "#10b981",
        },
        RankBucket {
            label: "Top 10 (4-10)",
            value: top_10 - top_3,
            color: "#3b82f6",
        },
        RankBucket {
            label: "Top 20 (11-20)",
            value: top_20 - top_10,
            color: "#f59e0b",
        },
        RankBucket {
            label: "Top 50 (21-50)",
            value: top_50 - top_20,
            color: "#ef4444",
        },
        RankBucket {
            label: "Below 50",
            value: i64::from(stats.not_ranking),
            color: "#6b7280",
        },
    ]
}

/// Whole-number share of each bucket, as shown next to the slice label.
pub fn bucket_percentages(buckets: &[RankBucket]) -> Vec<u32> {
    let total: i64 = buckets.iter().map(|b| b.value.max(0)).sum();
    buckets
        .iter()
        .map(|b| {
            if total == 0 {
                0
            } else {
                (b.value.max(0) as f64 / total as f64 * 100.0).round() as u32
            }
        })
        .collect()
}

/// `min(100, floor(total_backlinks / 100 * 50 + domain_rank))`.
pub fn health_score(summary: &BacklinkSummary) -> u32 {
    let raw = (summary.total_backlinks as f64 / 100.0) * 50.0 + f64::from(summary.domain_rank);
    raw.floor().min(100.0) as u32
}

pub fn health_label(score: u32) -> &'static str {
    if score >= 70 {
        "Excellent"
    } else if score >= 40 {
        "Good"
    } else {
        "Needs Improvement"
    }
}

/// New minus lost backlinks over the last 30 days.
pub fn net_backlink_change(summary: &BacklinkSummary) -> i64 {
    summary.new_backlinks_30d as i64 - summary.lost_backlinks_30d as i64
}

/// `+3`, `+0`, `-2`.
pub fn format_signed(value: i64) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderUsage {
    pub name: String,
    pub cost: f64,
    pub calls: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiUsage {
    pub providers: Vec<ProviderUsage>,
}

impl ApiUsage {
    pub fn total_cost(&self) -> f64 {
        self.providers.iter().map(|p| p.cost).sum()
    }

    /// Savings against the comparison subscription.
    pub fn savings(&self) -> f64 {
        COMPARISON_MONTHLY_PRICE - self.total_cost()
    }
}

/// Month-to-date usage shown until the backend exposes usage logs.
pub fn placeholder_usage() -> ApiUsage {
    ApiUsage {
        providers: vec![
            ProviderUsage {
                name: "DataForSEO - Keywords".to_string(),
                cost: 2.5,
                calls: 3500,
            },
            ProviderUsage {
                name: "DataForSEO - SERP".to_string(),
                cost: 8.95,
                calls: 4800,
            },
            ProviderUsage {
                name: "Claude AI".to_string(),
                cost: 1.0,
                calls: 350,
            },
        ],
    }
}

/// Width of a provider's bar as a percentage of total spend.
pub fn bar_width(cost: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        cost / total * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMover {
    pub keyword: String,
    pub current_position: u32,
    pub previous_position: u32,
    /// Positive when the keyword climbed.
    pub change: i64,
}

impl KeywordMover {
    pub fn is_gainer(&self) -> bool {
        self.change > 0
    }
}

/// Biggest position changes between the first and last known rank of each history.
pub fn keyword_movers(histories: &[RankHistory]) -> Vec<KeywordMover> {
    let mut movers: Vec<KeywordMover> = histories
        .iter()
        .filter_map(|history| {
            let mut known: Vec<(&str, u32)> = history
                .history
                .iter()
                .filter_map(|p| p.position.map(|pos| (p.date.as_str(), pos)))
                .collect();
            known.sort_by(|a, b| a.0.cmp(b.0));

            let (_, previous) = *known.first()?;
            let (_, current) = *known.last()?;
            let change = i64::from(previous) - i64::from(current);
            if change == 0 {
                return None;
            }
            Some(KeywordMover {
                keyword: history.keyword_text.clone(),
                current_position: current,
                previous_position: previous,
                change,
            })
        })
        .collect();

    movers.sort_by(|a, b| b.change.abs().cmp(&a.change.abs()));
    movers.truncate(MOVERS_LIMIT);
    movers
}

/// Deepest position on the history chart's axis.
pub fn history_axis_max(points: &[HistoryPoint]) -> u32 {
    points
        .iter()
        .filter_map(|p| p.position)
        .filter(|p| *p > 0)
        .fold(HISTORY_AXIS_FLOOR, u32::max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_score(score: u32) -> Self {
        if score < 30 {
            Difficulty::Easy
        } else if score < 60 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// One keyword per line; lines are trimmed and blank ones dropped.
pub fn parse_bulk_keywords(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

/// Average position to one decimal, `0` when nothing ranks.
pub fn format_average_position(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "0".to_string(),
    }
}
