//! Landing page and the per-project overview widget.

use crate::errors::ClientError;
use crate::metrics::{
    bar_width, bucket_percentages, format_average_position, format_currency, format_thousands,
    keyword_movers, placeholder_usage, rank_distribution, ApiUsage, KeywordMover,
    COMPARISON_MONTHLY_PRICE, MOVERS_WINDOW_DAYS,
};
use crate::models::{RankHistory, RankStats};
use crate::query::keys;
use crate::App;

use super::{rank_tracking::tracked_keywords, text_table, ViewState};

pub struct DashboardPage;

impl DashboardPage {
    pub fn render() -> String {
        [
            "Dashboard",
            "",
            "Welcome to your SEO Dashboard! This is where you'll see your overview metrics once you create projects and add keywords.",
            "",
            "Create Your First Project: seo-console projects create <name> <domain>",
        ]
        .join("\n")
    }
}

pub async fn rank_stats(app: &App, project_id: &str) -> Result<RankStats, ClientError> {
    app.queries
        .fetch_query(keys::rank_stats(project_id), || async move {
            app.client.rank_tracking(project_id).stats().await
        })
        .await
}

/// 7-day movers built from each tracked keyword's history.
pub async fn movers(app: &App, project_id: &str) -> Result<Vec<KeywordMover>, ClientError> {
    app.queries
        .fetch_query(keys::keyword_movers(project_id), || async move {
            let tracked = tracked_keywords(app, project_id).await?;
            let requests = tracked.iter().map(|t| async move {
                app.client
                    .rank_tracking(project_id)
                    .history(&t.keyword_id, Some(MOVERS_WINDOW_DAYS))
                    .await
            });

            let mut histories: Vec<RankHistory> = Vec::with_capacity(tracked.len());
            for result in futures::future::join_all(requests).await {
                match result {
                    Ok(history) => histories.push(history),
                    Err(e) => tracing::warn!("Skipping keyword history for movers: {}", e),
                }
            }
            Ok::<_, ClientError>(keyword_movers(&histories))
        })
        .await
}

pub async fn api_usage(app: &App, project_id: &str) -> Result<ApiUsage, ClientError> {
    app.queries
        .fetch_query(keys::api_usage(project_id), || async {
            Ok(placeholder_usage())
        })
        .await
}

pub struct DashboardOverview {
    pub project_id: String,
    pub stats: ViewState<RankStats>,
    pub movers: ViewState<Vec<KeywordMover>>,
    pub usage: ViewState<ApiUsage>,
}

impl DashboardOverview {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            stats: ViewState::Loading,
            movers: ViewState::Loading,
            usage: ViewState::Loading,
        }
    }

    /// Fetch the three widgets concurrently; each settles on its own.
    pub async fn load(&mut self, app: &App) {
        let pid = self.project_id.as_str();
        let (stats, movers, usage) =
            tokio::join!(rank_stats(app, pid), movers(app, pid), api_usage(app, pid));

        self.stats = ViewState::settled(stats);
        self.movers = ViewState::from_result(
            movers,
            "No significant rank changes this week.",
            |m| m.is_empty(),
        );
        self.usage = ViewState::settled(usage);
    }

    pub fn render(&self) -> String {
        let mut out = Vec::new();

        out.push(self.stats.render_with(render_metric_cards));
        out.push(String::new());
        out.push("Rank Distribution".to_string());
        out.push(self.stats.render_with(render_distribution));
        out.push(String::new());
        out.push("Biggest Movers (7 days)".to_string());
        out.push(self.movers.render_with(|m| render_movers(m)));
        out.push(String::new());
        out.push("API Usage This Month".to_string());
        out.push(self.usage.render_with(render_usage));

        out.join("\n")
    }
}

fn render_metric_cards(stats: &RankStats) -> String {
    text_table(
        &["Total Keywords", "Avg. Position", "Top 3 Rankings", "Top 10 Rankings"],
        &[vec![
            stats.total_keywords.to_string(),
            format_average_position(stats.average_position),
            stats.top_3.to_string(),
            stats.top_10.to_string(),
        ]],
    )
}

pub fn render_distribution(stats: &RankStats) -> String {
    let buckets = rank_distribution(stats);
    let percents = bucket_percentages(&buckets);
    buckets
        .iter()
        .zip(percents)
        .map(|(b, pct)| format!("  {}: {} ({}%)", b.label, b.value, pct))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_movers(movers: &[KeywordMover]) -> String {
    movers
        .iter()
        .map(|m| {
            let arrow = if m.is_gainer() { '↑' } else { '↓' };
            format!(
                "  {}  Position: #{}  {} {}",
                m.keyword,
                m.current_position,
                arrow,
                m.change.abs()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_usage(usage: &ApiUsage) -> String {
    let total = usage.total_cost();
    let mut lines = vec![format!(
        "  {}  vs. {}/mo for Ahrefs",
        format_currency(total),
        format_currency(COMPARISON_MONTHLY_PRICE)
    )];
    for provider in &usage.providers {
        let width = bar_width(provider.cost, total);
        let filled = (width / 5.0).round() as usize;
        lines.push(format!(
            "  {:<24} {:>8}  [{:<20}] {} calls",
            provider.name,
            format_currency(provider.cost),
            "#".repeat(filled.min(20)),
            format_thousands(provider.calls)
        ));
    }
    lines.push(format!(
        "  You're saving ~{}/month compared to traditional SEO tools!",
        format_currency(usage.savings())
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_renders_each_state() {
        let mut view = DashboardOverview::new("p1");
        assert!(view.render().contains("Loading..."));

        view.stats = ViewState::Ready(RankStats {
            total_keywords: 13,
            average_position: Some(9.46),
            top_3: 2,
            top_10: 5,
            top_20: 8,
            top_50: 10,
            not_ranking: 3,
        });
        view.movers = ViewState::Empty("No significant rank changes this week.".to_string());
        view.usage = ViewState::Ready(placeholder_usage());

        let text = view.render();
        assert!(text.contains("9.5"));
        assert!(text.contains("Top 10 (4-10): 3 (23%)"));
        assert!(text.contains("No significant rank changes this week."));
        assert!(text.contains("$116.55"));
        assert!(text.contains("3,500 calls"));
    }
}
