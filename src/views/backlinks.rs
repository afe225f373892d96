//! Backlinks dashboard: summary, backlink list and referring domains tabs.

use crate::metrics::{
    format_signed, format_thousands, health_label, health_score, net_backlink_change,
};
use crate::models::{BacklinkPage, BacklinkSummary, ReferringDomainPage};
use crate::query::keys;
use crate::App;

use super::{or_dash, text_table, ViewState};

pub const BACKLINK_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklinksTab {
    Summary,
    List,
    Domains,
}

impl BacklinksTab {
    pub fn label(&self) -> &'static str {
        match self {
            BacklinksTab::Summary => "Summary",
            BacklinksTab::List => "Backlinks",
            BacklinksTab::Domains => "Referring Domains",
        }
    }
}

pub struct BacklinksDashboard {
    pub project_id: String,
    pub active_tab: BacklinksTab,
    pub summary: ViewState<BacklinkSummary>,
    pub backlinks: ViewState<BacklinkPage>,
    pub domains: ViewState<ReferringDomainPage>,
}

impl BacklinksDashboard {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            active_tab: BacklinksTab::Summary,
            summary: ViewState::Loading,
            backlinks: ViewState::Loading,
            domains: ViewState::Loading,
        }
    }

    pub fn select(&mut self, tab: BacklinksTab) {
        self.active_tab = tab;
    }

    /// The summary always loads; the list and domains only on their own tab.
    pub async fn load(&mut self, app: &App) {
        let pid = self.project_id.clone();
        let pid = pid.as_str();

        let summary = app.queries.fetch_query(keys::backlinks_summary(pid), || async move {
            app.client.backlinks(pid).summary().await
        });

        match self.active_tab {
            BacklinksTab::Summary => {
                self.summary = ViewState::settled(summary.await);
            }
            BacklinksTab::List => {
                let list = app.queries.fetch_query(keys::backlinks_list(pid), || async move {
                    app.client.backlinks(pid).list(BACKLINK_PAGE_SIZE, 0).await
                });
                let (summary, list) = tokio::join!(summary, list);
                self.summary = ViewState::settled(summary);
                self.backlinks =
                    ViewState::from_result(list, "No backlinks found.", |p| p.backlinks.is_empty());
            }
            BacklinksTab::Domains => {
                let domains = app
                    .queries
                    .fetch_query(keys::referring_domains(pid), || async move {
                        app.client
                            .backlinks(pid)
                            .referring_domains(BACKLINK_PAGE_SIZE)
                            .await
                    });
                let (summary, domains) = tokio::join!(summary, domains);
                self.summary = ViewState::settled(summary);
                self.domains = ViewState::from_result(
                    domains,
                    "No referring domains found.",
                    |p| p.domains.is_empty(),
                );
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.summary.render_with(render_cards);
        out.push_str(&format!("\n\n{}\n\n", self.active_tab.label()));
        let body = match self.active_tab {
            BacklinksTab::Summary => self.summary.render_with(render_summary),
            BacklinksTab::List => self.backlinks.render_with(render_list),
            BacklinksTab::Domains => self.domains.render_with(render_domains),
        };
        out.push_str(&body);
        out
    }
}

fn render_cards(summary: &BacklinkSummary) -> String {
    text_table(
        &["Total Backlinks", "Referring Domains", "Domain Rank", "New (30d)", "Lost (30d)"],
        &[vec![
            format_thousands(summary.total_backlinks),
            format_thousands(summary.referring_domains),
            summary.domain_rank.to_string(),
            format!("+{}", summary.new_backlinks_30d),
            format!("-{}", summary.lost_backlinks_30d),
        ]],
    )
}

pub fn render_summary(summary: &BacklinkSummary) -> String {
    if summary.total_backlinks == 0 && summary.referring_domains == 0 {
        return "No backlink data available yet.".to_string();
    }
    let score = health_score(summary);
    [
        format!("Backlink Health Score: {}/100 ({})", score, health_label(score)),
        String::new(),
        "Last 30 Days".to_string(),
        format!("  New backlinks:  +{}", summary.new_backlinks_30d),
        format!("  Lost backlinks: -{}", summary.lost_backlinks_30d),
        format!(
            "  Net change:     {}",
            format_signed(net_backlink_change(summary))
        ),
    ]
    .join("\n")
}

fn render_list(page: &BacklinkPage) -> String {
    let rows: Vec<Vec<String>> = page
        .backlinks
        .iter()
        .map(|b| {
            vec![
                b.source_domain.clone(),
                b.source_url.clone(),
                b.anchor_text
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "-".to_string()),
                b.domain_rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                or_dash(b.first_seen.clone()),
                if b.is_active { "Active" } else { "Lost" }.to_string(),
            ]
        })
        .collect();
    text_table(
        &["Source", "URL", "Anchor", "Rank", "First Seen", "Status"],
        &rows,
    )
}

fn render_domains(page: &ReferringDomainPage) -> String {
    let rows: Vec<Vec<String>> = page
        .domains
        .iter()
        .map(|d| {
            vec![
                d.domain.clone(),
                format!("{} backlinks", format_thousands(d.backlinks_count)),
                d.domain_rank.to_string(),
                or_dash(d.first_seen.clone()),
            ]
        })
        .collect();
    text_table(&["Domain", "Backlinks", "Rank", "First Seen"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_health_and_net_change() {
        let summary = BacklinkSummary {
            total_backlinks: 100_000,
            referring_domains: 800,
            domain_rank: 90,
            new_backlinks_30d: 3,
            lost_backlinks_30d: 7,
            ..Default::default()
        };
        let text = render_summary(&summary);
        assert!(text.contains("100/100 (Excellent)"));
        assert!(text.contains("Net change:     -4"));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(
            render_summary(&BacklinkSummary::default()),
            "No backlink data available yet."
        );
    }
}
