//! Competitor manager and competitor analysis widgets.

use crate::errors::ClientError;
use crate::models::{
    Competitor, CreateCompetitorRequest, GapReport, OverlapReport, SerpFeaturesReport,
};
use crate::query::keys;
use crate::App;

use super::{or_dash, text_table, ViewState};

pub const NO_COMPETITORS_TEXT: &str = "No competitors added yet.";
pub const NO_OVERLAP_TEXT: &str = "No keyword overlap data available.";
pub const NO_GAPS_TEXT: &str = "No gap opportunities found.";

pub async fn competitors(app: &App, project_id: &str) -> Result<Vec<Competitor>, ClientError> {
    app.queries
        .fetch_query(keys::competitors(project_id), || async move {
            app.client.competitors(project_id).list().await
        })
        .await
}

pub struct CompetitorManager {
    pub project_id: String,
    pub competitors: ViewState<Vec<Competitor>>,
}

impl CompetitorManager {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            competitors: ViewState::Loading,
        }
    }

    pub async fn load(&mut self, app: &App) {
        self.competitors = ViewState::from_result(
            competitors(app, &self.project_id).await,
            NO_COMPETITORS_TEXT,
            |c| c.is_empty(),
        );
    }

    /// Add a competitor. A blank domain is rejected without a request.
    pub async fn add(
        &mut self,
        app: &App,
        domain: &str,
        notes: Option<&str>,
    ) -> Result<Competitor, ClientError> {
        let request = CreateCompetitorRequest::new(domain, notes)
            .ok_or_else(|| ClientError::Validation("Domain is required".to_string()))?;

        let competitor = app
            .queries
            .mutate(
                app.client.competitors(&self.project_id).add(&request),
                &[
                    keys::competitors(&self.project_id),
                    keys::competitor_overlap(&self.project_id),
                ],
            )
            .await?;
        tracing::info!("Added competitor {}", competitor.domain);
        self.load(app).await;
        Ok(competitor)
    }

    pub async fn remove(&mut self, app: &App, competitor_id: &str) -> Result<(), ClientError> {
        app.queries
            .mutate(
                app.client.competitors(&self.project_id).delete(competitor_id),
                &[
                    keys::competitors(&self.project_id),
                    keys::competitor_overlap(&self.project_id),
                    keys::competitor_gaps(&self.project_id, competitor_id),
                ],
            )
            .await?;
        self.load(app).await;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.competitors.render_with(|list| {
            let rows: Vec<Vec<String>> = list
                .iter()
                .map(|c| {
                    vec![
                        c.id.clone(),
                        c.domain.clone(),
                        or_dash(c.notes.clone()),
                        or_dash(c.created_at.clone()),
                    ]
                })
                .collect();
            text_table(&["ID", "Domain", "Notes", "Added"], &rows)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisTab {
    Overlap,
    /// Gaps against one competitor.
    Gaps(String),
}

pub struct CompetitorAnalysis {
    pub project_id: String,
    pub active_tab: AnalysisTab,
    pub overlap: ViewState<OverlapReport>,
    pub gaps: ViewState<GapReport>,
}

impl CompetitorAnalysis {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            active_tab: AnalysisTab::Overlap,
            overlap: ViewState::Loading,
            gaps: ViewState::Loading,
        }
    }

    pub fn select(&mut self, tab: AnalysisTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.gaps = ViewState::Loading;
        }
    }

    /// Fetch data for the active tab only.
    pub async fn load(&mut self, app: &App) {
        let pid = self.project_id.clone();
        let pid = pid.as_str();
        match self.active_tab.clone() {
            AnalysisTab::Overlap => {
                let result = app
                    .queries
                    .fetch_query(keys::competitor_overlap(pid), || async move {
                        app.client.competitors(pid).keyword_overlap().await
                    })
                    .await;
                self.overlap =
                    ViewState::from_result(result, NO_OVERLAP_TEXT, |r| r.overlap.is_empty());
            }
            AnalysisTab::Gaps(competitor_id) => {
                let cid = competitor_id.as_str();
                let result = app
                    .queries
                    .fetch_query(keys::competitor_gaps(pid, cid), || async move {
                        app.client.competitors(pid).gap_analysis(cid).await
                    })
                    .await;
                self.gaps =
                    ViewState::from_result(result, NO_GAPS_TEXT, |r| r.opportunities.is_empty());
            }
        }
    }

    pub fn render(&self) -> String {
        match &self.active_tab {
            AnalysisTab::Overlap => format!(
                "Keyword Overlap\n\n{}",
                self.overlap.render_with(render_overlap)
            ),
            AnalysisTab::Gaps(_) => format!(
                "Opportunity Gaps\n\n{}",
                self.gaps.render_with(render_gaps)
            ),
        }
    }
}

fn render_overlap(report: &OverlapReport) -> String {
    let rows: Vec<Vec<String>> = report
        .overlap
        .iter()
        .map(|row| {
            let competitors = row
                .competitors_ranking
                .iter()
                .map(|c| format!("{} {}", c.domain, or_dash(c.position.map(|p| format!("#{}", p)))))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                row.keyword.clone(),
                row.our_position
                    .map(|p| format!("#{}", p))
                    .unwrap_or_else(|| "Not ranking".to_string()),
                competitors,
            ]
        })
        .collect();
    format!(
        "{} of {} keywords have competitor rankings\n{}",
        report.keywords_analyzed,
        report.total_keywords,
        text_table(&["Keyword", "Your Position", "Competitors"], &rows)
    )
}

fn render_gaps(report: &GapReport) -> String {
    let rows: Vec<Vec<String>> = report
        .opportunities
        .iter()
        .map(|gap| {
            vec![
                gap.keyword.clone(),
                format!("#{}", gap.competitor_position),
                gap.our_position
                    .map(|p| format!("#{}", p))
                    .unwrap_or_else(|| "Not ranking".to_string()),
                gap.gap_size.to_string(),
            ]
        })
        .collect();
    format!(
        "{} gaps against {}\n{}",
        report.total_gaps,
        report.competitor,
        text_table(&["Keyword", "Their Position", "Your Position", "Gap"], &rows)
    )
}

pub async fn serp_features(
    app: &App,
    project_id: &str,
) -> Result<SerpFeaturesReport, ClientError> {
    app.queries
        .fetch_query(keys::serp_features(project_id), || async move {
            app.client.competitors(project_id).serp_features().await
        })
        .await
}

pub fn render_serp_features(report: &SerpFeaturesReport) -> String {
    if report.features.is_empty() {
        return "No SERP feature data yet.".to_string();
    }
    let rows: Vec<Vec<String>> = report
        .features
        .iter()
        .map(|entry| {
            vec![
                entry.keyword.clone(),
                entry.feature_names().join(", "),
                or_dash(entry.snapshot_date.clone()),
            ]
        })
        .collect();
    format!(
        "{} of {} keywords show SERP features\n{}",
        report.keywords_with_features,
        report.total_keywords,
        text_table(&["Keyword", "Features", "Snapshot"], &rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompetitorRanking, GapOpportunity, KeywordOverlap};

    #[test]
    fn test_select_resets_gap_state() {
        let mut view = CompetitorAnalysis::new("p");
        view.gaps = ViewState::Empty(NO_GAPS_TEXT.to_string());
        view.select(AnalysisTab::Gaps("c1".to_string()));
        assert!(view.gaps.is_loading());
        assert!(view.render().starts_with("Opportunity Gaps"));
    }

    #[test]
    fn test_render_overlap_and_gaps() {
        let overlap = OverlapReport {
            total_keywords: 4,
            keywords_analyzed: 1,
            overlap: vec![KeywordOverlap {
                keyword: "seo audit".to_string(),
                our_position: None,
                competitors_ranking: vec![CompetitorRanking {
                    domain: "rival.com".to_string(),
                    position: Some(3),
                }],
                total_competitors_ranking: 1,
                opportunity_score: None,
            }],
            message: None,
        };
        let text = render_overlap(&overlap);
        assert!(text.contains("1 of 4 keywords"));
        assert!(text.contains("rival.com #3"));
        assert!(text.contains("Not ranking"));

        let gaps = GapReport {
            competitor: "rival.com".to_string(),
            total_gaps: 1,
            opportunities: vec![GapOpportunity {
                keyword: "link building".to_string(),
                competitor_position: 2,
                our_position: Some(14),
                opportunity_score: 2.0,
                gap_size: 12,
            }],
        };
        let text = render_gaps(&gaps);
        assert!(text.contains("1 gaps against rival.com"));
        assert!(text.contains("#14"));
    }
}
