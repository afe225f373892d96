//! Rank tracking table, history and SERP snapshot views.

use crate::errors::ClientError;
use crate::metrics::history_axis_max;
use crate::models::{
    CheckNowResult, EnableTrackingRequest, RankHistory, SerpSnapshot, TrackedKeyword,
};
use crate::query::keys;
use crate::App;

use super::{or_dash, text_table, ViewState};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

pub async fn tracked_keywords(
    app: &App,
    project_id: &str,
) -> Result<Vec<TrackedKeyword>, ClientError> {
    app.queries
        .fetch_query(keys::rank_tracking(project_id), || async move {
            app.client.rank_tracking(project_id).list().await
        })
        .await
}

pub async fn rank_history(
    app: &App,
    project_id: &str,
    keyword_id: &str,
    days: u32,
) -> Result<RankHistory, ClientError> {
    app.queries
        .fetch_query(
            keys::rank_history(project_id, keyword_id, days),
            || async move {
                app.client
                    .rank_tracking(project_id)
                    .history(keyword_id, Some(days))
                    .await
            },
        )
        .await
}

pub async fn serp_snapshot(
    app: &App,
    project_id: &str,
    keyword_id: &str,
) -> Result<SerpSnapshot, ClientError> {
    app.queries
        .fetch_query(keys::serp_snapshot(project_id, keyword_id), || async move {
            app.client.rank_tracking(project_id).serp(keyword_id).await
        })
        .await
}

pub struct RankTrackingTable {
    pub project_id: String,
    pub rows: ViewState<Vec<TrackedKeyword>>,
}

impl RankTrackingTable {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            rows: ViewState::Loading,
        }
    }

    fn invalidates(&self) -> [crate::query::QueryKey; 3] {
        [
            keys::rank_tracking(&self.project_id),
            keys::rank_stats(&self.project_id),
            keys::keyword_movers(&self.project_id),
        ]
    }

    pub async fn load(&mut self, app: &App) {
        self.rows = ViewState::from_result(
            tracked_keywords(app, &self.project_id).await,
            "No keywords are being tracked yet.",
            |rows| rows.is_empty(),
        );
    }

    pub async fn enable(
        &mut self,
        app: &App,
        keyword_id: &str,
        tracked_url: &str,
    ) -> Result<TrackedKeyword, ClientError> {
        let request = EnableTrackingRequest::new(keyword_id, tracked_url.trim());
        let tracked = app
            .queries
            .mutate(
                app.client.rank_tracking(&self.project_id).enable(&request),
                &self.invalidates(),
            )
            .await?;
        self.load(app).await;
        Ok(tracked)
    }

    pub async fn check_now(
        &mut self,
        app: &App,
        keyword_id: &str,
    ) -> Result<CheckNowResult, ClientError> {
        let result = app
            .queries
            .mutate(
                app.client.rank_tracking(&self.project_id).check_now(keyword_id),
                &self.invalidates(),
            )
            .await?;
        self.load(app).await;
        Ok(result)
    }

    pub async fn stop(&mut self, app: &App, keyword_id: &str) -> Result<(), ClientError> {
        app.queries
            .mutate(
                app.client.rank_tracking(&self.project_id).stop(keyword_id),
                &self.invalidates(),
            )
            .await?;
        self.load(app).await;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.rows.render_with(|rows| {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.keyword_id.clone(),
                        r.keyword_text.clone(),
                        r.rank_position
                            .map(|p| format!("#{}", p))
                            .unwrap_or_else(|| "Not ranking".to_string()),
                        r.tracked_url.clone(),
                        r.checked_at.clone(),
                    ]
                })
                .collect();
            text_table(
                &["Keyword ID", "Keyword", "Position", "Tracked URL", "Checked"],
                &table,
            )
        })
    }
}

pub fn render_history(history: &RankHistory) -> String {
    if history.history.is_empty() {
        return format!("No rank history for \"{}\" yet.", history.keyword_text);
    }

    let axis = history_axis_max(&history.history);
    let rows: Vec<Vec<String>> = history
        .history
        .iter()
        .map(|point| {
            // Better positions draw longer bars.
            let bar = match point.position {
                Some(p) if p > 0 => {
                    let filled = ((axis + 1).saturating_sub(p) * 30 / axis) as usize;
                    "#".repeat(filled)
                }
                _ => String::new(),
            };
            vec![point.date.clone(), or_dash(point.position), bar]
        })
        .collect();

    format!(
        "Rank history for \"{}\" (axis 1-{})\n{}",
        history.keyword_text,
        axis,
        text_table(&["Date", "Position", ""], &rows)
    )
}

pub fn render_serp(snapshot: &SerpSnapshot) -> String {
    if snapshot.results.is_empty() {
        return format!("No SERP data for \"{}\" yet.", snapshot.keyword_text);
    }
    let rows: Vec<Vec<String>> = snapshot
        .results
        .iter()
        .map(|r| {
            vec![
                or_dash(r.position),
                or_dash(r.domain.clone()),
                or_dash(r.title.clone()),
                r.url.clone(),
            ]
        })
        .collect();
    format!(
        "SERP for \"{}\" ({})\n{}",
        snapshot.keyword_text,
        or_dash(snapshot.snapshot_date.clone()),
        text_table(&["Pos", "Domain", "Title", "URL"], &rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryPoint;

    #[test]
    fn test_history_bars_scale_with_axis() {
        let history = RankHistory {
            keyword_id: "k".to_string(),
            keyword_text: "rust seo".to_string(),
            days: Some(30),
            history: vec![
                HistoryPoint {
                    date: "2024-03-01".to_string(),
                    position: Some(1),
                },
                HistoryPoint {
                    date: "2024-03-02".to_string(),
                    position: None,
                },
            ],
        };
        let text = render_history(&history);
        assert!(text.contains("axis 1-20"));
        assert!(text.contains(&"#".repeat(30)));
    }
}
