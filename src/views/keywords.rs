//! Keyword table widget.

use crate::errors::ClientError;
use crate::metrics::{format_thousands, parse_bulk_keywords, Difficulty};
use crate::models::{BulkAddResult, CostEstimate, Keyword, Provider, RefreshAllResult};
use crate::query::keys;
use crate::App;

use super::{or_dash, text_table, CredentialGate, Gated, ViewState};

pub const NO_KEYWORDS_TEXT: &str = "No keywords yet. Add keywords to start tracking.";

pub async fn keywords(app: &App, project_id: &str) -> Result<Vec<Keyword>, ClientError> {
    app.queries
        .fetch_query(keys::keywords(project_id), || async move {
            app.client.keywords(project_id).list().await
        })
        .await
}

pub struct KeywordTable {
    pub project_id: String,
    pub rows: ViewState<Vec<Keyword>>,
    /// Shown before a refresh-all is confirmed.
    pub pending_estimate: Option<CostEstimate>,
    gate: CredentialGate,
}

impl KeywordTable {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            rows: ViewState::Loading,
            pending_estimate: None,
            gate: CredentialGate::new(Provider::DataForSeo, "keyword research"),
        }
    }

    pub async fn load(&mut self, app: &App) {
        self.rows = ViewState::from_result(
            keywords(app, &self.project_id).await,
            NO_KEYWORDS_TEXT,
            |rows| rows.is_empty(),
        );
    }

    pub async fn add(&mut self, app: &App, keyword_text: &str) -> Result<Keyword, ClientError> {
        let text = keyword_text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("Keyword is required".to_string()));
        }
        let keyword = app
            .queries
            .mutate(
                app.client.keywords(&self.project_id).add(text),
                &[keys::keywords(&self.project_id)],
            )
            .await?;
        self.load(app).await;
        Ok(keyword)
    }

    /// Add one keyword per non-blank line of `input`.
    pub async fn bulk_add(&mut self, app: &App, input: &str) -> Result<BulkAddResult, ClientError> {
        let keywords = parse_bulk_keywords(input);
        if keywords.is_empty() {
            return Err(ClientError::Validation(
                "Enter at least one keyword".to_string(),
            ));
        }
        let result = app
            .queries
            .mutate(
                app.client.keywords(&self.project_id).bulk_add(keywords),
                &[keys::keywords(&self.project_id)],
            )
            .await?;
        tracing::info!("Bulk add: {} added, {} skipped", result.added, result.skipped);
        self.load(app).await;
        Ok(result)
    }

    pub async fn refresh(
        &mut self,
        app: &App,
        keyword_id: &str,
    ) -> Result<Gated<Keyword>, ClientError> {
        let outcome = self
            .gate
            .run(
                app,
                app.queries.mutate(
                    app.client.keywords(&self.project_id).refresh(keyword_id),
                    &[keys::keywords(&self.project_id)],
                ),
            )
            .await?;
        if matches!(outcome, Gated::Ran(_)) {
            self.load(app).await;
        }
        Ok(outcome)
    }

    /// First step of refresh-all: fetch and hold the cost estimate.
    pub async fn prepare_refresh_all(
        &mut self,
        app: &App,
    ) -> Result<Gated<CostEstimate>, ClientError> {
        let outcome = self
            .gate
            .run(app, app.client.keywords(&self.project_id).estimate_cost())
            .await?;
        if let Gated::Ran(estimate) = &outcome {
            self.pending_estimate = Some(estimate.clone());
        }
        Ok(outcome)
    }

    /// Second step: run the refresh the estimate was shown for.
    pub async fn confirm_refresh_all(&mut self, app: &App) -> Result<RefreshAllResult, ClientError> {
        if self.pending_estimate.take().is_none() {
            return Err(ClientError::Validation(
                "Review the cost estimate before refreshing all keywords".to_string(),
            ));
        }
        let result = app
            .queries
            .mutate(
                app.client.keywords(&self.project_id).refresh_all(),
                &[keys::keywords(&self.project_id)],
            )
            .await?;
        self.load(app).await;
        Ok(result)
    }

    pub async fn delete(&mut self, app: &App, keyword_id: &str) -> Result<(), ClientError> {
        app.queries
            .mutate(
                app.client.keywords(&self.project_id).delete(keyword_id),
                &[keys::keywords(&self.project_id)],
            )
            .await?;
        self.load(app).await;
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = self.rows.render_with(|rows| {
            let table: Vec<Vec<String>> = rows.iter().map(keyword_row).collect();
            text_table(
                &["ID", "Keyword", "Volume", "Difficulty", "CPC", "Refreshed"],
                &table,
            )
        });
        if let Some(estimate) = &self.pending_estimate {
            out.push_str(&format!(
                "\n\nRefreshing {} keywords will cost about {:.2} {}.",
                estimate.keyword_count, estimate.estimated_cost, estimate.currency
            ));
        }
        out
    }
}

fn keyword_row(k: &Keyword) -> Vec<String> {
    vec![
        k.id.clone(),
        k.keyword_text.clone(),
        k.search_volume
            .map(format_thousands)
            .unwrap_or_else(|| "N/A".to_string()),
        k.keyword_difficulty
            .map(|d| format!("{} ({})", d, Difficulty::from_score(d).as_str()))
            .unwrap_or_else(|| "N/A".to_string()),
        k.cpc
            .map(|c| format!("${:.2}", c))
            .unwrap_or_else(|| "N/A".to_string()),
        or_dash(k.last_refreshed_at.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_row_formats_metrics() {
        let keyword = Keyword {
            id: "k1".to_string(),
            project_id: None,
            keyword_text: "seo audit".to_string(),
            search_volume: Some(12100),
            keyword_difficulty: Some(45),
            cpc: Some(3.5),
            competition: None,
            last_refreshed_at: None,
            created_at: None,
        };
        let row = keyword_row(&keyword);
        assert_eq!(row[2], "12,100");
        assert_eq!(row[3], "45 (medium)");
        assert_eq!(row[4], "$3.50");
        assert_eq!(row[5], "-");
    }
}
