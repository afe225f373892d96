//! Project detail page: header plus one widget per tab.

use crate::errors::ClientError;
use crate::models::Project;
use crate::query::keys;
use crate::App;

use super::{
    BacklinksDashboard, ChatPanel, CompetitorAnalysis, CompetitorManager, DashboardOverview,
    KeywordTable, PermissionsPanel, RankTrackingTable, ViewState,
};

pub async fn project(app: &App, project_id: &str) -> Result<Project, ClientError> {
    app.queries
        .fetch_query(keys::project(project_id), || async move {
            app.client.projects().get(project_id).await
        })
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTab {
    Overview,
    Keywords,
    RankTracking,
    Competitors,
    Backlinks,
    Assistant,
    Permissions,
}

impl ProjectTab {
    pub const ALL: [ProjectTab; 7] = [
        ProjectTab::Overview,
        ProjectTab::Keywords,
        ProjectTab::RankTracking,
        ProjectTab::Competitors,
        ProjectTab::Backlinks,
        ProjectTab::Assistant,
        ProjectTab::Permissions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectTab::Overview => "Overview",
            ProjectTab::Keywords => "Keywords",
            ProjectTab::RankTracking => "Rank Tracking",
            ProjectTab::Competitors => "Competitors",
            ProjectTab::Backlinks => "Backlinks",
            ProjectTab::Assistant => "AI Assistant",
            ProjectTab::Permissions => "Permissions",
        }
    }
}

/// The widget behind the active tab. Switching tabs drops the previous one.
pub enum TabPanel {
    Overview(DashboardOverview),
    Keywords(KeywordTable),
    RankTracking(RankTrackingTable),
    Competitors(CompetitorManager, CompetitorAnalysis),
    Backlinks(BacklinksDashboard),
    Assistant(ChatPanel),
    Permissions(PermissionsPanel),
}

impl TabPanel {
    fn for_tab(tab: ProjectTab, project_id: &str) -> Self {
        match tab {
            ProjectTab::Overview => TabPanel::Overview(DashboardOverview::new(project_id)),
            ProjectTab::Keywords => TabPanel::Keywords(KeywordTable::new(project_id)),
            ProjectTab::RankTracking => TabPanel::RankTracking(RankTrackingTable::new(project_id)),
            ProjectTab::Competitors => TabPanel::Competitors(
                CompetitorManager::new(project_id),
                CompetitorAnalysis::new(project_id),
            ),
            ProjectTab::Backlinks => TabPanel::Backlinks(BacklinksDashboard::new(project_id)),
            ProjectTab::Assistant => TabPanel::Assistant(ChatPanel::new(Some(project_id.to_string()))),
            ProjectTab::Permissions => TabPanel::Permissions(PermissionsPanel::new()),
        }
    }

    async fn load(&mut self, app: &App) {
        match self {
            TabPanel::Overview(w) => w.load(app).await,
            TabPanel::Keywords(w) => w.load(app).await,
            TabPanel::RankTracking(w) => w.load(app).await,
            TabPanel::Competitors(manager, analysis) => {
                tokio::join!(manager.load(app), analysis.load(app));
            }
            TabPanel::Backlinks(w) => w.load(app).await,
            TabPanel::Assistant(_) => {}
            TabPanel::Permissions(w) => {
                if let Err(e) = w.load(app).await {
                    tracing::warn!("Failed to load AI permissions: {}", e);
                }
            }
        }
    }

    fn render(&self) -> String {
        match self {
            TabPanel::Overview(w) => w.render(),
            TabPanel::Keywords(w) => w.render(),
            TabPanel::RankTracking(w) => w.render(),
            TabPanel::Competitors(manager, analysis) => {
                format!("{}\n\n{}", manager.render(), analysis.render())
            }
            TabPanel::Backlinks(w) => w.render(),
            TabPanel::Assistant(w) => w.render(),
            TabPanel::Permissions(w) => w.render(),
        }
    }
}

pub struct ProjectDetailPage {
    pub project_id: String,
    pub project: ViewState<Project>,
    pub active_tab: ProjectTab,
    pub panel: TabPanel,
}

impl ProjectDetailPage {
    pub fn new(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let panel = TabPanel::for_tab(ProjectTab::Overview, &project_id);
        Self {
            project_id,
            project: ViewState::Loading,
            active_tab: ProjectTab::Overview,
            panel,
        }
    }

    pub fn select(&mut self, tab: ProjectTab) {
        if tab != self.active_tab {
            self.active_tab = tab;
            self.panel = TabPanel::for_tab(tab, &self.project_id);
        }
    }

    /// Load the header and the active tab's widget together.
    pub async fn load(&mut self, app: &App) {
        let (header, ()) = tokio::join!(project(app, &self.project_id), self.panel.load(app));
        self.project = ViewState::settled(header);
    }

    pub fn render(&self) -> String {
        let header = self
            .project
            .render_with(|p| format!("{}\n{}", p.name, p.domain));
        let tabs = ProjectTab::ALL
            .iter()
            .map(|t| {
                if *t == self.active_tab {
                    format!("[{}]", t.label())
                } else {
                    t.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{}\n\n{}\n\n{}", header, tabs, self.panel.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_swaps_panel() {
        let mut page = ProjectDetailPage::new("p1");
        assert!(matches!(page.panel, TabPanel::Overview(_)));

        page.select(ProjectTab::Assistant);
        assert_eq!(page.active_tab, ProjectTab::Assistant);
        match &page.panel {
            TabPanel::Assistant(chat) => assert_eq!(chat.project_id.as_deref(), Some("p1")),
            _ => panic!("expected the chat panel"),
        }
        assert!(page.render().contains("[AI Assistant]"));
    }
}
