//! Page and widget view-models.
//!
//! Each view fetches through the query cache, keeps its data in a
//! [`ViewState`], and renders plain text for the terminal. UI toggles such
//! as the active tab or an open form live on the view struct.

mod ai_chat;
mod api_setup;
mod backlinks;
mod competitors;
mod dashboard;
mod keywords;
mod permissions;
mod project_detail;
mod projects;
mod rank_tracking;

pub use ai_chat::*;
pub use api_setup::*;
pub use backlinks::*;
pub use competitors::*;
pub use dashboard::*;
pub use keywords::*;
pub use permissions::*;
pub use project_detail::*;
pub use projects::*;
pub use rank_tracking::*;

use crate::errors::ClientError;

pub const LOADING_TEXT: &str = "Loading...";

/// What a widget currently has to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Empty(String),
    Ready(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    /// Settle a fetch result. Data for which `is_empty` holds renders `empty_message`.
    pub fn from_result(
        result: Result<T, ClientError>,
        empty_message: &str,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Self {
        match result {
            Ok(data) if is_empty(&data) => ViewState::Empty(empty_message.to_string()),
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e.message()),
        }
    }

    /// Settle a fetch whose data is never considered empty.
    pub fn settled(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e.message()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn render_with(&self, render: impl FnOnce(&T) -> String) -> String {
        match self {
            ViewState::Loading => LOADING_TEXT.to_string(),
            ViewState::Empty(message) => message.clone(),
            ViewState::Ready(data) => render(data),
            ViewState::Failed(message) => format!("Error: {}", message),
        }
    }
}

/// Left-aligned text table with a header rule.
pub fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// `value` or a placeholder when absent.
pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_from_result() {
        let empty: ViewState<Vec<u8>> =
            ViewState::from_result(Ok(vec![]), "Nothing here.", |v| v.is_empty());
        assert_eq!(empty.render_with(|_| String::new()), "Nothing here.");

        let failed: ViewState<Vec<u8>> = ViewState::from_result(
            Err(ClientError::NotFound("Project not found".to_string())),
            "Nothing here.",
            |v| v.is_empty(),
        );
        assert_eq!(failed.render_with(|_| String::new()), "Error: Project not found");

        let loading: ViewState<u8> = ViewState::default();
        assert_eq!(loading.render_with(|_| String::new()), LOADING_TEXT);
    }

    #[test]
    fn test_text_table_alignment() {
        let table = text_table(
            &["Keyword", "Pos"],
            &[
                vec!["rust".to_string(), "3".to_string()],
                vec!["seo tools".to_string(), "12".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Keyword    Pos");
        assert_eq!(lines[1], "---------  ---");
        assert_eq!(lines[3], "seo tools  12");
    }
}
