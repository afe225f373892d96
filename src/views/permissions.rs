//! AI assistant permission toggles.
//!
//! Permissions live on this client only. Toggles go through grant/revoke
//! mutations so the cached `["ai-permissions"]` entry is invalidated the same
//! way a server-backed permission would be; `save` writes them to local
//! storage under [`PERMISSIONS_STORAGE_KEY`].

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::query::keys;
use crate::App;

use super::LOADING_TEXT;

pub const PERMISSIONS_STORAGE_KEY: &str = "ai-permissions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Required,
    Recommended,
    Dangerous,
}

#[derive(Debug)]
pub struct PermissionSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: PermissionKind,
}

pub static PERMISSIONS: [PermissionSpec; 4] = [
    PermissionSpec {
        id: "read_data",
        title: "Read SEO Data",
        description: "Allow AI to query your keywords, rankings, and analytics",
        kind: PermissionKind::Required,
    },
    PermissionSpec {
        id: "write_data",
        title: "Modify SEO Data",
        description: "Allow AI to add keywords, update tracking, and manage projects",
        kind: PermissionKind::Recommended,
    },
    PermissionSpec {
        id: "send_emails",
        title: "Send Emails",
        description: "Allow AI to send outreach emails on your behalf via webhooks",
        kind: PermissionKind::Dangerous,
    },
    PermissionSpec {
        id: "manage_apis",
        title: "Manage Integrations",
        description: "Allow AI to add/remove API connectors and webhooks",
        kind: PermissionKind::Dangerous,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub read_data: bool,
    #[serde(default)]
    pub write_data: bool,
    #[serde(default)]
    pub send_emails: bool,
    #[serde(default)]
    pub manage_apis: bool,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self {
            read_data: true,
            write_data: false,
            send_emails: false,
            manage_apis: false,
        }
    }
}

impl PermissionSet {
    pub fn get(&self, id: &str) -> Option<bool> {
        match id {
            "read_data" => Some(self.read_data),
            "write_data" => Some(self.write_data),
            "send_emails" => Some(self.send_emails),
            "manage_apis" => Some(self.manage_apis),
            _ => None,
        }
    }

    fn slot(&mut self, id: &str) -> Option<&mut bool> {
        match id {
            "read_data" => Some(&mut self.read_data),
            "write_data" => Some(&mut self.write_data),
            "send_emails" => Some(&mut self.send_emails),
            "manage_apis" => Some(&mut self.manage_apis),
            _ => None,
        }
    }
}

/// Stored permissions, or the defaults when nothing has been saved.
/// `read_data` is always on, whatever the stored entry says.
pub async fn stored_permissions(app: &App) -> Result<PermissionSet, ClientError> {
    let storage = &app.storage;
    app.queries
        .fetch_query(keys::ai_permissions(), || async move {
            let stored = storage
                .get_json::<PermissionSet>(PERMISSIONS_STORAGE_KEY)
                .await?;
            let mut permissions = stored.unwrap_or_default();
            if !permissions.read_data {
                tracing::warn!("Stored permissions had read_data off; restoring it");
                permissions.read_data = true;
            }
            Ok::<_, ClientError>(permissions)
        })
        .await
}

#[derive(Debug, Default)]
pub struct PermissionsPanel {
    pub permissions: PermissionSet,
    pub loading: bool,
}

impl PermissionsPanel {
    pub fn new() -> Self {
        Self {
            permissions: PermissionSet::default(),
            loading: true,
        }
    }

    pub async fn load(&mut self, app: &App) -> Result<(), ClientError> {
        self.permissions = stored_permissions(app).await?;
        self.loading = false;
        Ok(())
    }

    /// Flip a permission. `read_data` and unknown ids are left alone.
    /// Returns the permission's value afterwards.
    pub async fn toggle(&mut self, app: &App, id: &str) -> Result<Option<bool>, ClientError> {
        if id == "read_data" {
            return Ok(self.permissions.get(id));
        }
        let Some(slot) = self.permissions.slot(id) else {
            return Ok(None);
        };
        *slot = !*slot;
        let enabled = *slot;

        let change = async move {
            if enabled {
                tracing::info!("Granted AI permission {}", id);
            } else {
                tracing::info!("Revoked AI permission {}", id);
            }
            Ok::<_, ClientError>(())
        };
        app.queries.mutate(change, &[keys::ai_permissions()]).await?;
        Ok(Some(enabled))
    }

    pub fn reset_to_defaults(&mut self) {
        self.permissions = PermissionSet::default();
    }

    pub async fn save(&self, app: &App) -> Result<(), ClientError> {
        app.queries
            .mutate(
                app.storage.set_json(PERMISSIONS_STORAGE_KEY, &self.permissions),
                &[keys::ai_permissions()],
            )
            .await
    }

    pub fn render(&self) -> String {
        if self.loading {
            return LOADING_TEXT.to_string();
        }
        let mut lines = vec!["AI Assistant Permissions".to_string(), String::new()];
        for spec in &PERMISSIONS {
            let enabled = self.permissions.get(spec.id).unwrap_or(false);
            let badge = match spec.kind {
                PermissionKind::Required => " (Required)",
                PermissionKind::Recommended => " (Recommended)",
                PermissionKind::Dangerous => "",
            };
            lines.push(format!(
                "[{}] {}{}",
                if enabled { "x" } else { " " },
                spec.title,
                badge
            ));
            lines.push(format!("    {}", spec.description));
            if spec.kind == PermissionKind::Dangerous {
                lines.push(
                    "    Caution: This permission allows significant actions. Only enable if you trust the AI to act on your behalf."
                        .to_string(),
                );
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let set = PermissionSet::default();
        assert_eq!(set.get("read_data"), Some(true));
        assert_eq!(set.get("write_data"), Some(false));
        assert_eq!(set.get("send_emails"), Some(false));
        assert_eq!(set.get("manage_apis"), Some(false));
        assert_eq!(set.get("unknown"), None);
    }

    #[test]
    fn test_partial_entry_decodes() {
        let set: PermissionSet =
            serde_json::from_str(r#"{"read_data": true, "write_data": true}"#).unwrap();
        assert!(set.write_data);
        assert!(!set.manage_apis);
    }

    #[test]
    fn test_render_marks_enabled() {
        let panel = PermissionsPanel {
            permissions: PermissionSet::default(),
            loading: false,
        };
        let text = panel.render();
        assert!(text.contains("[x] Read SEO Data (Required)"));
        assert!(text.contains("[ ] Send Emails"));
    }
}
