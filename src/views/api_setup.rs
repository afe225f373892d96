//! Credential setup modal and the gate in front of provider-backed actions.

use std::collections::BTreeMap;
use std::future::Future;

use crate::errors::ClientError;
use crate::models::{CredentialCheck, Provider, SetupResult};
use crate::query::keys;
use crate::App;

pub const SETUP_FAILED_TEXT: &str = "Failed to save credentials";

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub secret: bool,
    pub placeholder: &'static str,
}

#[derive(Debug)]
pub struct ProviderInfo {
    pub provider: Provider,
    pub name: &'static str,
    pub cost: &'static str,
    pub signup_url: &'static str,
    pub docs_url: &'static str,
    pub fields: &'static [FieldSpec],
    pub instructions: &'static [&'static str],
}

static DATAFORSEO: ProviderInfo = ProviderInfo {
    provider: Provider::DataForSeo,
    name: "DataForSEO",
    cost: "$0.07 per 1,000 keywords",
    signup_url: "https://app.dataforseo.com/register",
    docs_url: "https://docs.dataforseo.com/v3/",
    fields: &[
        FieldSpec {
            name: "login",
            label: "Login/Email",
            secret: false,
            placeholder: "your-email@example.com",
        },
        FieldSpec {
            name: "password",
            label: "API Password",
            secret: true,
            placeholder: "Your API password",
        },
    ],
    instructions: &[
        "Go to https://app.dataforseo.com/register",
        "Sign up (get $1 free credits)",
        "Go to Dashboard > API Access",
        "Copy your Login and Password",
    ],
};

static GOOGLE: ProviderInfo = ProviderInfo {
    provider: Provider::Google,
    name: "Google Search Console",
    cost: "Free!",
    signup_url: "https://search.google.com/search-console",
    docs_url: "https://developers.google.com/webmaster-tools",
    fields: &[],
    instructions: &[
        "Click \"Connect with Google\" below",
        "Authorize access to your Search Console data",
        "Select which site to connect",
    ],
};

static ANTHROPIC: ProviderInfo = ProviderInfo {
    provider: Provider::Anthropic,
    name: "Claude AI (Anthropic)",
    cost: "~$0.003 per message",
    signup_url: "https://console.anthropic.com/",
    docs_url: "https://docs.anthropic.com/",
    fields: &[FieldSpec {
        name: "api_key",
        label: "API Key",
        secret: true,
        placeholder: "sk-ant-...",
    }],
    instructions: &[
        "Go to https://console.anthropic.com/",
        "Sign up for an account",
        "Get API key from Settings > API Keys",
        "Note: This may be admin-provided in self-hosted setups",
    ],
};

pub fn provider_info(provider: Provider) -> &'static ProviderInfo {
    match provider {
        Provider::DataForSeo => &DATAFORSEO,
        Provider::Google => &GOOGLE,
        Provider::Anthropic => &ANTHROPIC,
    }
}

pub async fn credential_check(
    app: &App,
    provider: Provider,
) -> Result<CredentialCheck, ClientError> {
    app.queries
        .fetch_query(keys::credentials(provider.as_str()), || async move {
            app.client.credentials().check(provider).await
        })
        .await
}

pub async fn remove_credentials(app: &App, provider: Provider) -> Result<(), ClientError> {
    app.queries
        .mutate(
            app.client.credentials().delete(provider),
            &[keys::credentials(provider.as_str())],
        )
        .await
}

/// "Setup <provider> API" form.
#[derive(Debug)]
pub struct ApiSetupModal {
    pub provider: Provider,
    pub feature: String,
    pub values: BTreeMap<String, String>,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ApiSetupModal {
    pub fn new(provider: Provider, feature: impl Into<String>) -> Self {
        Self {
            provider,
            feature: feature.into(),
            values: BTreeMap::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn info(&self) -> &'static ProviderInfo {
        provider_info(self.provider)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Labels of required fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.info()
            .fields
            .iter()
            .filter(|f| {
                self.values
                    .get(f.name)
                    .map(|v| v.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|f| f.label)
            .collect()
    }

    pub async fn submit(&mut self, app: &App) -> Result<SetupResult, ClientError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let err = ClientError::Validation(format!("Required: {}", missing.join(", ")));
            self.error = Some(err.message());
            return Err(err);
        }

        self.error = None;
        self.submitting = true;
        let result = app
            .queries
            .mutate(
                app.client.credentials().setup(self.provider, &self.values),
                &[keys::credentials(self.provider.as_str())],
            )
            .await;
        self.submitting = false;

        match result {
            Ok(saved) => {
                tracing::info!("Saved {} credentials", self.provider);
                Ok(saved)
            }
            Err(e) => {
                self.error = Some(setup_error_text(&e));
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let info = self.info();
        let mut lines = vec![
            format!("Setup {} API", info.name),
            String::new(),
            format!("To use {}, we need access to {}.", self.feature, info.name),
            format!("Cost: {}", info.cost),
            String::new(),
            "How to get your API key:".to_string(),
        ];
        for (i, step) in info.instructions.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, step));
        }
        lines.push(format!("Sign up: {}", info.signup_url));
        lines.push(format!("Docs: {}", info.docs_url));

        if !info.fields.is_empty() {
            lines.push(String::new());
            for field in info.fields {
                let value = match self.values.get(field.name) {
                    Some(v) if field.secret && !v.is_empty() => "********".to_string(),
                    Some(v) => v.clone(),
                    None => format!("<{}>", field.placeholder),
                };
                lines.push(format!("  {}: {}", field.label, value));
            }
        }

        if let Some(error) = &self.error {
            lines.push(String::new());
            lines.push(format!("Error: {}", error));
        }
        lines.join("\n")
    }
}

/// The backend's explanation when it sent one, otherwise a generic failure.
fn setup_error_text(err: &ClientError) -> String {
    match err.status_code() {
        Some(_) => err.message(),
        None => SETUP_FAILED_TEXT.to_string(),
    }
}

/// Outcome of an action behind a credential gate.
#[derive(Debug)]
pub enum Gated<T> {
    Ran(T),
    SetupRequired(ApiSetupModal),
}

impl<T> Gated<T> {
    pub fn ran(self) -> Option<T> {
        match self {
            Gated::Ran(value) => Some(value),
            Gated::SetupRequired(_) => None,
        }
    }
}

/// Runs an action only when `provider` is configured; otherwise hands back the setup modal.
pub struct CredentialGate {
    pub provider: Provider,
    pub feature: String,
}

impl CredentialGate {
    pub fn new(provider: Provider, feature: impl Into<String>) -> Self {
        Self {
            provider,
            feature: feature.into(),
        }
    }

    pub async fn is_configured(&self, app: &App) -> Result<bool, ClientError> {
        Ok(credential_check(app, self.provider).await?.exists)
    }

    /// `action` is not polled when the credential is missing.
    pub async fn run<T, Fut>(&self, app: &App, action: Fut) -> Result<Gated<T>, ClientError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if !self.is_configured(app).await? {
            tracing::info!("{} requires {} credentials", self.feature, self.provider);
            return Ok(Gated::SetupRequired(ApiSetupModal::new(
                self.provider,
                self.feature.clone(),
            )));
        }
        Ok(Gated::Ran(action.await?))
    }
}
