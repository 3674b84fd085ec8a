//! CLI Commands

pub mod config;
pub mod directory;
pub mod doc_types;
pub mod documents;
pub mod session;

use std::sync::Arc;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;

use docdesk_forms::DeskService;
use docdesk_sdk::{AuthContext, Client, ClientConfig, Environment, HttpBackend};

use crate::output::OutputFormat;

/// Values resolved from flags, environment and the profile file
pub struct Settings {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub environment: Option<String>,
    pub format: OutputFormat,
    pub profile: Option<String>,
}

/// Everything a command handler needs
pub struct Context {
    pub desk: DeskService,
    pub auth: AuthContext,
    pub format: OutputFormat,
    pub cancel: CancellationToken,
    profile: Option<String>,
}

impl Context {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let environment = match settings.environment.as_deref() {
            Some(env) => env.parse::<Environment>()?,
            None => Environment::compiled(),
        };
        let config = ClientConfig {
            environment,
            api_url: settings.api_url,
            ..Default::default()
        };

        let auth = AuthContext::global();
        if let Some(token) = settings.token {
            auth.init(token);
        }

        let client = Client::new(config).context("building API client")?;
        tracing::debug!("Using API at {}", client.base_url());

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling pending requests");
                on_interrupt.cancel();
            }
        });

        Ok(Self {
            desk: DeskService::new(Arc::new(HttpBackend::new(client)))
                .with_cancellation(cancel.clone()),
            auth,
            format: settings.format,
            cancel,
            profile: settings.profile,
        })
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Cancel `token` when the whole command is interrupted
    pub fn link(&self, token: CancellationToken) {
        let root = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = root.cancelled() => token.cancel(),
                _ = token.cancelled() => {}
            }
        });
    }
}

/// Split `KEY=VALUE`
pub fn split_pair(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow::anyhow!("expected FIELD=VALUE, got '{}'", raw))
}
