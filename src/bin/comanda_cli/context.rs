#![deny(clippy::all, clippy::pedantic)]

//! Shared CLI context: settings → client → engine → preferences.

use std::sync::Arc;

use comanda::cache::DateWindow;
use comanda::client::{ApiClient, ClientError};
use comanda::config::{ClientOverrides, Settings, load};
use comanda::domain::error::DomainError;
use comanda::prefs::{PreferenceStore, PrefsError};
use comanda::sync::SyncEngine;
use comanda::view::ExportError;
use thiserror::Error;
use time::Date;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] comanda::config::LoadError),
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("failed to render output: {0}")]
    Render(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Ctx {
    pub engine: Arc<SyncEngine>,
    pub prefs: PreferenceStore,
    pub settings: Settings,
}

impl Ctx {
    pub async fn build(overrides: &ClientOverrides) -> Result<Self, CliError> {
        let settings = load(overrides)?;

        let token = match &settings.client.api_key_file {
            Some(path) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CliError::KeyFile {
                        path: path.display().to_string(),
                        source,
                    })?
                    .trim()
                    .to_string(),
            ),
            None => None,
        };

        let client = ApiClient::with_timeout(
            &settings.client.base_url,
            &settings.client.tenant_id,
            token,
            settings.client.request_timeout,
        )?;
        let engine = SyncEngine::new(settings.cache.clone(), Arc::new(client));
        let prefs = PreferenceStore::load(settings.preferences_path.clone()).await?;

        Ok(Self {
            engine,
            prefs,
            settings,
        })
    }

    pub fn window(start: Date, end: Date) -> Result<DateWindow, CliError> {
        Ok(DateWindow::new(start, end)?)
    }
}
