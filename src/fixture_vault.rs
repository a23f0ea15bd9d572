//! A read-only vault backed by a JSON fixture.
//!
//! Stands in for a real password manager when exercising the bridge. Each
//! prompt "selects" the first saved record of the requested kind.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use autofill_protocols::{
    AutofillDataRequest, AutofillSelection, AvailableInputTypes, Credential, CreditCard, Identity,
    MainType, ProviderStatus, VaultDelegate, VaultError,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "fixture_vault_tests.rs"]
mod tests;

#[derive(Debug, Error)]
pub(crate) enum FixtureError {
    #[error("Failed to read vault fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vault fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Contents of a fixture file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultFixture {
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub credit_cards: Vec<CreditCard>,
    #[serde(default)]
    pub identities: Vec<Identity>,
    /// Start locked; `askToUnlockProvider` unlocks.
    #[serde(default)]
    pub locked: bool,
}

pub(crate) struct FixtureVault {
    fixture: VaultFixture,
    prompt_delay: Duration,
    locked: AtomicBool,
}

impl FixtureVault {
    pub fn new(fixture: VaultFixture, prompt_delay: Duration) -> Self {
        let locked = AtomicBool::new(fixture.locked);
        Self {
            fixture,
            prompt_delay,
            locked,
        }
    }

    /// A vault with nothing saved.
    pub fn empty(prompt_delay: Duration) -> Self {
        Self::new(VaultFixture::default(), prompt_delay)
    }

    pub fn from_json(json: &str, prompt_delay: Duration) -> Result<Self, FixtureError> {
        let fixture = serde_json::from_str(json)?;
        Ok(Self::new(fixture, prompt_delay))
    }

    pub fn load(path: &Path, prompt_delay: Duration) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, prompt_delay)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    async fn prompt(&self) {
        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }
    }
}

#[async_trait]
impl VaultDelegate for FixtureVault {
    async fn select_autofill_data(
        &self,
        origin: Option<String>,
        request: AutofillDataRequest,
    ) -> Result<AutofillSelection, VaultError> {
        if self.is_locked() {
            return Err(VaultError::Locked);
        }
        self.prompt().await;

        let selection = match request.main_type {
            MainType::Credentials => self
                .fixture
                .credentials
                .first()
                .cloned()
                .map(AutofillSelection::Credential),
            MainType::CreditCards => self
                .fixture
                .credit_cards
                .first()
                .cloned()
                .map(AutofillSelection::CreditCard),
            MainType::Identities => self
                .fixture
                .identities
                .first()
                .cloned()
                .map(AutofillSelection::Identity),
        };
        debug!(
            origin = origin.as_deref().unwrap_or("-"),
            sub_type = %request.sub_type,
            found = selection.is_some(),
            "Fixture prompt answered"
        );
        Ok(selection.unwrap_or(AutofillSelection::None))
    }

    async fn available_input_types(
        &self,
        _origin: Option<String>,
    ) -> Result<AvailableInputTypes, VaultError> {
        if self.is_locked() {
            return Ok(AvailableInputTypes::default());
        }
        Ok(AvailableInputTypes {
            credentials: !self.fixture.credentials.is_empty(),
            identities: !self.fixture.identities.is_empty(),
            credit_cards: !self.fixture.credit_cards.is_empty(),
            email: self
                .fixture
                .identities
                .iter()
                .any(|identity| identity.email_address.is_some()),
        })
    }

    async fn unlock_provider(&self) -> Result<ProviderStatus, VaultError> {
        self.prompt().await;
        self.locked.store(false, Ordering::SeqCst);
        Ok(ProviderStatus::Unlocked)
    }
}
