//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use autofill_protocols::{
    AutofillDataRequest, AutofillSelection, AvailableInputTypes, ProviderStatus, VaultDelegate,
    VaultError,
};
use mockall::mock;

mock! {
    pub Vault {}

    #[async_trait]
    impl VaultDelegate for Vault {
        async fn select_autofill_data(
            &self,
            origin: Option<String>,
            request: AutofillDataRequest,
        ) -> Result<AutofillSelection, VaultError>;

        async fn available_input_types(
            &self,
            origin: Option<String>,
        ) -> Result<AvailableInputTypes, VaultError>;

        async fn unlock_provider(&self) -> Result<ProviderStatus, VaultError>;
    }
}

/// A vault whose prompts never close.
pub struct StalledVault;

#[async_trait]
impl VaultDelegate for StalledVault {
    async fn select_autofill_data(
        &self,
        _origin: Option<String>,
        _request: AutofillDataRequest,
    ) -> Result<AutofillSelection, VaultError> {
        std::future::pending().await
    }

    async fn available_input_types(
        &self,
        _origin: Option<String>,
    ) -> Result<AvailableInputTypes, VaultError> {
        std::future::pending().await
    }

    async fn unlock_provider(&self) -> Result<ProviderStatus, VaultError> {
        std::future::pending().await
    }
}
