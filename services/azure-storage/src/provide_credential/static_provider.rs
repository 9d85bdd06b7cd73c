use async_trait::async_trait;
use blobprep_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;

/// StaticCredentialProvider hands out a credential fixed at construction.
///
/// Empty values are handed out as well, the storage service rejects them.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider for the given credential.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Create a provider for shared key authentication.
    pub fn new_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::new(Credential::with_shared_key(account_name, account_key))
    }

    /// Create a provider for SAS token authentication.
    pub fn new_sas_token(sas_token: &str) -> Self {
        Self::new(Credential::with_sas_token(sas_token))
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
