use std::fmt::{Debug, Formatter};

use blobprep_azure_storage::Config;
use blobprep_core::utils::Redact;
use blobprep_core::{Context, Result};

use crate::ContainerRequest;

/// Env value holding the containers to create, separated by `,`.
pub const COMMA_SEPARATED_CONTAINER_NAMES: &str = "COMMA_SEPARATED_CONTAINER_NAMES";
/// Containers created when [`COMMA_SEPARATED_CONTAINER_NAMES`] is not set.
pub const DEFAULT_CONTAINER_NAMES: &str = "mlflow";
/// Blob service of a local emulator, the account name is appended as path.
pub const DEFAULT_BLOB_HOST: &str = "http://localhost:10000";

/// ProvisionConfig is loaded once at start and passed to the provisioner.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Storage account name, empty if not configured.
    pub account_name: String,
    /// Base64 encoded account key, empty if not configured.
    pub account_key: String,
    /// SAS token used instead of the shared key when present.
    pub sas_token: Option<String>,
    /// Containers to create, unique and in configured order.
    pub container_names: Vec<String>,
    /// Blob service endpoint including the account path.
    pub endpoint: String,
}

impl Debug for ProvisionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionConfig")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("sas_token", &self.sas_token.as_ref().map(Redact::from))
            .field("container_names", &self.container_names)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ProvisionConfig {
    /// Load config from the context's env.
    ///
    /// Missing account values fall back to empty strings, the service
    /// rejects them later instead of failing here. Only a malformed
    /// connection string is an error.
    pub fn from_context(ctx: &Context) -> Result<Self> {
        let storage = Config::default().from_env(ctx)?;

        let account_name = storage.account_name.unwrap_or_default();
        let account_key = storage.account_key.unwrap_or_default();
        let endpoint = storage
            .endpoint
            .unwrap_or_else(|| format!("{DEFAULT_BLOB_HOST}/{account_name}"));
        let names = ctx
            .env_var(COMMA_SEPARATED_CONTAINER_NAMES)
            .unwrap_or_else(|| DEFAULT_CONTAINER_NAMES.to_string());

        Ok(Self {
            account_name,
            account_key,
            sas_token: storage.sas_token,
            container_names: parse_container_names(&names),
            endpoint,
        })
    }

    /// One request per configured container.
    pub fn requests(&self) -> Vec<ContainerRequest> {
        self.container_names
            .iter()
            .map(|name| ContainerRequest::new(name))
            .collect()
    }
}

/// Split a comma separated list, dropping blanks and repeated names.
pub fn parse_container_names(value: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in value.split(',').map(str::trim) {
        if name.is_empty() || names.iter().any(|v| v == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
