use blobprep_core::{Context, Result};

use crate::connection_string;
use crate::constants::*;

/// Config carries the storage account settings.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT`] or [`AZURE_STORAGE_ACCOUNT_NAME`]
    /// - `AccountName` in [`AZURE_STORAGE_CONNECTION_STRING`]
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCESS_KEY`] or [`AZURE_STORAGE_ACCOUNT_KEY`]
    /// - `AccountKey` in [`AZURE_STORAGE_CONNECTION_STRING`]
    pub account_key: Option<String>,
    /// `sas_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_SAS_TOKEN`]
    /// - `SharedAccessSignature` in [`AZURE_STORAGE_CONNECTION_STRING`]
    pub sas_token: Option<String>,
    /// Blob service endpoint including the account path, like
    /// `http://127.0.0.1:10000/devstoreaccount1`.
    ///
    /// Only connection strings carry an endpoint.
    pub endpoint: Option<String>,
}

impl Config {
    /// Load config from env.
    ///
    /// The connection string is read first, explicit variables override what
    /// it sets. Fields that are already `Some` are kept.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let env_account_name = ctx
            .env_var(AZURE_STORAGE_ACCOUNT)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_NAME));

        // Endpoints derived from the account must use the overriding name.
        let account_override = self.account_name.clone().or_else(|| env_account_name.clone());
        let base = match ctx.env_var(AZURE_STORAGE_CONNECTION_STRING) {
            Some(v) => connection_string::parse(&v, account_override.as_deref())?,
            None => Config::default(),
        };

        let env_account_key = ctx
            .env_var(AZURE_STORAGE_ACCESS_KEY)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_KEY));

        self.account_name = self
            .account_name
            .or(env_account_name)
            .or(base.account_name);
        self.account_key = self.account_key.or(env_account_key).or(base.account_key);
        self.sas_token = self
            .sas_token
            .or_else(|| ctx.env_var(AZURE_STORAGE_SAS_TOKEN))
            .or(base.sas_token);
        self.endpoint = self.endpoint.or(base.endpoint);

        Ok(self)
    }

    /// Parses an [Azure connection string][1] into a configuration object.
    ///
    /// An example of a connection string looks like:
    ///
    /// ```txt
    /// DefaultEndpointsProtocol=http;AccountName=devstoreaccount1;
    /// AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;
    /// BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1
    /// ```
    ///
    /// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
    pub fn try_from_connection_string(conn_str: &str) -> Result<Self> {
        connection_string::parse(conn_str, None)
    }
}
