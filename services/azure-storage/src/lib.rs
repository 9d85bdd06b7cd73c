//! Azure Storage support for blobprep
//!
//! This crate provides:
//! - Shared Key request signing (plus SAS token pass-through)
//! - Configuration from env values and connection strings
//! - A container client to create blob containers
//!
//! # Example
//!
//! ```rust,no_run
//! use blobprep_azure_storage::{ContainerClient, RequestSigner, StaticCredentialProvider};
//! use blobprep_core::{Context, OsEnv, Result, Signer};
//! use blobprep_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let loader = StaticCredentialProvider::new_shared_key(
//!         "devstoreaccount1",
//!         "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
//!     );
//!     let signer = Signer::new(ctx, loader, RequestSigner::new());
//!
//!     let client = ContainerClient::new("http://localhost:10000/devstoreaccount1", signer);
//!     let resp = client.create_container("mlflow").await?;
//!     println!("request id: {}", resp.request_id);
//!
//!     Ok(())
//! }
//! ```

mod constants;
pub use constants::{
    AZURE_STORAGE_ACCESS_KEY, AZURE_STORAGE_ACCOUNT, AZURE_STORAGE_ACCOUNT_KEY,
    AZURE_STORAGE_ACCOUNT_NAME, AZURE_STORAGE_CONNECTION_STRING, AZURE_STORAGE_SAS_TOKEN,
    AZURE_VERSION, AZURITE_DEFAULT_ACCOUNT_KEY, AZURITE_DEFAULT_ACCOUNT_NAME,
};

mod config;
pub use config::Config;
mod connection_string;

mod credential;
pub use credential::Credential;

mod container;
pub use container::{ContainerClient, CreateContainerResponse};

mod provide_credential;
pub use provide_credential::StaticCredentialProvider;

mod sign_request;
pub use sign_request::RequestSigner;
