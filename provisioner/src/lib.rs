//! Provision blob containers in a local Azure Storage emulator.
//!
//! Account values and container names are read once from the environment,
//! then every container is created concurrently. Each attempt is logged on
//! its own and a failing container never stops the others.
//!
//! # Example
//!
//! ```rust,no_run
//! use blobprep::{run, ProvisionConfig};
//! use blobprep_core::{Context, OsEnv};
//! use blobprep_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> blobprep_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = ProvisionConfig::from_context(&ctx)?;
//!
//! for outcome in run(ctx, config).await {
//!     println!("{}: {}", outcome.container, outcome.is_success());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::{
    parse_container_names, ProvisionConfig, COMMA_SEPARATED_CONTAINER_NAMES, DEFAULT_BLOB_HOST,
    DEFAULT_CONTAINER_NAMES,
};

mod provisioner;
pub use provisioner::{run, ContainerRequest, Outcome, Provisioner};
