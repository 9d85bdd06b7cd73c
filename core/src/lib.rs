//! Core components for provisioning blob storage.
//!
//! This crate provides the foundational types and traits shared by the
//! blobprep crates: how requests are sent, how configuration is read, how
//! credentials are loaded and how requests get signed.
//!
//! ## Overview
//!
//! - **Context**: holds the implementations for HTTP sending and environment access
//! - **Traits**: `ProvideCredential` loads credentials, `SignRequest` signs requests
//! - **Signer**: glues a credential provider and a request signer together
//!
//! ## Example
//!
//! ```no_run
//! use blobprep_core::{Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential};
//! use async_trait::async_trait;
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FixedToken;
//!
//! #[async_trait]
//! impl ProvideCredential for FixedToken {
//!     type Credential = Token;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
//!         Ok(Some(Token("secret".to_string())))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct BearerSigner;
//!
//! #[async_trait]
//! impl SignRequest for BearerSigner {
//!     type Credential = Token;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut Parts,
//!         cred: Option<&Token>,
//!     ) -> Result<()> {
//!         let token = cred.map(|v| v.0.as_str()).unwrap_or_default();
//!         req.headers.insert("authorization", format!("Bearer {token}").parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), FixedToken, BearerSigner);
//!
//! let mut parts = http::Request::put("http://localhost:10000/account/container")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: base64 and HMAC helpers
//! - [`time`]: time helpers used by signers
//! - [`utils`]: data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
