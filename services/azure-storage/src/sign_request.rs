use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use blobprep_core::hash::{base64_decode, base64_hmac_sha256};
use blobprep_core::time::{format_http_date, now, DateTime};
use blobprep_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderName, HeaderValue};
use log::debug;
use percent_encoding::percent_encode;
use std::fmt::Write;

/// RequestSigner that implement Azure Storage Shared Key Authorization.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for Azure Storage.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("credential is required"));
        };

        let mut ctx = SigningRequest::build(req)?;

        match cred {
            Credential::SasToken { token } => {
                ctx.query_append(token);
            }
            Credential::SharedKey {
                account_name,
                account_key,
            } => {
                let key = base64_decode(account_key).map_err(|e| {
                    Error::credential_invalid("account key is not valid base64").with_source(e)
                })?;

                let now_time = self.time.unwrap_or_else(now);
                let string_to_sign = string_to_sign(&mut ctx, account_name, now_time)?;
                let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

                ctx.headers.insert(header::AUTHORIZATION, {
                    let mut value: HeaderValue =
                        format!("SharedKey {account_name}:{signature}")
                            .parse()
                            .map_err(|e| {
                                Error::credential_invalid(
                                    "account name can't be used in authorization header",
                                )
                                .with_source(e)
                            })?;
                    value.set_sensitive(true);
                    value
                });
            }
        }

        // Apply percent encoding for query parameters
        for (_, v) in ctx.query.iter_mut() {
            *v = percent_encode(v.as_bytes(), &AZURE_QUERY_ENCODE_SET).to_string();
        }

        ctx.apply(req)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
fn string_to_sign(
    ctx: &mut SigningRequest,
    account_name: &str,
    now_time: DateTime,
) -> Result<String> {
    let mut s = String::with_capacity(128);

    writeln!(&mut s, "{}", ctx.method.as_str())?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_ENCODING)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_LANGUAGE)?)?;
    writeln!(&mut s, "{}", {
        // Version 2015-02-21 and later sign a zero length as empty.
        let content_length = ctx.header_get_or_default(&header::CONTENT_LENGTH)?;
        if content_length == "0" {
            ""
        } else {
            content_length
        }
    })?;
    writeln!(
        &mut s,
        "{}",
        ctx.header_get_or_default(&HeaderName::from_static(CONTENT_MD5))?
    )?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_TYPE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::DATE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_MODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_MATCH)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_NONE_MATCH)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_UNMODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::RANGE)?)?;
    writeln!(&mut s, "{}", canonicalize_header(ctx, now_time)?)?;
    write!(&mut s, "{}", canonicalize_resource(ctx, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(ctx: &mut SigningRequest, now_time: DateTime) -> Result<String> {
    ctx.headers
        .insert(X_MS_DATE, format_http_date(now_time).parse()?);

    Ok(SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix("x-ms-")?,
        ":",
        "\n",
    ))
}

/// Path style endpoints (like Azurite) repeat the account name: the
/// resource of `http://127.0.0.1:10000/devstoreaccount1/mlflow` is
/// `/devstoreaccount1/devstoreaccount1/mlflow`.
///
/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(ctx: &SigningRequest, account_name: &str) -> String {
    if ctx.query.is_empty() {
        return format!("/{}{}", account_name, ctx.path);
    }

    let query = ctx
        .query
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();

    format!(
        "/{}{}\n{}",
        account_name,
        ctx.path,
        SigningRequest::query_to_percent_decoded_string(query, ":", "\n")
    )
}
