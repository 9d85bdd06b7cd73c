use std::collections::HashMap;

use blobprep_core::{Error, Result};

use crate::constants::*;
use crate::Config;

/// Parses an [Azure connection string][1] for the blob service.
///
/// `account_name` replaces `AccountName` before any endpoint is derived from
/// it, so development and suffix style endpoints follow the account that
/// signs the request. An explicit `BlobEndpoint` is kept as is.
///
/// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
pub(crate) fn parse(conn_str: &str, account_name: Option<&str>) -> Result<Config> {
    let mut key_values = parse_into_key_values(conn_str)?;
    if let Some(name) = account_name {
        key_values.insert("AccountName".to_string(), name.to_string());
    }

    if let Some(config) = collect_development_config(&key_values) {
        return Ok(config);
    }

    let mut config = Config {
        account_name: key_values.get("AccountName").cloned(),
        endpoint: collect_endpoint(&key_values)?,
        ..Default::default()
    };

    // SAS wins over the account key when both are present.
    if let Some(token) = key_values.get("SharedAccessSignature") {
        config.sas_token = Some(token.clone());
    } else if let Some(key) = key_values.get("AccountKey") {
        config.account_key = Some(key.clone());
    }

    Ok(config)
}

fn parse_into_key_values(conn_str: &str) -> Result<HashMap<String, String>> {
    conn_str
        .trim()
        .replace('\n', "")
        .split(';')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let (key, value) = field.split_once('=').ok_or_else(|| {
                Error::config_invalid(format!(
                    "invalid connection string, expected '=' in field: {field}"
                ))
            })?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// `UseDevelopmentStorage=true` points at a local Azurite.
fn collect_development_config(key_values: &HashMap<String, String>) -> Option<Config> {
    if key_values.get("UseDevelopmentStorage").map(String::as_str) != Some("true") {
        return None;
    }

    let account_name = key_values
        .get("AccountName")
        .cloned()
        .unwrap_or_else(|| AZURITE_DEFAULT_ACCOUNT_NAME.to_string());
    let account_key = key_values
        .get("AccountKey")
        .cloned()
        .unwrap_or_else(|| AZURITE_DEFAULT_ACCOUNT_KEY.to_string());
    let proxy_uri = key_values
        .get("DevelopmentStorageProxyUri")
        .map(|v| v.trim_end_matches('/'))
        .unwrap_or(AZURITE_DEFAULT_BLOB_URI);

    Some(Config {
        endpoint: Some(format!("{proxy_uri}/{account_name}")),
        account_name: Some(account_name),
        account_key: Some(account_key),
        sas_token: None,
    })
}

/// Takes `BlobEndpoint` as is, otherwise builds it from
/// `DefaultEndpointsProtocol`, `AccountName` and `EndpointSuffix`.
fn collect_endpoint(key_values: &HashMap<String, String>) -> Result<Option<String>> {
    if let Some(endpoint) = key_values.get("BlobEndpoint") {
        return Ok(Some(endpoint.clone()));
    }

    let (account_name, endpoint_suffix) = match (
        key_values.get("AccountName"),
        key_values.get("EndpointSuffix"),
    ) {
        (Some(name), Some(suffix)) => (name, suffix),
        _ => return Ok(None),
    };

    let protocol = key_values
        .get("DefaultEndpointsProtocol")
        .map(String::as_str)
        .unwrap_or("https");
    if protocol != "http" && protocol != "https" {
        return Err(Error::config_invalid(format!(
            "invalid DefaultEndpointsProtocol: {protocol}"
        )));
    }

    Ok(Some(format!(
        "{protocol}://{account_name}.blob.{endpoint_suffix}"
    )))
}
