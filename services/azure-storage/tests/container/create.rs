use blobprep_azure_storage::{
    ContainerClient, Credential, RequestSigner, StaticCredentialProvider, AZURE_VERSION,
    AZURITE_DEFAULT_ACCOUNT_KEY, AZURITE_DEFAULT_ACCOUNT_NAME,
};
use blobprep_core::{Context, Error, ErrorKind, Signer};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use super::{created, storage_error, ScriptedHttpSend};

const ENDPOINT: &str = "http://localhost:10000/devstoreaccount1";

fn client(http: ScriptedHttpSend, credential: Credential) -> ContainerClient {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(http);
    let signer = Signer::new(
        ctx,
        StaticCredentialProvider::new(credential),
        RequestSigner::new(),
    );
    ContainerClient::new(ENDPOINT, signer)
}

fn azurite_credential() -> Credential {
    Credential::with_shared_key(AZURITE_DEFAULT_ACCOUNT_NAME, AZURITE_DEFAULT_ACCOUNT_KEY)
}

#[tokio::test]
async fn test_create_container_sends_signed_put() {
    let http = ScriptedHttpSend::default().reply(created("req-1"));
    let client = client(http.clone(), azurite_credential());

    let resp = client.create_container("mlflow").await.unwrap();
    assert_eq!(resp.request_id, "req-1");
    assert_eq!(resp.etag.as_deref(), Some("\"0x8DA1A5F1F5E7C40\""));
    assert!(resp.last_modified.is_some());

    let sent = http.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::PUT);
    assert_eq!(
        sent[0].uri.to_string(),
        "http://localhost:10000/devstoreaccount1/mlflow?restype=container"
    );
    assert_eq!(sent[0].headers["x-ms-version"], AZURE_VERSION);
    assert_eq!(sent[0].headers["content-length"], "0");
    assert!(sent[0].headers.contains_key("x-ms-date"));

    let authorization = sent[0].headers["authorization"].to_str().unwrap();
    assert!(authorization.starts_with("SharedKey devstoreaccount1:"));
}

#[tokio::test]
async fn test_create_container_encodes_name() {
    let http = ScriptedHttpSend::default().reply(storage_error(
        StatusCode::BAD_REQUEST,
        "InvalidResourceName",
        "The specifed resource name contains invalid characters.",
    ));
    let client = client(http.clone(), azurite_credential());

    let err = client.create_container("My Container").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().contains("InvalidResourceName"));
    assert_eq!(
        http.sent()[0].uri.to_string(),
        "http://localhost:10000/devstoreaccount1/My%20Container?restype=container"
    );
}

#[tokio::test]
async fn test_create_existing_container() {
    let http = ScriptedHttpSend::default().reply(storage_error(
        StatusCode::CONFLICT,
        "ContainerAlreadyExists",
        "The specified container already exists.",
    ));
    let client = client(http, azurite_credential());

    let err = client.create_container("mlflow").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContainerAlreadyExists);
    assert_eq!(
        err.to_string(),
        "409 Conflict ContainerAlreadyExists: The specified container already exists. (request id: failed-request)"
    );
}

#[tokio::test]
async fn test_create_container_with_empty_credential() {
    let http = ScriptedHttpSend::default().reply(storage_error(
        StatusCode::FORBIDDEN,
        "AuthorizationFailure",
        "Server failed to authenticate the request.",
    ));
    let client = client(http.clone(), Credential::with_shared_key("", ""));

    let err = client.create_container("mlflow").await.unwrap_err();
    assert!(err.is_authentication_error());
    assert_eq!(err.kind(), ErrorKind::CredentialDenied);

    // Empty values reach the service instead of being rejected locally.
    assert_eq!(http.sent().len(), 1);
}

#[tokio::test]
async fn test_create_container_with_malformed_key() {
    let http = ScriptedHttpSend::default();
    let client = client(
        http.clone(),
        Credential::with_shared_key(AZURITE_DEFAULT_ACCOUNT_NAME, "definitely not base64"),
    );

    let err = client.create_container("mlflow").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn test_create_container_unreachable() {
    let http = ScriptedHttpSend::default().reply(Err(Error::network(
        "failed to reach http://localhost:10000/devstoreaccount1/mlflow?restype=container",
    )));
    let client = client(http, azurite_credential());

    let err = client.create_container("mlflow").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[test]
fn test_container_url_trims_endpoint() {
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new(azurite_credential()),
        RequestSigner::new(),
    );
    let client = ContainerClient::new(format!("{ENDPOINT}/"), signer);

    assert_eq!(client.endpoint(), ENDPOINT);
    assert_eq!(
        client.container_url("mlflow"),
        "http://localhost:10000/devstoreaccount1/mlflow"
    );
}
