use blobprep::{
    run, ContainerRequest, Outcome, ProvisionConfig, Provisioner,
    COMMA_SEPARATED_CONTAINER_NAMES,
};
use blobprep_azure_storage::{
    AZURE_STORAGE_ACCESS_KEY, AZURE_STORAGE_ACCOUNT, AZURITE_DEFAULT_ACCOUNT_KEY,
    AZURITE_DEFAULT_ACCOUNT_NAME,
};
use blobprep_core::{Context, ErrorKind, StaticEnv};
use blobprep_http_send_reqwest::ReqwestHttpSend;
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::Emulator;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(account_name: &str, account_key: &str, names: &str) -> ProvisionConfig {
    ProvisionConfig {
        account_name: account_name.to_string(),
        account_key: account_key.to_string(),
        sas_token: None,
        container_names: blobprep::parse_container_names(names),
        endpoint: format!("http://localhost:10000/{account_name}"),
    }
}

fn azurite_config(names: &str) -> ProvisionConfig {
    config(
        AZURITE_DEFAULT_ACCOUNT_NAME,
        AZURITE_DEFAULT_ACCOUNT_KEY,
        names,
    )
}

fn emulator_ctx(emulator: &Emulator) -> Context {
    Context::new().with_http_send(emulator.clone())
}

fn sorted(mut outcomes: Vec<Outcome>) -> Vec<Outcome> {
    outcomes.sort_by(|a, b| a.container.cmp(&b.container));
    outcomes
}

fn names(outcomes: &[Outcome]) -> Vec<&str> {
    outcomes.iter().map(|v| v.container.as_str()).collect()
}

fn error_kind(outcome: &Outcome) -> Option<ErrorKind> {
    outcome.result.as_ref().err().map(|e| e.kind())
}

#[test_case("mlflow"; "one")]
#[test_case("mlflow,models,artifacts"; "three")]
#[test_case("a,b,c,d,e,f,g,h"; "many")]
#[tokio::test]
async fn test_run_creates_every_container(input: &str) {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);

    let outcomes = run(emulator_ctx(&emulator), azurite_config(input)).await;

    let mut expected = blobprep::parse_container_names(input);
    expected.sort();
    assert_eq!(outcomes.len(), expected.len());
    assert!(outcomes.iter().all(|v| v.is_success()));
    assert!(outcomes
        .iter()
        .all(|v| !v.result.as_ref().unwrap().request_id.is_empty()));
    assert_eq!(emulator.containers(), expected);
}

#[tokio::test]
async fn test_run_existing_container_does_not_affect_others() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME).with_container("mlflow");

    let outcomes = sorted(
        run(
            emulator_ctx(&emulator),
            azurite_config("mlflow,models,artifacts"),
        )
        .await,
    );

    assert_eq!(names(&outcomes), vec!["artifacts", "mlflow", "models"]);
    assert!(outcomes[0].is_success());
    assert_eq!(
        error_kind(&outcomes[1]),
        Some(ErrorKind::ContainerAlreadyExists)
    );
    assert!(outcomes[2].is_success());
    assert_eq!(emulator.containers(), vec!["artifacts", "mlflow", "models"]);
}

#[tokio::test]
async fn test_run_with_empty_credentials() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);

    let outcomes = run(emulator_ctx(&emulator), config("", "", "mlflow,models")).await;

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        let err = outcome.result.as_ref().unwrap_err();
        assert!(err.is_authentication_error(), "unexpected error: {err:?}");

        let message = outcome.message();
        let prefix = format!(
            "Error creating container {}: authentication failed: 403 Forbidden AuthorizationFailure",
            outcome.container
        );
        assert!(message.starts_with(&prefix), "unexpected message: {message}");
    }
    // Every container is still attempted.
    assert_eq!(emulator.attempts().len(), 2);
    assert!(emulator.containers().is_empty());
}

#[tokio::test]
async fn test_run_twice() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);

    let first = run(emulator_ctx(&emulator), azurite_config("mlflow")).await;
    assert_eq!(first.len(), 1);
    assert!(first[0].is_success());
    assert_eq!(
        first[0].message(),
        "Create container mlflow successfully, request id: request-0"
    );

    let second = run(emulator_ctx(&emulator), azurite_config("mlflow")).await;
    assert_eq!(second.len(), 1);
    assert_eq!(
        error_kind(&second[0]),
        Some(ErrorKind::ContainerAlreadyExists)
    );
    assert_eq!(
        second[0].message(),
        "Error creating container mlflow: container already exists: 409 Conflict ContainerAlreadyExists: ContainerAlreadyExists from emulator (request id: request-1)"
    );
}

#[tokio::test]
async fn test_run_attempts_each_name_once() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);

    let outcomes = run(
        emulator_ctx(&emulator),
        azurite_config("mlflow, models,mlflow,,models"),
    )
    .await;

    assert_eq!(outcomes.len(), 2);
    let mut attempts = emulator.attempts();
    attempts.sort();
    assert_eq!(attempts, vec!["mlflow", "models"]);
}

#[tokio::test]
async fn test_run_unreachable_endpoint() {
    init_logger();
    let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
    let mut cfg = azurite_config("mlflow,models");
    cfg.endpoint = format!("http://127.0.0.1:1/{AZURITE_DEFAULT_ACCOUNT_NAME}");

    let outcomes = run(ctx, cfg).await;

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert_eq!(error_kind(outcome), Some(ErrorKind::Network));

        // The transport error follows the url in the logged line.
        let message = outcome.message();
        let prefix = format!(
            "Error creating container {0}: network error: failed to reach http://127.0.0.1:1/{AZURITE_DEFAULT_ACCOUNT_NAME}/{0}?restype=container: ",
            outcome.container
        );
        assert!(message.starts_with(&prefix), "unexpected message: {message}");
        assert!(message.len() > prefix.len(), "missing cause: {message}");
    }
}

#[tokio::test]
async fn test_run_from_context() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);
    let ctx = emulator_ctx(&emulator).with_env(StaticEnv::from_pairs([
        (AZURE_STORAGE_ACCOUNT, AZURITE_DEFAULT_ACCOUNT_NAME),
        (AZURE_STORAGE_ACCESS_KEY, AZURITE_DEFAULT_ACCOUNT_KEY),
    ]));

    let cfg = ProvisionConfig::from_context(&ctx).unwrap();
    let outcomes = run(ctx, cfg).await;

    assert_eq!(names(&outcomes), vec!["mlflow"]);
    assert!(outcomes[0].is_success());
    assert_eq!(emulator.containers(), vec!["mlflow"]);
}

#[tokio::test]
async fn test_run_from_context_with_container_list() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);
    let ctx = emulator_ctx(&emulator).with_env(StaticEnv::from_pairs([
        (AZURE_STORAGE_ACCOUNT, AZURITE_DEFAULT_ACCOUNT_NAME),
        (AZURE_STORAGE_ACCESS_KEY, AZURITE_DEFAULT_ACCOUNT_KEY),
        (COMMA_SEPARATED_CONTAINER_NAMES, "models,artifacts"),
    ]));

    let cfg = ProvisionConfig::from_context(&ctx).unwrap();
    let outcomes = sorted(run(ctx, cfg).await);

    assert_eq!(names(&outcomes), vec!["artifacts", "models"]);
    assert!(outcomes.iter().all(|v| v.is_success()));
}

#[tokio::test]
async fn test_ensure_container() {
    init_logger();
    let emulator = Emulator::new(AZURITE_DEFAULT_ACCOUNT_NAME);
    let provisioner = Provisioner::new(emulator_ctx(&emulator), &azurite_config("mlflow"));

    let outcome = provisioner
        .ensure_container(ContainerRequest::new("mlflow"))
        .await;

    assert_eq!(outcome.container, "mlflow");
    assert_eq!(outcome.result.unwrap().request_id, "request-0");
}
