use blobprep_azure_storage::{
    ContainerClient, CreateContainerResponse, Credential, RequestSigner, StaticCredentialProvider,
};
use blobprep_core::{Context, Error, Result, Signer};
use log::{debug, error, info, warn};
use tokio::task::JoinSet;

use crate::ProvisionConfig;

/// A container to create, consumed by a single creation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerRequest {
    /// Container name.
    pub name: String,
}

impl ContainerRequest {
    /// Create a request for the given container.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The result of one creation attempt.
#[derive(Debug)]
pub struct Outcome {
    /// Container the attempt was made for.
    pub container: String,
    /// Service response or the reason the attempt failed.
    pub result: Result<CreateContainerResponse>,
}

impl Outcome {
    /// Whether the container got created.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The line logged for this outcome.
    pub fn message(&self) -> String {
        match &self.result {
            Ok(resp) => format!(
                "Create container {} successfully, request id: {}",
                self.container, resp.request_id
            ),
            Err(err) => format!(
                "Error creating container {}: {}",
                self.container,
                describe_error(err)
            ),
        }
    }
}

/// Kind, message and every source of the error, joined by `: `.
///
/// A source repeating the text before it is skipped, errors converted with
/// `From` carry their own message as source.
fn describe_error(err: &Error) -> String {
    let mut s = format!("{}: {err}", err.kind());

    let mut last = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if text != last {
            s.push_str(": ");
            s.push_str(&text);
        }
        last = text;
        source = cause.source();
    }
    s
}

/// Provisioner creates containers concurrently with one shared client.
///
/// Cloning is cheap, clones share the client and its signer.
#[derive(Clone, Debug)]
pub struct Provisioner {
    client: ContainerClient,
}

impl Provisioner {
    /// Build a provisioner from config.
    ///
    /// A SAS token takes precedence over the shared key.
    pub fn new(ctx: Context, config: &ProvisionConfig) -> Self {
        let credential = match &config.sas_token {
            Some(token) => Credential::with_sas_token(token),
            None => Credential::with_shared_key(&config.account_name, &config.account_key),
        };
        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::new(credential),
            RequestSigner::new(),
        );

        Self {
            client: ContainerClient::new(&config.endpoint, signer),
        }
    }

    /// The client used for every request.
    pub fn client(&self) -> &ContainerClient {
        &self.client
    }

    /// Create one container and log how it went.
    ///
    /// Failures are returned in the outcome, never propagated.
    pub async fn ensure_container(&self, req: ContainerRequest) -> Outcome {
        let outcome = Outcome {
            result: self.client.create_container(&req.name).await,
            container: req.name,
        };

        if outcome.is_success() {
            info!("{}", outcome.message());
        } else {
            error!("{}", outcome.message());
        }
        outcome
    }

    /// Spawn every request, then wait for all of them.
    ///
    /// Outcomes come back in completion order.
    pub async fn run(&self, requests: Vec<ContainerRequest>) -> Vec<Outcome> {
        if requests.is_empty() {
            warn!("no container to create");
            return Vec::new();
        }

        let mut set = JoinSet::new();
        for req in requests {
            let provisioner = self.clone();
            set.spawn(async move { provisioner.ensure_container(req).await });
        }
        debug!(
            "spawned {} container tasks against {}",
            set.len(),
            self.client.endpoint()
        );

        let mut outcomes = Vec::with_capacity(set.len());
        while let Some(res) = set.join_next().await {
            match res {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => error!("container task failed to complete: {err}"),
            }
        }
        outcomes
    }
}

/// Create every container named in config.
pub async fn run(ctx: Context, config: ProvisionConfig) -> Vec<Outcome> {
    debug!("provisioning with {config:?}");
    Provisioner::new(ctx, &config).run(config.requests()).await
}
