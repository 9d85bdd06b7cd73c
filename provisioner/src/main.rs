use anyhow::Result;
use blobprep::{run, ProvisionConfig};
use blobprep_core::{Context, OsEnv};
use blobprep_http_send_reqwest::ReqwestHttpSend;
use log::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // Variables already set win over the ones in `.env`.
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = ProvisionConfig::from_context(&ctx)?;

    let outcomes = run(ctx, config).await;
    let created = outcomes.iter().filter(|v| v.is_success()).count();
    debug!("created {created} of {} containers", outcomes.len());

    Ok(())
}
