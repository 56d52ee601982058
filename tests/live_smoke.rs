use std::sync::Arc;
use std::time::Duration;

use kraken_rest_client::auth::EnvCredentials;
use kraken_rest_client::context::RequestContext;
use kraken_rest_client::instrument::TracedClient;
use kraken_rest_client::rest::{KrakenClient, SpotRestClient};

fn live_tests_enabled() -> bool {
    std::env::var("KRAKEN_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_public_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let client = TracedClient::new(SpotRestClient::new()?);
    let ctx = RequestContext::with_timeout(Duration::from_secs(10));

    let time = client.get_server_time(&ctx).await?.into_result()?;
    assert!(time.unixtime > 0);
    let _status = client.get_system_status(&ctx).await?.into_result()?;

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_private_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = SpotRestClient::builder()
        .credentials(Arc::new(credentials))
        .build()?;
    let ctx = RequestContext::with_timeout(Duration::from_secs(10));

    let _balances = client.get_account_balance(&ctx, None).await?.into_result()?;
    let token = client.get_websocket_token(&ctx, None).await?.into_result()?;
    assert!(!token.token.is_empty());

    Ok(())
}
