use std::str::FromStr;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rust_decimal::Decimal;
use wiremock::matchers::{body_string, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kraken_rest_client::auth::{Authorizer, CounterNonce, SecurityOptions, StaticCredentials};
use kraken_rest_client::context::RequestContext;
use kraken_rest_client::error::KrakenError;
use kraken_rest_client::rest::SpotRestClient;
use kraken_rest_client::rest::private::{
    AddOrderRequest, DepositMethodsRequest, EarnAllocateRequest, EarnStatusRequest,
    EarnStrategiesRequest, QueryOrdersRequest, TransferState, TransferStatusRequest,
    WalletTransferRequest, WithdrawCancelRequest, WithdrawInfoRequest,
};
use kraken_rest_client::types::BuySell;

const DOC_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
const DOC_SIGNATURE: &str =
    "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ==";

fn build_client(server: &MockServer) -> SpotRestClient {
    let secret = STANDARD.encode("test_secret");
    let credentials = Arc::new(StaticCredentials::new("test_key", secret));
    SpotRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials)
        .max_retries(0)
        .build()
        .unwrap()
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": [], "result": result }))
}

#[tokio::test]
async fn test_add_order_matches_documented_signature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/AddOrder"))
        .and(header("api-key", "doc-key"))
        .and(header("api-sign", DOC_SIGNATURE))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25",
        ))
        .respond_with(ok(serde_json::json!({
            "descr": { "order": "buy 1.25000000 XBTUSD @ limit 37500.0" },
            "txid": ["OUF4EM-FRGI2-MQMWZD"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("doc-key", DOC_SECRET)))
        .nonce_provider(Arc::new(CounterNonce::starting_after(1_616_492_376_593)))
        .build()
        .unwrap();

    let request = AddOrderRequest::limit(
        BuySell::Buy,
        "XBTUSD",
        Decimal::from_str("1.25").unwrap(),
        Decimal::from_str("37500").unwrap(),
    );
    let placed = client
        .add_order(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(placed.txid, vec!["OUF4EM-FRGI2-MQMWZD".to_string()]);
}

#[tokio::test]
async fn test_second_factor_is_appended_to_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/Balance"))
        .and(header_exists("api-sign"))
        .and(body_string("nonce=43&otp=123456"))
        .respond_with(ok(serde_json::json!({ "XXBT": "0.5000000000", "ZUSD": "171288.6158" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key", STANDARD.encode("s"))))
        .nonce_provider(Arc::new(CounterNonce::starting_after(42)))
        .build()
        .unwrap();

    let otp = SecurityOptions::otp("123456");
    let balances = client
        .get_account_balance(&RequestContext::background(), Some(&otp))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(balances["XXBT"].to_string(), "0.5000000000");
}

#[tokio::test]
async fn test_private_call_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    let err = client
        .get_account_balance(&RequestContext::background(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, KrakenError::MissingCredentials));
}

#[tokio::test]
async fn test_query_orders_joins_txids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/QueryOrders"))
        .and(body_string_contains("txid=OBCMZD-JIEE7-77TH3F%2COMMDB2-FSB6Z-7W3HPO"))
        .respond_with(ok(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = QueryOrdersRequest::new(["OBCMZD-JIEE7-77TH3F", "OMMDB2-FSB6Z-7W3HPO"]);
    let orders = client
        .query_orders(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_get_deposit_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/DepositMethods"))
        .and(body_string_contains("asset=XBT"))
        .respond_with(ok(serde_json::json!([{
            "method": "Bitcoin",
            "limit": false,
            "fee": null,
            "address-setup-fee": null,
            "gen-address": true,
            "minimum": "0.0001"
        }])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = DepositMethodsRequest::new("XBT");
    let methods = client
        .get_deposit_methods(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].method, "Bitcoin");
    assert!(methods[0].limit.is_none());
    assert_eq!(methods[0].gen_address, Some(true));
}

#[tokio::test]
async fn test_get_withdraw_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/WithdrawInfo"))
        .and(body_string_contains("asset=USDT"))
        .and(body_string_contains("key=main"))
        .respond_with(ok(serde_json::json!({
            "method": "Tether USD (TRC20)",
            "limit": "10.0",
            "fee": "0.0005",
            "amount": "1.0"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = WithdrawInfoRequest::new("USDT", "main", Decimal::from_str("1.0").unwrap());
    let info = client
        .get_withdraw_info(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(info.method, "Tether USD (TRC20)");
    assert_eq!(info.limit, Some(Decimal::from_str("10.0").unwrap()));
}

#[tokio::test]
async fn test_get_deposit_status_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/DepositStatus"))
        .and(body_string_contains("asset=XBT"))
        .respond_with(ok(serde_json::json!([{
            "method": "Bitcoin",
            "aclass": "currency",
            "asset": "XXBT",
            "refid": "REF-1",
            "txid": "TX-1",
            "info": "test",
            "amount": "0.5",
            "fee": "0.0001",
            "time": 1_700_000_000,
            "status": "Success",
            "status-prop": "onhold"
        }])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = TransferStatusRequest::asset("XBT");
    let deposits = client
        .get_deposit_status(&RequestContext::background(), Some(&request), None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].status, TransferState::Success);
}

#[tokio::test]
async fn test_cancel_withdrawal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/WithdrawCancel"))
        .and(body_string_contains("asset=XBT"))
        .and(body_string_contains("refid=REF-3"))
        .respond_with(ok(serde_json::json!(true)))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = WithdrawCancelRequest::new("XBT", "REF-3");
    let cancelled = client
        .cancel_withdrawal(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert!(cancelled);
}

#[tokio::test]
async fn test_wallet_transfer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/WalletTransfer"))
        .and(body_string_contains("asset=USDT"))
        .and(body_string_contains("from=Spot+Wallet"))
        .and(body_string_contains("to=Futures+Wallet"))
        .respond_with(ok(serde_json::json!({ "refid": "TRANSFER-1" })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = WalletTransferRequest::to_futures("USDT", Decimal::new(10, 0));
    let confirmation = client
        .wallet_transfer(&RequestContext::background(), &request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(confirmation.refid, "TRANSFER-1");
}

#[tokio::test]
async fn test_list_earn_strategies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/Earn/Strategies"))
        .respond_with(ok(serde_json::json!({
            "items": [{
                "allocation_fee": "0.1",
                "allocation_restriction_info": [],
                "apr_estimate": { "low": "0.01", "high": "0.05" },
                "asset": "XBT",
                "auto_compound": { "type": "enabled", "default": true },
                "can_allocate": true,
                "can_deallocate": true,
                "deallocation_fee": "0.0",
                "id": "STRAT-1",
                "lock_type": { "type": "bonded" },
                "user_cap": "100.0",
                "user_min_allocation": "0.01",
                "yield_source": { "type": "staking" }
            }],
            "next_cursor": null
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let strategies = client
        .list_earn_strategies(
            &RequestContext::background(),
            Some(&EarnStrategiesRequest::default()),
            None,
        )
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(strategies.items.len(), 1);
    assert_eq!(strategies.items[0].asset, "XBT");
    assert_eq!(strategies.items[0].allocation_fee(), Some(Decimal::new(1, 1)));
    assert!(strategies.next_cursor.is_none());
}

#[tokio::test]
async fn test_earn_allocate_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/Earn/Allocate"))
        .and(body_string_contains("strategy_id=STRAT-2"))
        .respond_with(ok(serde_json::json!(true)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/0/private/Earn/AllocateStatus"))
        .and(body_string_contains("strategy_id=STRAT-2"))
        .respond_with(ok(serde_json::json!({ "pending": true })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let ctx = RequestContext::background();
    let allocate_request = EarnAllocateRequest::new(Decimal::new(1, 0), "STRAT-2");
    let accepted = client
        .allocate_earn_funds(&ctx, &allocate_request, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(accepted);

    let status = client
        .get_earn_allocation_status(&ctx, &EarnStatusRequest::new("STRAT-2"), None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(status.pending);
}

#[tokio::test]
async fn test_rejected_order_keeps_both_channels_apart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/AddOrder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": ["EOrder:Insufficient funds"]
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = AddOrderRequest::market(BuySell::Sell, "XBTUSD", Decimal::ONE);
    let envelope = client
        .add_order(&RequestContext::background(), &request, None)
        .await
        .unwrap();
    assert!(envelope.result.is_none());
    let api_error = envelope.api_error().unwrap();
    assert_eq!(api_error.code, "EOrder");
    assert_eq!(api_error.message, "Insufficient funds");
}

#[tokio::test]
async fn test_get_websocket_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/GetWebSocketsToken"))
        .and(header_exists("api-key"))
        .respond_with(ok(serde_json::json!({
            "token": "1Dwc4lzSwNWOAwkMdqhssNNFhs1ed606d1WcF3XfEMw",
            "expires": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let token = client
        .get_websocket_token(&RequestContext::background(), None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(token.expires, 900);
    assert!(!token.token.is_empty());
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    let secret = STANDARD.encode("test_secret");
    let expected_sign = Authorizer::new("test_key", &secret)
        .unwrap()
        .sign("/0/private/Balance", 101, "nonce=101");

    Mock::given(method("GET"))
        .and(path("/kraken/0/public/Time"))
        .respond_with(ok(serde_json::json!({ "unixtime": 1_700_000_000, "rfc1123": "x" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/kraken/0/private/Balance"))
        .and(header("api-sign", expected_sign.as_str()))
        .and(body_string("nonce=101"))
        .respond_with(ok(serde_json::json!({ "ZUSD": "10.0" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotRestClient::builder()
        .base_url(format!("{}/kraken", server.uri()))
        .credentials(Arc::new(StaticCredentials::new("test_key", secret)))
        .nonce_provider(Arc::new(CounterNonce::starting_after(100)))
        .max_retries(0)
        .build()
        .unwrap();
    let ctx = RequestContext::background();

    let time = client.get_server_time(&ctx).await.unwrap().into_result().unwrap();
    assert_eq!(time.unixtime, 1_700_000_000);

    let balances = client
        .get_account_balance(&ctx, None)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(balances["ZUSD"], Decimal::from_str("10.0").unwrap());
}
