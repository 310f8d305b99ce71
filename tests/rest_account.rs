// tests/rest_account.rs

mod common;

use ftx_connector_rs::auth::Credentials;
use ftx_connector_rs::config::Region;
use ftx_connector_rs::rest::Client;
use ftx_connector_rs::types::{
    CreateQuoteRequest, LendingOffer, Side, TransferRequest, WithdrawRequest,
};
use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use serde_json::json;

fn signed_client(server: &Server) -> Client {
    Client::with_base_url(
        &server.url(),
        Region::Global,
        Some(Credentials::new("test_key", "test_secret")),
        None,
    )
    .unwrap()
}

fn hex_signature() -> Matcher {
    Matcher::Regex("^[0-9a-f]{64}$".to_string())
}

// --- Sub-accounts ---

#[tokio::test]
async fn test_subaccount_lifecycle() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/subaccounts")
        .match_header("ftx-sign", hex_signature())
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [
                {"nickname": "sub1", "deletable": true, "editable": true, "competition": false}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let create = server
        .mock("POST", "/subaccounts")
        .match_body(Matcher::Json(json!({"nickname": "sub2"})))
        .with_status(200)
        .with_body(
            json!({"success": true, "result": {"nickname": "sub2", "deletable": true, "editable": true}})
                .to_string(),
        )
        .create_async()
        .await;
    let rename = server
        .mock("POST", "/subaccounts/update_name")
        .match_body(Matcher::Json(json!({"nickname": "sub2", "newNickname": "newSub2"})))
        .with_status(200)
        .with_body(json!({"success": true, "result": null}).to_string())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/subaccounts")
        .match_header("ftx-sign", hex_signature())
        .match_body(Matcher::Json(json!({"nickname": "newSub2"})))
        .with_status(200)
        .with_body(json!({"success": true, "result": null}).to_string())
        .create_async()
        .await;

    let client = signed_client(&server);
    let subaccounts = client.get_subaccounts().await.unwrap();
    assert_eq!(subaccounts.len(), 1);
    assert_eq!(subaccounts[0].nickname, "sub1");
    assert!(subaccounts[0].deletable);

    let created = client.create_subaccount("sub2").await.unwrap();
    assert_eq!(created.nickname, "sub2");
    assert!(!created.competition);

    tokio_test::assert_ok!(client.change_subaccount_name("sub2", "newSub2").await);
    tokio_test::assert_ok!(client.delete_subaccount("newSub2").await);

    list.assert_async().await;
    create.assert_async().await;
    rename.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_subaccount_balances_and_transfer() {
    let mut server = Server::new_async().await;
    let _balances = server
        .mock("GET", "/subaccounts/sub1/balances")
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [
                {"coin": "USDT", "free": 4321.2, "total": 4340.2, "spotBorrow": 0, "availableWithoutBorrow": 2320.2}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let transfer = server
        .mock("POST", "/subaccounts/transfer")
        .match_body(Matcher::Json(json!({
            "coin": "USDT",
            "size": "100",
            "source": null,
            "destination": "sub1"
        })))
        .with_status(200)
        .with_body(
            json!({"success": true, "result": {
                "id": 316450, "coin": "USDT", "size": 100, "time": "2019-03-05T09:56:55.728933+00:00",
                "notes": "", "status": "complete"
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let client = signed_client(&server);
    let balances = client.get_subaccount_balances("sub1").await.unwrap();
    assert_eq!(balances[0].coin, "USDT");
    assert_eq!(balances[0].free, dec!(4321.2));
    assert_eq!(balances[0].total, dec!(4340.2));

    let done = client
        .transfer(TransferRequest {
            coin: "USDT".to_string(),
            size: dec!(100),
            source: None,
            destination: Some("sub1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(done.id, 316450);
    assert_eq!(done.status, "complete");
    transfer.assert_async().await;
}

// --- Wallet ---

#[tokio::test]
async fn test_wallet_balances_are_scoped_to_subaccount_header() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/wallet/balances")
        .match_header("ftx-subaccount", "bot")
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [
                {"coin": "BTC", "free": "0.00000001", "total": "1.00000001", "usdValue": 50000.0005}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = Client::with_base_url(
        &server.url(),
        Region::Global,
        Some(Credentials::new("test_key", "test_secret").with_subaccount("bot")),
        None,
    )
    .unwrap();
    let balances = client.get_balances().await.unwrap();
    assert_eq!(balances[0].free, dec!(0.00000001));
    assert_eq!(balances[0].usd_value, Some(dec!(50000.0005)));
    m.assert_async().await;
}

#[tokio::test]
async fn test_withdraw() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/wallet/withdrawals")
        .match_header("ftx-sign", hex_signature())
        .match_body(Matcher::Json(json!({
            "coin": "USDTBEAR",
            "size": "20.2",
            "address": "0x83a127952d266A6eA306c40Ac62A4a70668FE3BE"
        })))
        .with_status(200)
        .with_body(
            json!({"success": true, "result": {
                "coin": "USDTBEAR", "address": "0x83a127952d266A6eA306c40Ac62A4a70668FE3BE",
                "tag": null, "fee": 0, "id": 1, "size": "20.2", "status": "requested",
                "time": "2019-03-05T09:56:55.728933+00:00", "txid": null
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let withdrawal = signed_client(&server)
        .withdraw(WithdrawRequest {
            coin: "USDTBEAR".to_string(),
            size: dec!(20.2),
            address: "0x83a127952d266A6eA306c40Ac62A4a70668FE3BE".to_string(),
            tag: None,
            method: None,
        })
        .await
        .unwrap();
    assert_eq!(withdrawal.status, "requested");
    assert_eq!(withdrawal.fee, Some(dec!(0)));
    assert_eq!(withdrawal.txid, None);
    m.assert_async().await;
}

// --- Spot margin ---

#[tokio::test]
async fn test_spot_margin_rates_and_history() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for path in ["/spot_margin/borrow_rates", "/spot_margin/lending_rates"] {
        let m = server
            .mock("GET", path)
            .match_header("ftx-sign", hex_signature())
            .with_status(200)
            .with_body(
                json!({"success": true, "result": [{"coin": "BTC", "estimate": 1.45e-06, "previous": 1.44e-06}]})
                    .to_string(),
            )
            .create_async()
            .await;
        mocks.push(m);
    }
    for path in ["/spot_margin/borrow_history", "/spot_margin/lending_history"] {
        let m = server
            .mock("GET", path)
            .with_status(200)
            .with_body(
                json!({"success": true, "result": [
                    {"coin": "BTC", "cost": 0.00047864470072, "rate": 1.961096e-05, "size": 24.407, "time": "2020-11-30T12:00:00+00:00"}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        mocks.push(m);
    }
    let _summary = server
        .mock("GET", "/spot_margin/borrow_summary")
        .with_status(200)
        .with_body(json!({"success": true, "result": [{"coin": "BTC", "size": 120.1}]}).to_string())
        .create_async()
        .await;

    let client = signed_client(&server);
    let borrow = client.get_borrow_rates().await.unwrap();
    assert_eq!(borrow[0].estimate, dec!(0.00000145));
    let lending = client.get_lending_rates().await.unwrap();
    assert_eq!(lending[0].previous, dec!(0.00000144));

    let history = client.get_borrow_history().await.unwrap();
    assert_eq!(history[0].cost, dec!(0.00047864470072));
    assert_eq!(history[0].size, dec!(24.407));
    assert_eq!(client.get_lending_history().await.unwrap().len(), 1);

    let summary = client.get_daily_borrowed_amounts().await.unwrap();
    assert_eq!(summary[0].size, dec!(120.1));
    for m in mocks {
        m.assert_async().await;
    }
}

#[tokio::test]
async fn test_spot_margin_market_info() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/spot_margin/market_info")
        .match_query(Matcher::UrlEncoded("market".into(), "BTC/USD".into()))
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [
                {"coin": "BTC", "borrowed": 0.0, "free": 3.87278021, "estimatedRate": 1e-05, "previousRate": 1e-05},
                {"coin": "USD", "borrowed": 0.0, "free": 80000.0, "estimatedRate": 1e-05, "previousRate": 1e-05}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let info = signed_client(&server)
        .get_spot_margin_market_info("BTC/USD")
        .await
        .unwrap();
    assert_eq!(info.len(), 2);
    assert_eq!(info[0].coin, "BTC");
    assert_eq!(info[1].free, dec!(80000));
    assert_eq!(info[0].estimated_rate, dec!(0.00001));
}

#[tokio::test]
async fn test_lending_offers_and_info() {
    let mut server = Server::new_async().await;
    let _offers = server
        .mock("GET", "/spot_margin/offers")
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [{"coin": "USD", "rate": 1e-06, "size": 1000.0}]})
                .to_string(),
        )
        .create_async()
        .await;
    let _info = server
        .mock("GET", "/spot_margin/lending_info")
        .with_status(200)
        .with_body(
            json!({"success": true, "result": [
                {"coin": "USD", "lendable": 10026.5, "locked": 100.0, "minRate": 1e-06, "offered": 100.0}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/spot_margin/offers")
        .match_body(Matcher::Json(json!({"coin": "USD", "size": "10", "rate": "0.000001"})))
        .with_status(200)
        .with_body(json!({"success": true, "result": null}).to_string())
        .create_async()
        .await;

    let client = signed_client(&server);
    let offers = client.get_lending_offers().await.unwrap();
    assert_eq!(offers[0].rate, dec!(0.000001));
    let info = client.get_lending_info().await.unwrap();
    assert_eq!(info[0].lendable, dec!(10026.5));
    assert_eq!(info[0].min_rate, Some(dec!(0.000001)));

    tokio_test::assert_ok!(
        client
            .submit_lending_offer(LendingOffer {
                coin: "USD".to_string(),
                size: dec!(10),
                rate: dec!(0.000001),
            })
            .await
    );
    submit.assert_async().await;
}

// --- Converts ---

#[tokio::test]
async fn test_convert_quote_flow() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/otc/quotes")
        .match_body(Matcher::Json(json!({"fromCoin": "EUR", "toCoin": "USD", "size": "1"})))
        .with_status(200)
        .with_body(json!({"success": true, "result": {"quoteId": 4202838}}).to_string())
        .create_async()
        .await;
    let status = server
        .mock("GET", "/otc/quotes/4202838")
        .match_query(Matcher::UrlEncoded("market".into(), "EUR/USD".into()))
        .with_status(200)
        .with_body(
            json!({"success": true, "result": {
                "baseCoin": "EUR", "cost": 1, "expired": false, "filled": false, "fromCoin": "EUR",
                "id": 4202838, "price": 1.1853, "proceeds": 1.1853, "quoteCoin": "USD",
                "side": "sell", "toCoin": "USD"
            }})
            .to_string(),
        )
        .create_async()
        .await;
    let accept = server
        .mock("POST", "/otc/quotes/4202838/accept")
        .match_header("ftx-sign", hex_signature())
        .with_status(200)
        .with_body(json!({"success": true, "result": null}).to_string())
        .create_async()
        .await;

    let client = signed_client(&server);
    let quote_id = client
        .create_quote(CreateQuoteRequest {
            from_coin: "EUR".to_string(),
            to_coin: "USD".to_string(),
            size: dec!(1),
        })
        .await
        .unwrap();
    assert_eq!(quote_id, 4202838);

    let quote = client
        .get_quote_status(quote_id, Some("EUR/USD"))
        .await
        .unwrap();
    assert_eq!(quote.side, Side::Sell);
    assert_eq!(quote.price, dec!(1.1853));
    assert!(!quote.filled);

    tokio_test::assert_ok!(client.accept_quote(quote_id).await);
    create.assert_async().await;
    status.assert_async().await;
    accept.assert_async().await;
}
