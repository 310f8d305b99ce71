// demos/rest_private.rs
use ftx_connector_rs::rest::Client;
use ftx_connector_rs::{Credentials, Region};
use std::env;

#[tokio::main]
async fn main() {
    env_logger::init();
    dotenv::dotenv().ok();

    let api_key = env::var("FTX_KEY").expect("FTX_KEY not set");
    let api_secret = env::var("FTX_SECRET").expect("FTX_SECRET not set");
    let mut credentials = Credentials::new(api_key, api_secret);
    if let Ok(subaccount) = env::var("FTX_SUBACCOUNT") {
        credentials = credentials.with_subaccount(subaccount);
    }

    let mut client = match Client::new(Region::Global, Some(credentials), None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    match client.sync_server_time().await {
        Ok(diff) => println!("Server time offset: {} ms", diff),
        Err(e) => eprintln!("Error syncing server time: {}", e),
    }

    println!("\nFetching account information...");
    match client.get_account_information().await {
        Ok(account) => println!("Account Info: {:?}", account),
        Err(e) => eprintln!("Error fetching account info: {}", e),
    }

    println!("\nFetching positions...");
    match client.get_positions().await {
        Ok(positions) => println!("Positions: {:?}", positions),
        Err(e) => eprintln!("Error fetching positions: {}", e),
    }

    println!("\nFetching balances...");
    match client.get_balances().await {
        Ok(balances) => {
            for balance in balances {
                println!("  {}: free={} total={}", balance.coin, balance.free, balance.total);
            }
        }
        Err(e) => eprintln!("Error fetching balances: {}", e),
    }

    println!("\nFetching open orders...");
    match client.get_open_orders(None).await {
        Ok(orders) => println!("Open Orders: {:?}", orders),
        Err(e) => eprintln!("Error fetching open orders: {}", e),
    }

    println!("\nFetching open trigger orders...");
    match client.get_open_trigger_orders(None).await {
        Ok(orders) => println!("Open Trigger Orders: {:?}", orders),
        Err(e) => eprintln!("Error fetching trigger orders: {}", e),
    }

    println!("\nExample finished.");
}
