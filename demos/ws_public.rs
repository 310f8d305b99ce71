// demos/ws_public.rs
use ftx_connector_rs::{Region, Stream, StreamConfig};
use std::env;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init();
    dotenv::dotenv().ok();

    let market = env::var("FTX_MARKET").unwrap_or_else(|_| "BTC-PERP".to_string());
    let stream = Stream::new(StreamConfig::new(Region::Global));
    let token = CancellationToken::new();

    println!("Subscribing to ticker and orderbook for {}...", market);
    let mut tickers = match stream.subscribe_to_tickers(&token, &[market.as_str()]).await {
        Ok(rx) => rx,
        Err(e) => {
            eprintln!("Failed to subscribe to tickers: {}", e);
            return;
        }
    };
    let mut books = match stream.subscribe_to_orderbooks(&token, &[market.as_str()]).await {
        Ok(rx) => rx,
        Err(e) => {
            eprintln!("Failed to subscribe to orderbooks: {}", e);
            token.cancel();
            return;
        }
    };

    let stopper = token.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(30)).await;
        println!("Cancelling subscriptions...");
        stopper.cancel();
    });

    let (mut tickers_open, mut books_open) = (true, true);
    while tickers_open || books_open {
        tokio::select! {
            msg = tickers.recv(), if tickers_open => match msg {
                Some(Ok(t)) => println!(
                    "Ticker {}: bid={:?} ask={:?} last={:?}",
                    t.base.symbol, t.ticker.bid, t.ticker.ask, t.ticker.last
                ),
                Some(Err(e)) => eprintln!("Ticker error: {}", e),
                None => tickers_open = false,
            },
            msg = books.recv(), if books_open => match msg {
                Some(Ok(b)) => println!(
                    "Orderbook {} ({:?}): best bid={:?} best ask={:?}",
                    b.base.symbol,
                    b.base.kind,
                    b.book.bids.first(),
                    b.book.asks.first()
                ),
                Some(Err(e)) => eprintln!("Orderbook error: {}", e),
                None => books_open = false,
            },
        }
    }

    println!("Example finished.");
}
