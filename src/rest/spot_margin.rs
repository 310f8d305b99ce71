use super::client::Client;
use crate::error::Result;
use crate::types::{
    BorrowSummary, LendingInfo, LendingOffer, SpotMarginHistory, SpotMarginMarketInfo,
    SpotMarginRate,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

impl Client {
    async fn get_spot_margin<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.build_signed_request::<(), ()>(Method::GET, path, None, None)?;
        self.send_request(request).await
    }

    /// `GET /spot_margin/borrow_rates`
    pub async fn get_borrow_rates(&self) -> Result<Vec<SpotMarginRate>> {
        self.get_spot_margin("/spot_margin/borrow_rates").await
    }

    /// `GET /spot_margin/lending_rates`
    pub async fn get_lending_rates(&self) -> Result<Vec<SpotMarginRate>> {
        self.get_spot_margin("/spot_margin/lending_rates").await
    }

    /// Amount borrowed per coin over the last day. `GET /spot_margin/borrow_summary`
    pub async fn get_daily_borrowed_amounts(&self) -> Result<Vec<BorrowSummary>> {
        self.get_spot_margin("/spot_margin/borrow_summary").await
    }

    /// Borrow state of both coins of a spot market, base first.
    /// `GET /spot_margin/market_info`
    pub async fn get_spot_margin_market_info(
        &self,
        market: &str,
    ) -> Result<Vec<SpotMarginMarketInfo>> {
        #[derive(Serialize)]
        struct MarketQuery<'a> {
            market: &'a str,
        }

        let query = MarketQuery { market };
        let request = self.build_signed_request::<_, ()>(
            Method::GET,
            "/spot_margin/market_info",
            Some(&query),
            None,
        )?;
        self.send_request(request).await
    }

    /// `GET /spot_margin/borrow_history`
    pub async fn get_borrow_history(&self) -> Result<Vec<SpotMarginHistory>> {
        self.get_spot_margin("/spot_margin/borrow_history").await
    }

    /// `GET /spot_margin/lending_history`
    pub async fn get_lending_history(&self) -> Result<Vec<SpotMarginHistory>> {
        self.get_spot_margin("/spot_margin/lending_history").await
    }

    /// `GET /spot_margin/offers`
    pub async fn get_lending_offers(&self) -> Result<Vec<LendingOffer>> {
        self.get_spot_margin("/spot_margin/offers").await
    }

    /// `GET /spot_margin/lending_info`
    pub async fn get_lending_info(&self) -> Result<Vec<LendingInfo>> {
        self.get_spot_margin("/spot_margin/lending_info").await
    }

    /// Replaces the offer for `offer.coin`; a size of zero withdraws it.
    /// `POST /spot_margin/offers`
    pub async fn submit_lending_offer(&self, offer: LendingOffer) -> Result<()> {
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/spot_margin/offers",
            None,
            Some(&offer),
        )?;
        self.send_empty(request).await
    }
}
