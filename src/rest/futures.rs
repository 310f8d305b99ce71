//! Public futures and index endpoints. None of them are signed.

use super::client::Client;
use crate::error::Result;
use crate::types::{Candle, FundingRate, Future, FutureStats, GetCandlesParams, GetFundingRatesParams};
use reqwest::Method;
use rust_decimal::Decimal;
use std::collections::HashMap;

impl Client {
    /// `GET /futures`
    pub async fn get_futures(&self) -> Result<Vec<Future>> {
        let request = self.build_public_request::<()>(Method::GET, "/futures", None)?;
        self.send_request(request).await
    }

    /// `GET /futures/{name}`
    pub async fn get_future(&self, name: &str) -> Result<Future> {
        let path = format!("/futures/{}", name);
        let request = self.build_public_request::<()>(Method::GET, &path, None)?;
        self.send_request(request).await
    }

    /// `GET /futures/{name}/stats`
    pub async fn get_future_stats(&self, name: &str) -> Result<FutureStats> {
        let path = format!("/futures/{}/stats", name);
        let request = self.build_public_request::<()>(Method::GET, &path, None)?;
        self.send_request(request).await
    }

    /// `GET /funding_rates`
    pub async fn get_funding_rates(
        &self,
        params: Option<GetFundingRatesParams>,
    ) -> Result<Vec<FundingRate>> {
        let request =
            self.build_public_request(Method::GET, "/funding_rates", params.as_ref())?;
        self.send_request(request).await
    }

    /// Constituent weights of an index, keyed by coin. `GET /indexes/{index}/weights`
    pub async fn get_index_weights(&self, index: &str) -> Result<HashMap<String, Decimal>> {
        let path = format!("/indexes/{}/weights", index);
        let request = self.build_public_request::<()>(Method::GET, &path, None)?;
        self.send_request(request).await
    }

    /// `GET /expired_futures`
    pub async fn get_expired_futures(&self) -> Result<Vec<Future>> {
        let request = self.build_public_request::<()>(Method::GET, "/expired_futures", None)?;
        self.send_request(request).await
    }

    /// `GET /indexes/{index}/candles`
    pub async fn get_historical_index(
        &self,
        index: &str,
        params: GetCandlesParams,
    ) -> Result<Vec<Candle>> {
        let path = format!("/indexes/{}/candles", index);
        let request = self.build_public_request(Method::GET, &path, Some(&params))?;
        self.send_request(request).await
    }
}
