use super::client::Client;
use crate::error::Result;
use crate::types::{Balance, WithdrawRequest, Withdrawal};
use log::*;
use reqwest::Method;

impl Client {
    /// Balances of the account (or of the sub-account the credentials name).
    /// `GET /wallet/balances`
    pub async fn get_balances(&self) -> Result<Vec<Balance>> {
        let request =
            self.build_signed_request::<(), ()>(Method::GET, "/wallet/balances", None, None)?;
        self.send_request(request).await
    }

    /// `POST /wallet/withdrawals`
    pub async fn withdraw(&self, req: WithdrawRequest) -> Result<Withdrawal> {
        info!("Requesting withdrawal of {} {}", req.size, req.coin);
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/wallet/withdrawals",
            None,
            Some(&req),
        )?;
        self.send_request(request).await
    }
}
