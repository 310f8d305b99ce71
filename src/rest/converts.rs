use super::client::Client;
use crate::error::Result;
use crate::types::{CreateQuoteRequest, QuoteStatus};
use reqwest::Method;
use serde::{Deserialize, Serialize};

impl Client {
    /// Requests a conversion quote and returns its id. `POST /otc/quotes`
    pub async fn create_quote(&self, req: CreateQuoteRequest) -> Result<i64> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreatedQuote {
            quote_id: i64,
        }

        let request =
            self.build_signed_request::<(), _>(Method::POST, "/otc/quotes", None, Some(&req))?;
        let created: CreatedQuote = self.send_request(request).await?;
        Ok(created.quote_id)
    }

    /// `GET /otc/quotes/{quote_id}`
    pub async fn get_quote_status(
        &self,
        quote_id: i64,
        market: Option<&str>,
    ) -> Result<QuoteStatus> {
        #[derive(Serialize)]
        struct MarketQuery<'a> {
            market: &'a str,
        }

        let path = format!("/otc/quotes/{}", quote_id);
        let query = market.map(|market| MarketQuery { market });
        let request =
            self.build_signed_request::<_, ()>(Method::GET, &path, query.as_ref(), None)?;
        self.send_request(request).await
    }

    /// `POST /otc/quotes/{quote_id}/accept`
    pub async fn accept_quote(&self, quote_id: i64) -> Result<()> {
        let path = format!("/otc/quotes/{}/accept", quote_id);
        let request = self.build_signed_request::<(), ()>(Method::POST, &path, None, None)?;
        self.send_empty(request).await
    }
}
