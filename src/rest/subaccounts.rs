use super::client::{encode_component, Client};
use crate::error::Result;
use crate::types::{Balance, Subaccount, Transfer, TransferRequest};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NicknameBody<'a> {
    nickname: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_nickname: Option<&'a str>,
}

impl Client {
    /// `GET /subaccounts`
    pub async fn get_subaccounts(&self) -> Result<Vec<Subaccount>> {
        let request =
            self.build_signed_request::<(), ()>(Method::GET, "/subaccounts", None, None)?;
        self.send_request(request).await
    }

    /// `POST /subaccounts`
    pub async fn create_subaccount(&self, nickname: &str) -> Result<Subaccount> {
        let body = NicknameBody {
            nickname,
            new_nickname: None,
        };
        let request =
            self.build_signed_request::<(), _>(Method::POST, "/subaccounts", None, Some(&body))?;
        self.send_request(request).await
    }

    /// `POST /subaccounts/update_name`
    pub async fn change_subaccount_name(&self, nickname: &str, new_nickname: &str) -> Result<()> {
        let body = NicknameBody {
            nickname,
            new_nickname: Some(new_nickname),
        };
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/subaccounts/update_name",
            None,
            Some(&body),
        )?;
        self.send_empty(request).await
    }

    /// `DELETE /subaccounts`
    pub async fn delete_subaccount(&self, nickname: &str) -> Result<()> {
        let body = NicknameBody {
            nickname,
            new_nickname: None,
        };
        let request = self.build_signed_request::<(), _>(
            Method::DELETE,
            "/subaccounts",
            None,
            Some(&body),
        )?;
        self.send_empty(request).await
    }

    /// `GET /subaccounts/{nickname}/balances`
    pub async fn get_subaccount_balances(&self, nickname: &str) -> Result<Vec<Balance>> {
        let path = format!("/subaccounts/{}/balances", encode_component(nickname));
        let request = self.build_signed_request::<(), ()>(Method::GET, &path, None, None)?;
        self.send_request(request).await
    }

    /// Moves funds between the main account and sub-accounts. `POST /subaccounts/transfer`
    pub async fn transfer(&self, req: TransferRequest) -> Result<Transfer> {
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/subaccounts/transfer",
            None,
            Some(&req),
        )?;
        self.send_request(request).await
    }
}
