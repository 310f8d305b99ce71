use super::client::Client;
use crate::error::Result;
use crate::types::{
    GetTriggerOrdersHistoryParams, GetTriggerOrdersParams, ModifyTriggerOrderRequest,
    PlaceTriggerOrderRequest, Trigger, TriggerOrder,
};
use log::*;
use reqwest::Method;

impl Client {
    /// Open conditional orders. `GET /conditional_orders`
    pub async fn get_open_trigger_orders(
        &self,
        params: Option<GetTriggerOrdersParams>,
    ) -> Result<Vec<TriggerOrder>> {
        let request = self.build_signed_request::<_, ()>(
            Method::GET,
            "/conditional_orders",
            params.as_ref(),
            None,
        )?;
        self.send_request(request).await
    }

    /// Every time the conditional order fired. `GET /conditional_orders/{id}/triggers`
    pub async fn get_order_triggers(&self, trigger_order_id: i64) -> Result<Vec<Trigger>> {
        let path = format!("/conditional_orders/{}/triggers", trigger_order_id);
        let request = self.build_signed_request::<(), ()>(Method::GET, &path, None, None)?;
        self.send_request(request).await
    }

    /// `GET /conditional_orders/history`
    pub async fn get_trigger_orders_history(
        &self,
        params: Option<GetTriggerOrdersHistoryParams>,
    ) -> Result<Vec<TriggerOrder>> {
        let request = self.build_signed_request::<_, ()>(
            Method::GET,
            "/conditional_orders/history",
            params.as_ref(),
            None,
        )?;
        self.send_request(request).await
    }

    /// Places a stop, trailing stop or take profit order. The request is checked with
    /// [`PlaceTriggerOrderRequest::validate`] before anything is sent.
    /// `POST /conditional_orders`
    pub async fn place_trigger_order(&self, req: PlaceTriggerOrderRequest) -> Result<TriggerOrder> {
        if let Err(e) = req.validate() {
            warn!("Refusing to send {:?} order: {}", req.trigger_type, e);
            return Err(e);
        }
        let request = self.build_signed_request::<(), _>(
            Method::POST,
            "/conditional_orders",
            None,
            Some(&req),
        )?;
        self.send_request(request).await
    }

    /// The returned order replaces the modified one and has a new id.
    /// `POST /conditional_orders/{id}/modify`
    pub async fn modify_trigger_order(
        &self,
        trigger_order_id: i64,
        req: ModifyTriggerOrderRequest,
    ) -> Result<TriggerOrder> {
        let path = format!("/conditional_orders/{}/modify", trigger_order_id);
        let request = self.build_signed_request::<(), _>(Method::POST, &path, None, Some(&req))?;
        self.send_request(request).await
    }

    /// `DELETE /conditional_orders/{id}`
    pub async fn cancel_trigger_order(&self, trigger_order_id: i64) -> Result<String> {
        let path = format!("/conditional_orders/{}", trigger_order_id);
        let request = self.build_signed_request::<(), ()>(Method::DELETE, &path, None, None)?;
        self.send_request(request).await
    }
}
