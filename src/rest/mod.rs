//! REST API client.
//!
//! Every endpoint is a method on [`Client`]. `client.rs` holds the request plumbing along
//! with the market, account, order and fill endpoints; the remaining families each have
//! their own file.

pub mod client;
mod converts;
mod futures;
mod spot_margin;
mod subaccounts;
mod trigger_orders;
mod wallet;

pub use client::Client;
