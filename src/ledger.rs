use serde::Deserialize;

use crate::{Hooks, RequestOptions, Result, ServiceClient};

/// Ledger base URL used when `LEDGER_URL` is not set.
pub const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:8006";

const PAYOUTS_PAGE_SIZE: u32 = 15;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TransactionState {
    pub status: String,
    #[serde(default)]
    pub finished: bool,
}

/// A transaction as stored by ledger.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LedgerTransaction {
    pub transaction_id: String,
    #[serde(default)]
    pub transaction_type: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default)]
    pub net_amount: Option<i64>,
    #[serde(default)]
    pub state: Option<TransactionState>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gateway_account_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Payout {
    pub gateway_payout_id: String,
    pub gateway_account_id: String,
    pub amount: i64,
    #[serde(default)]
    pub paid_out_date: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// One page of payouts.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PayoutSearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Payout>,
}

/// Client for the ledger service.
#[derive(Clone, Debug)]
pub struct LedgerClient {
    client: ServiceClient,
}

impl LedgerClient {
    pub fn new(base_url: impl Into<String>, hooks: Hooks) -> Self {
        Self::from_client(ServiceClient::new("ledger").configure(base_url, hooks))
    }

    /// Wraps an already configured client, e.g. one with custom options.
    pub fn from_client(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Creates a client targeting `LEDGER_URL`, or [`DEFAULT_LEDGER_URL`]
    /// when the variable is unset or empty.
    pub fn from_env(hooks: Hooks) -> Self {
        let base_url = std::env::var("LEDGER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LEDGER_URL.to_owned());
        Self::new(base_url, hooks)
    }

    /// Origin the ledger calls go to.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetches one transaction belonging to a gateway account.
    pub async fn transaction(
        &self,
        transaction_id: &str,
        gateway_account_id: &str,
    ) -> Result<LedgerTransaction> {
        let options = RequestOptions::new()
            .query("account_id", gateway_account_id)
            .description("get transaction details");
        self.client
            .request(
                reqwest::Method::GET,
                &format!("/v1/transaction/{transaction_id}"),
                options,
            )
            .await?
            .json()
    }

    /// Lists paid-out payouts across the given gateway accounts.
    pub async fn payouts(
        &self,
        gateway_account_ids: &[String],
        page: u32,
    ) -> Result<PayoutSearchResponse> {
        let options = RequestOptions::new()
            .query("gateway_account_id", gateway_account_ids.join(","))
            .query("state", "paidout")
            .query("page", page.max(1).to_string())
            .query("display_size", PAYOUTS_PAGE_SIZE.to_string())
            .description("list payments to bank accounts");
        self.client
            .request(reqwest::Method::GET, "/v1/payout", options)
            .await?
            .json()
    }
}
