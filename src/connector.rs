use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::{Hooks, RequestOptions, Result, ServiceClient};

/// Lifecycle state of a gateway account credential.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialState {
    Created,
    Entered,
    VerifiedWithLivePayment,
    Active,
    Retired,
    #[serde(other)]
    Unknown,
}

/// Payment service provider credential attached to a gateway account.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GatewayAccountCredential {
    pub external_id: String,
    pub payment_provider: String,
    pub state: CredentialState,
    #[serde(default)]
    pub credentials: JsonValue,
    #[serde(default)]
    pub gateway_account_credential_id: Option<u64>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub active_start_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GatewayAccount {
    pub gateway_account_id: u64,
    #[serde(default)]
    pub external_id: Option<String>,
    pub payment_provider: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub allow_google_pay: bool,
    #[serde(default)]
    pub integration_version_3ds: Option<u8>,
    #[serde(default)]
    pub gateway_account_credentials: Vec<GatewayAccountCredential>,
}

/// Single JSON-patch style operation accepted by connector.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AccountPatch {
    pub op: String,
    pub path: String,
    pub value: JsonValue,
}

impl AccountPatch {
    pub fn replace(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            op: "replace".to_owned(),
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn add(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            op: "add".to_owned(),
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Provider credentials submitted by a merchant.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CredentialsUpdate {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha_in_passphrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha_out_passphrase: Option<String>,
}

#[derive(Serialize)]
struct CredentialsPatch<'a> {
    credentials: &'a CredentialsUpdate,
}

/// Client for the connector service.
///
/// Every call forwards the caller's correlation id so connector logs can be
/// joined with the portal's.
#[derive(Clone, Debug)]
pub struct ConnectorClient {
    client: ServiceClient,
}

impl ConnectorClient {
    pub fn new(base_url: impl Into<String>, hooks: Hooks) -> Self {
        Self::from_client(ServiceClient::new("connector").configure(base_url, hooks))
    }

    pub fn from_client(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Creates a client targeting `CONNECTOR_URL`.
    ///
    /// Returns an error if the variable is missing or empty.
    pub fn from_env(hooks: Hooks) -> std::result::Result<Self, String> {
        let url = std::env::var("CONNECTOR_URL")
            .map_err(|_| "missing CONNECTOR_URL environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("CONNECTOR_URL is set but empty".to_owned());
        }
        Ok(Self::new(url, hooks))
    }

    pub async fn get_account(
        &self,
        gateway_account_id: u64,
        correlation_id: &str,
    ) -> Result<GatewayAccount> {
        let options = options(correlation_id, "get an account");
        self.client
            .request(
                reqwest::Method::GET,
                &format!("/v1/frontend/accounts/{gateway_account_id}"),
                options,
            )
            .await?
            .json()
    }

    pub async fn patch_account(
        &self,
        gateway_account_id: u64,
        patch: &AccountPatch,
        correlation_id: &str,
    ) -> Result<()> {
        let options = self
            .client
            .with_body(options(correlation_id, "patch gateway account"), patch)?;
        self.client
            .request(
                reqwest::Method::PATCH,
                &format!("/v1/api/accounts/{gateway_account_id}"),
                options,
            )
            .await?;
        Ok(())
    }

    /// Switches the account between 3DS (version 1) and 3DS Flex (version 2).
    pub async fn update_integration_version_3ds(
        &self,
        gateway_account_id: u64,
        integration_version_3ds: u8,
        correlation_id: &str,
    ) -> Result<()> {
        let patch = AccountPatch::replace("integration_version_3ds", integration_version_3ds);
        self.patch_account(gateway_account_id, &patch, correlation_id)
            .await
    }

    pub async fn patch_account_credentials(
        &self,
        gateway_account_id: u64,
        credentials: &CredentialsUpdate,
        correlation_id: &str,
    ) -> Result<GatewayAccount> {
        let options = self.client.with_body(
            options(correlation_id, "patch account credentials"),
            &CredentialsPatch { credentials },
        )?;
        self.client
            .request(
                reqwest::Method::PATCH,
                &format!("/v1/frontend/accounts/{gateway_account_id}/credentials"),
                options,
            )
            .await?
            .json()
    }

    pub async fn post_account_notification_credentials(
        &self,
        gateway_account_id: u64,
        username: &str,
        password: &str,
        correlation_id: &str,
    ) -> Result<()> {
        let options = options(correlation_id, "post account notification credentials")
            .body(json!({ "username": username, "password": password }));
        self.client
            .request(
                reqwest::Method::POST,
                &format!("/v1/api/accounts/{gateway_account_id}/notification-credentials"),
                options,
            )
            .await?;
        Ok(())
    }
}

fn options(correlation_id: &str, description: &str) -> RequestOptions {
    let options = RequestOptions::new().description(description);
    if correlation_id.is_empty() {
        options
    } else {
        options.correlation_id(correlation_id)
    }
}
