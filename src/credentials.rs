//! Selection of the credential an account takes payments with, and of the
//! one it is being switched to when the merchant changes provider.

use crate::connector::{CredentialState, GatewayAccount, GatewayAccountCredential};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The account's credentials do not identify a single target.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("credential {0} not found on gateway account")]
    NotFound(String),
}

/// The account's first `ACTIVE` credential, if any.
pub fn current_credential(account: &GatewayAccount) -> Option<&GatewayAccountCredential> {
    account
        .gateway_account_credentials
        .iter()
        .find(|credential| credential.state == CredentialState::Active)
}

/// The single pending credential an account with an active one is switching to.
pub fn switching_credential(
    account: &GatewayAccount,
) -> Result<&GatewayAccountCredential, CredentialError> {
    if current_credential(account).is_none() {
        return Err(CredentialError::InvalidConfiguration(
            "No active credential on this account to switch from".to_owned(),
        ));
    }

    let mut pending = account.gateway_account_credentials.iter().filter(|credential| {
        matches!(
            credential.state,
            CredentialState::Created
                | CredentialState::Entered
                | CredentialState::VerifiedWithLivePayment
        )
    });

    match (pending.next(), pending.next()) {
        (Some(credential), None) => Ok(credential),
        _ => Err(CredentialError::InvalidConfiguration(
            "Unable to determine which credentials are being switched to".to_owned(),
        )),
    }
}

pub fn credential_by_external_id<'a>(
    account: &'a GatewayAccount,
    external_id: &str,
) -> Result<&'a GatewayAccountCredential, CredentialError> {
    account
        .gateway_account_credentials
        .iter()
        .find(|credential| credential.external_id == external_id)
        .ok_or_else(|| CredentialError::NotFound(external_id.to_owned()))
}
