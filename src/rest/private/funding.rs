//! Deposits, withdrawals and wallet transfers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::private;
use crate::rest::request::FormParams;
use crate::rest::response::KrakenResponse;
use crate::types::serde_helpers::{decimal_or_false, empty_as_none};

/// Parameters for `DepositMethods`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct DepositMethodsRequest {
    pub asset: String,
    /// Asset class (default: `currency`).
    pub aclass: Option<String>,
}

impl DepositMethodsRequest {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            aclass: None,
        }
    }
}

/// A way to fund an asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DepositMethod {
    pub method: String,
    /// `None` when Kraken reports no limit.
    #[serde(deserialize_with = "decimal_or_false::deserialize", default)]
    pub limit: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub address_setup_fee: Option<Decimal>,
    #[serde(default)]
    pub gen_address: Option<bool>,
    #[serde(default)]
    pub minimum: Option<Decimal>,
}

/// Parameters for `DepositAddresses`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct DepositAddressesRequest {
    pub asset: String,
    pub method: String,
    /// Generate a fresh address.
    #[serde(rename = "new")]
    pub new_address: Option<bool>,
    /// Invoice amount (Lightning only).
    pub amount: Option<Decimal>,
}

impl DepositAddressesRequest {
    pub fn new(asset: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            method: method.into(),
            new_address: None,
            amount: None,
        }
    }

    pub fn generate(mut self) -> Self {
        self.new_address = Some(true);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositAddress {
    pub address: String,
    /// Unix time the address expires, `"0"` if it does not.
    pub expiretm: String,
    #[serde(default)]
    pub new: Option<bool>,
    #[serde(deserialize_with = "empty_as_none::deserialize", default)]
    pub memo: Option<String>,
    #[serde(deserialize_with = "empty_as_none::deserialize", default)]
    pub tag: Option<String>,
}

/// Filter for `DepositStatus` and `WithdrawStatus`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferStatusRequest {
    pub asset: Option<String>,
    pub aclass: Option<String>,
    pub method: Option<String>,
    /// Unix time, inclusive.
    pub start: Option<String>,
    /// Unix time, inclusive.
    pub end: Option<String>,
}

impl TransferStatusRequest {
    pub fn asset(asset: impl Into<String>) -> Self {
        Self {
            asset: Some(asset.into()),
            ..Self::default()
        }
    }
}

/// Lifecycle state of a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TransferState {
    #[serde(alias = "initial")]
    Initial,
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "settled")]
    Settled,
    #[serde(alias = "success")]
    Success,
    #[serde(alias = "failure")]
    Failure,
    #[serde(other)]
    Unknown,
}

/// Additional state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusProp {
    CancelPending,
    Canceled,
    CancelDenied,
    Return,
    #[serde(rename = "onhold")]
    OnHold,
}

/// One deposit or withdrawal.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    pub method: String,
    pub aclass: String,
    pub asset: String,
    pub refid: String,
    pub txid: String,
    pub info: String,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Option<Decimal>,
    pub time: i64,
    pub status: TransferState,
    #[serde(rename = "status-prop", default)]
    pub status_prop: Option<StatusProp>,
}

/// Parameters for `WithdrawInfo`.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawInfoRequest {
    pub asset: String,
    /// Name of the withdrawal key set up on the account.
    pub key: String,
    pub amount: Decimal,
}

impl WithdrawInfoRequest {
    pub fn new(asset: impl Into<String>, key: impl Into<String>, amount: Decimal) -> Self {
        Self {
            asset: asset.into(),
            key: key.into(),
            amount,
        }
    }
}

/// Fee and limit quote for a withdrawal.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawInfo {
    pub method: String,
    #[serde(deserialize_with = "decimal_or_false::deserialize", default)]
    pub limit: Option<Decimal>,
    pub amount: Decimal,
    pub fee: Decimal,
}

/// Parameters for `Withdraw`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawRequest {
    pub asset: String,
    pub key: String,
    pub amount: Decimal,
    /// Must match one of the addresses behind `key`.
    pub address: Option<String>,
    /// Fail if the fee would exceed this.
    pub max_fee: Option<Decimal>,
}

impl WithdrawRequest {
    pub fn new(asset: impl Into<String>, key: impl Into<String>, amount: Decimal) -> Self {
        Self {
            asset: asset.into(),
            key: key.into(),
            amount,
            address: None,
            max_fee: None,
        }
    }

    pub fn max_fee(mut self, max_fee: Decimal) -> Self {
        self.max_fee = Some(max_fee);
        self
    }
}

/// Reference id returned by `Withdraw` and `WalletTransfer`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceId {
    pub refid: String,
}

/// Parameters for `WithdrawCancel`.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawCancelRequest {
    pub asset: String,
    pub refid: String,
}

impl WithdrawCancelRequest {
    pub fn new(asset: impl Into<String>, refid: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            refid: refid.into(),
        }
    }
}

/// Parameters for `WalletTransfer`.
#[derive(Debug, Clone, Serialize)]
pub struct WalletTransferRequest {
    pub asset: String,
    /// Source wallet, e.g. `Spot Wallet`.
    pub from: String,
    /// Destination wallet, e.g. `Futures Wallet`.
    pub to: String,
    pub amount: Decimal,
}

impl WalletTransferRequest {
    /// Spot to futures wallet.
    pub fn to_futures(asset: impl Into<String>, amount: Decimal) -> Self {
        Self {
            asset: asset.into(),
            from: "Spot Wallet".into(),
            to: "Futures Wallet".into(),
            amount,
        }
    }
}

impl SpotRestClient {
    /// List funding methods for an asset.
    pub async fn get_deposit_methods(
        &self,
        ctx: &RequestContext,
        request: &DepositMethodsRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Vec<DepositMethod>>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::DEPOSIT_METHODS, params, security)
            .await
    }

    /// List (or generate) deposit addresses.
    pub async fn get_deposit_addresses(
        &self,
        ctx: &RequestContext,
        request: &DepositAddressesRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Vec<DepositAddress>>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::DEPOSIT_ADDRESSES, params, security)
            .await
    }

    /// Recent deposits.
    pub async fn get_deposit_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Vec<Transfer>>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::DEPOSIT_STATUS, params, security)
            .await
    }

    /// Quote the fee and limit for a withdrawal.
    pub async fn get_withdraw_info(
        &self,
        ctx: &RequestContext,
        request: &WithdrawInfoRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<WithdrawInfo>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::WITHDRAW_INFO, params, security).await
    }

    /// Withdraw funds to a configured key.
    pub async fn withdraw(
        &self,
        ctx: &RequestContext,
        request: &WithdrawRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<ReferenceId>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::WITHDRAW, params, security).await
    }

    /// Recent withdrawals.
    pub async fn get_withdraw_status(
        &self,
        ctx: &RequestContext,
        request: Option<&TransferStatusRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Vec<Transfer>>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::WITHDRAW_STATUS, params, security)
            .await
    }

    /// Request cancellation of a pending withdrawal.
    pub async fn cancel_withdrawal(
        &self,
        ctx: &RequestContext,
        request: &WithdrawCancelRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<bool>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::WITHDRAW_CANCEL, params, security)
            .await
    }

    /// Move funds between wallets.
    pub async fn wallet_transfer(
        &self,
        ctx: &RequestContext,
        request: &WalletTransferRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<ReferenceId>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::WALLET_TRANSFER, params, security)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_method_without_limit() {
        let json = r#"{"method":"Bitcoin","limit":false,"fee":"0.0000000000","gen-address":true,"minimum":"0.00010000"}"#;
        let method: DepositMethod = serde_json::from_str(json).unwrap();
        assert!(method.limit.is_none());
        assert_eq!(method.gen_address, Some(true));
    }

    #[test]
    fn test_deposit_address_blank_tag() {
        let json = r#"{"address":"2N9fRkx5JTWXWHmXzZtvhQsufvoYRMq9ExV","expiretm":"0","new":true,"tag":""}"#;
        let address: DepositAddress = serde_json::from_str(json).unwrap();
        assert!(address.tag.is_none());
        assert!(address.memo.is_none());
    }

    #[test]
    fn test_transfer_record() {
        let json = r#"{
            "method":"Bitcoin","aclass":"currency","asset":"XXBT",
            "refid":"FTQcuak-V6Za8qrWnhzTx67yYHz8Tg","txid":"6544b41b607d8b2512baf801755a3a87b6890eacdb451be8a94059fb11f0a8d9",
            "info":"2Myd4eaAW96ojk38A2uDK4FbioCayvkEgVq","amount":"0.78125000","fee":"0.0000000000",
            "time":1688992722,"status":"Success","status-prop":"return"
        }"#;
        let transfer: Transfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer.status, TransferState::Success);
        assert_eq!(transfer.status_prop, Some(StatusProp::Return));
        assert_eq!(transfer.amount.to_string(), "0.78125000");
    }

    #[test]
    fn test_wallet_transfer_params() {
        let request = WalletTransferRequest::to_futures("XBT", Decimal::new(5, 1));
        assert_eq!(
            FormParams::encode(&request).unwrap().as_str(),
            "asset=XBT&from=Spot+Wallet&to=Futures+Wallet&amount=0.5"
        );
    }
}
