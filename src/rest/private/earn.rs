//! Earn: staking and other yield strategies.
//!
//! Allocation and deallocation are asynchronous on Kraken's side. The
//! `allocate`/`deallocate` calls only queue the operation; poll the matching
//! status endpoint until `pending` turns false.

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

/// Parameters for `Earn/Allocate` and `Earn/Deallocate`.
#[derive(Debug, Clone, Serialize)]
pub struct EarnAllocateRequest {
    pub amount: Decimal,
    pub strategy_id: String,
}

impl EarnAllocateRequest {
    pub fn new(amount: Decimal, strategy_id: impl Into<String>) -> Self {
        Self {
            amount,
            strategy_id: strategy_id.into(),
        }
    }
}

/// Parameters for the allocation status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct EarnStatusRequest {
    pub strategy_id: String,
}

impl EarnStatusRequest {
    pub fn new(strategy_id: impl Into<String>) -> Self {
        Self {
            strategy_id: strategy_id.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationStatus {
    /// Still being processed.
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockType {
    Flex,
    Bonded,
    Timed,
    Instant,
}

/// Parameters for `Earn/Strategies`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EarnStrategiesRequest {
    pub ascending: Option<bool>,
    pub asset: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u16>,
    pub lock_type: Option<LockType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AprEstimate {
    pub low: Decimal,
    pub high: Decimal,
}

/// How a strategy locks funds.
#[derive(Debug, Clone, Deserialize)]
pub struct LockTypeDetail {
    #[serde(rename = "type")]
    pub kind: LockType,
    #[serde(default)]
    pub payout_frequency: Option<i64>,
    #[serde(default)]
    pub bonding_period: Option<i64>,
    #[serde(default)]
    pub bonding_rewards: Option<bool>,
    #[serde(default)]
    pub exit_queue_period: Option<i64>,
    #[serde(default)]
    pub unbonding_period: Option<i64>,
    #[serde(default)]
    pub unbonding_rewards: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YieldSource {
    /// `staking`, `off_chain` or `opt_in_rewards`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoCompound {
    /// `enabled`, `disabled` or `optional`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub default: Option<bool>,
}

/// One earn strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct EarnStrategy {
    pub id: String,
    pub asset: String,
    /// Sent as a string or a bare number depending on the strategy.
    pub allocation_fee: serde_json::Value,
    pub deallocation_fee: serde_json::Value,
    #[serde(default)]
    pub allocation_restriction_info: Vec<String>,
    #[serde(default)]
    pub apr_estimate: Option<AprEstimate>,
    pub auto_compound: AutoCompound,
    pub can_allocate: bool,
    pub can_deallocate: bool,
    pub lock_type: LockTypeDetail,
    #[serde(default)]
    pub user_cap: Option<Decimal>,
    #[serde(default)]
    pub user_min_allocation: Option<Decimal>,
    pub yield_source: YieldSource,
}

impl EarnStrategy {
    /// Allocation fee as a decimal, whichever way it was encoded.
    pub fn allocation_fee(&self) -> Option<Decimal> {
        fee_to_decimal(&self.allocation_fee)
    }

    pub fn deallocation_fee(&self) -> Option<Decimal> {
        fee_to_decimal(&self.deallocation_fee)
    }
}

fn fee_to_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// A page of strategies.
#[derive(Debug, Clone, Deserialize)]
pub struct EarnStrategies {
    pub items: Vec<EarnStrategy>,
    /// Pass back as `cursor` for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Parameters for `Earn/Allocations`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EarnAllocationsRequest {
    pub ascending: Option<bool>,
    /// Asset amounts are converted to (default `USD`).
    pub converted_asset: Option<String>,
    pub hide_zero_allocations: Option<bool>,
}

/// An amount expressed in the strategy asset and the converted asset.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EarnAmount {
    pub converted: Decimal,
    pub native: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AmountAllocated {
    pub total: EarnAmount,
    #[serde(default)]
    pub pending: Option<EarnAmount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EarnAllocation {
    pub strategy_id: String,
    pub native_asset: String,
    pub amount_allocated: AmountAllocated,
    pub total_rewarded: EarnAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EarnAllocations {
    pub converted_asset: String,
    pub items: Vec<EarnAllocation>,
    pub total_allocated: Decimal,
    pub total_rewarded: Decimal,
}

impl SpotRestClient {
    /// Queue an allocation into a strategy.
    pub async fn allocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<bool>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::EARN_ALLOCATE, params, security).await
    }

    /// Queue a deallocation from a strategy.
    pub async fn deallocate_earn_funds(
        &self,
        ctx: &RequestContext,
        request: &EarnAllocateRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<bool>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::EARN_DEALLOCATE, params, security)
            .await
    }

    pub async fn get_earn_allocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<AllocationStatus>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::EARN_ALLOCATE_STATUS, params, security)
            .await
    }

    pub async fn get_earn_deallocation_status(
        &self,
        ctx: &RequestContext,
        request: &EarnStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<AllocationStatus>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::EARN_DEALLOCATE_STATUS, params, security)
            .await
    }

    /// List available strategies.
    pub async fn list_earn_strategies(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnStrategiesRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<EarnStrategies>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::EARN_STRATEGIES, params, security)
            .await
    }

    /// List current allocations.
    pub async fn list_earn_allocations(
        &self,
        ctx: &RequestContext,
        request: Option<&EarnAllocationsRequest>,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<EarnAllocations>, KrakenError> {
        let params = FormParams::encode_opt(request)?;
        self.call(ctx, &private::EARN_ALLOCATIONS, params, security)
            .await
    }
}
