//! Swap dashboard types
//!
//! Response shapes of the `/sushiswap/*` endpoints and the live swap feed.
//! Monetary fields arrive as decimal strings or JSON numbers and are kept as
//! `BigDecimal`.

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

use crate::helpers::{
    deserialize_decimal, deserialize_optional_decimal, deserialize_timestamp,
};

// =============================================================================
// Swap Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapType {
    #[serde(rename = "CLASSIC")]
    Classic,
    #[serde(rename = "LIMIT_ORDER")]
    LimitOrder,
}

impl SwapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapType::Classic => "CLASSIC",
            SwapType::LimitOrder => "LIMIT_ORDER",
        }
    }
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwapType {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<SwapType, Self::Err> {
        match value.to_lowercase().as_str() {
            "classic" | "plain" => Ok(SwapType::Classic),
            "limit_order" | "limit-order" | "limit" => {
                Ok(SwapType::LimitOrder)
            },
            _ => Err(io::Error::other("Swap type not supported")),
        }
    }
}

// =============================================================================
// Swap Filter
// =============================================================================

/// Type filter of the swap view. `All` is the unscoped dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapFilter {
    #[default]
    All,
    Classic,
    LimitOrder,
}

impl SwapFilter {
    /// Value of the `swap_type` query parameter, `None` when unscoped.
    pub fn swap_type(&self) -> Option<SwapType> {
        match self {
            SwapFilter::All => None,
            SwapFilter::Classic => Some(SwapType::Classic),
            SwapFilter::LimitOrder => Some(SwapType::LimitOrder),
        }
    }

    pub fn admits(&self, swap_type: SwapType) -> bool {
        match self.swap_type() {
            None => true,
            Some(t) => t == swap_type,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapFilter::All => "all",
            SwapFilter::Classic => "classic",
            SwapFilter::LimitOrder => "limit-order",
        }
    }
}

impl From<Option<SwapType>> for SwapFilter {
    fn from(value: Option<SwapType>) -> Self {
        match value {
            None => SwapFilter::All,
            Some(SwapType::Classic) => SwapFilter::Classic,
            Some(SwapType::LimitOrder) => SwapFilter::LimitOrder,
        }
    }
}

impl fmt::Display for SwapFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwapFilter {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<SwapFilter, Self::Err> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(SwapFilter::All);
        }

        value.parse::<SwapType>().map(|t| SwapFilter::from(Some(t)))
    }
}

// =============================================================================
// Swap Record
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    pub id: i64,
    pub wallet_address: String,
    pub swap_type: SwapType,
    #[serde(default)]
    pub token_from_address: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub token_from_amount: BigDecimal,
    pub token_from_symbol: String,
    #[serde(default)]
    pub token_from_logo: Option<String>,
    #[serde(default)]
    pub token_to_address: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub token_to_amount: BigDecimal,
    pub token_to_symbol: String,
    #[serde(default)]
    pub token_to_logo: Option<String>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub usd_volume: BigDecimal,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub filled_src_amount: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub filled_dst_amount: Option<BigDecimal>,
    #[serde(default)]
    pub is_partial_fill: bool,
}

// =============================================================================
// Aggregate Statistics
// =============================================================================

/// Running totals over a swap collection. `total_*` always equals the sum of
/// the classic and limit-order buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub total_swaps: u64,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub total_volume_usd: BigDecimal,
    pub classic_swaps: u64,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub classic_volume_usd: BigDecimal,
    pub limit_order_swaps: u64,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub limit_order_volume_usd: BigDecimal,
    #[serde(default)]
    pub unique_wallets: u64,
}

impl Default for AggregateStatistics {
    fn default() -> Self {
        Self {
            total_swaps: 0,
            total_volume_usd: BigDecimal::zero(),
            classic_swaps: 0,
            classic_volume_usd: BigDecimal::zero(),
            limit_order_swaps: 0,
            limit_order_volume_usd: BigDecimal::zero(),
            unique_wallets: 0,
        }
    }
}

impl AggregateStatistics {
    /// Folds one observed swap into the totals and exactly one bucket.
    pub fn record(&mut self, swap: &Swap) {
        self.total_swaps += 1;
        self.total_volume_usd += &swap.usd_volume;

        match swap.swap_type {
            SwapType::Classic => {
                self.classic_swaps += 1;
                self.classic_volume_usd += &swap.usd_volume;
            },
            SwapType::LimitOrder => {
                self.limit_order_swaps += 1;
                self.limit_order_volume_usd += &swap.usd_volume;
            },
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_swaps == self.classic_swaps + self.limit_order_swaps
            && self.total_volume_usd
                == &self.classic_volume_usd + &self.limit_order_volume_usd
    }

    /// Re-derives the totals from the buckets. Returns `false` when the
    /// totals had to be corrected.
    pub fn reconcile_totals(&mut self) -> bool {
        if self.is_consistent() {
            return true;
        }

        self.total_swaps = self.classic_swaps + self.limit_order_swaps;
        self.total_volume_usd =
            &self.classic_volume_usd + &self.limit_order_volume_usd;

        false
    }
}

// =============================================================================
// Dashboard Responses
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub returned: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub swaps: Vec<Swap>,
    pub statistics: AggregateStatistics,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeBucket {
    pub period: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub volume: BigDecimal,
    pub swap_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeOverTimeResponse {
    pub interval: String,
    pub data: Vec<VolumeBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopWallet {
    pub wallet_address: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub total_volume: BigDecimal,
    pub swap_count: u64,
    pub classic_count: u64,
    pub limit_order_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopWalletsResponse {
    pub wallets: Vec<TopWallet>,
}
