use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::{deserialize_decimal, deserialize_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub id: i64,
    pub execution_id: String,
    pub wallet_address: String,
    pub total_capital_usd: f64,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub eth_balance: BigDecimal,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub usdc_balance: BigDecimal,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub wbtc_balance: BigDecimal,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub lbtc_balance: BigDecimal,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshotsResponse {
    pub snapshots: Vec<PortfolioSnapshot>,
}
