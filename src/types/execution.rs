//! Bot execution types
//!
//! Response shapes of the `/bot/executions` and `/bot/execution/{id}`
//! endpoints. Monetary fields arrive as JSON numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

use crate::helpers::{deserialize_optional_timestamp, deserialize_timestamp};

// =============================================================================
// Status Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<ExecutionStatus, Self::Err> {
        match value {
            "running" => Ok(ExecutionStatus::Running),
            "completed" => Ok(ExecutionStatus::Completed),
            "failed" => Ok(ExecutionStatus::Failed),
            _ => Err(io::Error::other("Execution status not supported")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalletStatus::Pending => write!(f, "pending"),
            WalletStatus::Running => write!(f, "running"),
            WalletStatus::Completed => write!(f, "completed"),
            WalletStatus::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// Execution Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotExecution {
    pub id: i64,
    pub execution_id: String,
    pub strategy_name: String,
    pub total_wallets: u32,
    pub completed_wallets: u32,
    pub failed_wallets: u32,
    pub total_volume_usd: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletExecution {
    pub id: i64,
    pub execution_id: String,
    pub wallet_index: u32,
    pub wallet_address: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    pub swaps_completed: u32,
    #[serde(default)]
    pub total_volume_usd: f64,
    pub status: WalletStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionsResponse {
    pub executions: Vec<BotExecution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDetails {
    pub execution: BotExecution,
    pub wallets: Vec<WalletExecution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_details_parsing() {
        let body = r#"{
            "execution": {
                "id": 7,
                "execution_id": "5b0d2c1e-7a39-4a52-9a3c-1f1f0e9d8c11",
                "strategy_name": "volume-farming",
                "total_wallets": 2,
                "completed_wallets": 1,
                "failed_wallets": 1,
                "total_volume_usd": 15234.5,
                "start_time": "2025-03-14T09:26:53.120Z",
                "end_time": null,
                "status": "running"
            },
            "wallets": [
                {
                    "id": 70,
                    "execution_id": "5b0d2c1e-7a39-4a52-9a3c-1f1f0e9d8c11",
                    "wallet_index": 0,
                    "wallet_address": "0x1111111111111111111111111111111111111111",
                    "tokens": ["ETH", "USDC"],
                    "swaps_completed": 12,
                    "total_volume_usd": 15234.5,
                    "status": "completed",
                    "error_message": null,
                    "start_time": "2025-03-14T09:26:53",
                    "end_time": "2025-03-14T10:00:00"
                },
                {
                    "id": 71,
                    "execution_id": "5b0d2c1e-7a39-4a52-9a3c-1f1f0e9d8c11",
                    "wallet_index": 1,
                    "wallet_address": "0x2222222222222222222222222222222222222222",
                    "tokens": [],
                    "swaps_completed": 0,
                    "total_volume_usd": 0,
                    "status": "failed",
                    "error_message": "insufficient gas",
                    "start_time": "2025-03-14T09:26:53",
                    "end_time": null
                }
            ]
        }"#;

        let details: ExecutionDetails = serde_json::from_str(body).unwrap();

        assert_eq!(details.execution.status, ExecutionStatus::Running);
        assert!(details.execution.end_time.is_none());
        assert_eq!(details.wallets.len(), 2);
        assert_eq!(details.wallets[0].status, WalletStatus::Completed);
        assert!(details.wallets[0].end_time.is_some());
        assert_eq!(
            details.wallets[1].error_message.as_deref(),
            Some("insufficient gas")
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let body = r#"{"executions": [{
            "id": 1,
            "execution_id": "x",
            "strategy_name": "s",
            "total_wallets": 0,
            "completed_wallets": 0,
            "failed_wallets": 0,
            "total_volume_usd": 0,
            "start_time": "2025-03-14T09:26:53Z",
            "status": "paused"
        }]}"#;

        assert!(serde_json::from_str::<ExecutionsResponse>(body).is_err());
        assert!("paused".parse::<ExecutionStatus>().is_err());
    }
}
