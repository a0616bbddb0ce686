use std::collections::HashMap;

use serde::Serialize;

use super::CapitalChange;
use crate::types::{BotExecution, PortfolioSnapshot, WalletExecution};

#[derive(Debug, Clone, Serialize)]
pub struct WalletOverview {
    pub wallet: WalletExecution,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub capital: CapitalChange,
}

/// Execution detail view: the execution, and each of its wallets with the
/// derived capital figures, in the backend's wallet order.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOverview {
    pub execution: BotExecution,
    pub wallets: Vec<WalletOverview>,
}

impl ExecutionOverview {
    pub fn new(
        execution: BotExecution,
        wallets: Vec<WalletExecution>,
        snapshots: &HashMap<String, Vec<PortfolioSnapshot>>,
    ) -> ExecutionOverview {
        let wallets = wallets
            .into_iter()
            .map(|wallet| {
                let snapshots = snapshots
                    .get(&wallet.wallet_address)
                    .cloned()
                    .unwrap_or_default();
                let capital = CapitalChange::from_snapshots(&snapshots);
                WalletOverview {
                    wallet,
                    snapshots,
                    capital,
                }
            })
            .collect();

        ExecutionOverview { execution, wallets }
    }
}
