use std::collections::HashMap;

use futures::future::join_all;
use tracing::warn;

use crate::{
    error::Error,
    provider::TrackingApi,
    types::{PortfolioSnapshot, WalletExecution},
};

/// Fetches every wallet's snapshot series concurrently. A failed fetch only
/// empties that wallet's series; the result always holds one entry per
/// wallet address.
pub async fn collect_snapshots<C>(
    api: &C,
    execution_id: &str,
    wallets: &[WalletExecution],
) -> HashMap<String, Vec<PortfolioSnapshot>>
where
    C: TrackingApi + ?Sized,
{
    let joins = wallets.iter().map(|wallet| async move {
        let address = wallet.wallet_address.as_str();
        let snapshots =
            match api.portfolio_snapshots(execution_id, address).await {
                Ok(response) => response.snapshots,
                Err(e) => {
                    let partial = Error::PartialData(format!(
                        "snapshots for wallet {} of execution {}: {}",
                        address, execution_id, e
                    ));
                    warn!("{}", partial);
                    vec![]
                },
            };

        (address.to_owned(), snapshots)
    });

    join_all(joins).await.into_iter().collect()
}
