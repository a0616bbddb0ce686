use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    error::Error,
    helpers::VolumeInterval,
    types::{
        DashboardResponse, ExecutionDetails, ExecutionsResponse,
        PortfolioSnapshotsResponse, SwapType, TopWalletsResponse,
        VolumeOverTimeResponse,
    },
};

/// Raw `data` payloads of the swap feed, one item per server-sent event.
pub type SwapEventStream = BoxStream<'static, Result<String, Error>>;

/// The tracking backend. Every call is a single attempt: no retries and no
/// caching, callers decide how to react to failure.
#[async_trait]
pub trait TrackingApi: Send + Sync {
    async fn executions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ExecutionsResponse, Error>;

    async fn execution_details(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionDetails, Error>;

    async fn portfolio_snapshots(
        &self,
        execution_id: &str,
        wallet_address: &str,
    ) -> Result<PortfolioSnapshotsResponse, Error>;

    async fn dashboard(
        &self,
        swap_type: Option<SwapType>,
        limit: u32,
    ) -> Result<DashboardResponse, Error>;

    async fn volume_over_time(
        &self,
        interval: VolumeInterval,
        swap_type: Option<SwapType>,
    ) -> Result<VolumeOverTimeResponse, Error>;

    async fn top_wallets(
        &self,
        swap_type: Option<SwapType>,
    ) -> Result<TopWalletsResponse, Error>;

    /// Opens a fresh connection to the swap feed.
    async fn open_swap_stream(&self) -> Result<SwapEventStream, Error>;
}
