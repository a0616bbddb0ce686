pub use self::{
    execution::{
        BotExecution, ExecutionDetails, ExecutionStatus, ExecutionsResponse,
        WalletExecution, WalletStatus,
    },
    portfolio::{PortfolioSnapshot, PortfolioSnapshotsResponse},
    swap::{
        AggregateStatistics, DashboardResponse, Pagination, Swap, SwapFilter,
        SwapType, TopWallet, TopWalletsResponse, VolumeBucket,
        VolumeOverTimeResponse,
    },
};

mod execution;
mod portfolio;
mod swap;
