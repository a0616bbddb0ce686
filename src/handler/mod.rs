pub use self::{
    executions::{
        load_execution_overview, load_executions, EXECUTIONS_ERROR,
        EXECUTION_DETAILS_ERROR,
    },
    live_volume::{
        Action, Ingest, LiveVolume, Phase, ViewMode, VolumeView,
        SWAP_DATA_ERROR, TOP_WALLETS_ERROR,
    },
    snapshots::collect_snapshots,
    volume_monitor::{Command, VolumeMonitor},
};

pub mod executions;
pub mod live_volume;
pub mod snapshots;
pub mod volume_monitor;
