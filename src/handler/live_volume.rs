use std::collections::VecDeque;

use tracing::{debug, error, warn};

use crate::{
    error::Error,
    types::{
        AggregateStatistics, DashboardResponse, Swap, SwapFilter, SwapType,
        TopWallet, TopWalletsResponse,
    },
};

pub const SWAP_DATA_ERROR: &str = "Failed to fetch swap data";
pub const TOP_WALLETS_ERROR: &str = "Failed to fetch top wallets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Swaps,
    TopWallets,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Fetch a transition asks the driver to perform, tagged with the
/// generation its outcome must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    FetchDashboard { generation: u64, filter: SwapFilter },
    FetchTopWallets { generation: u64 },
}

/// Outcome of one stream message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Admitted,
    Filtered,
    Rejected,
    Stale,
}

/// Snapshot of everything the volume view displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolumeView {
    pub filter: SwapFilter,
    pub mode: ViewMode,
    pub phase: Phase,
    pub generation: u64,
    pub swaps: Vec<Swap>,
    pub statistics: AggregateStatistics,
    pub top_wallets: Vec<TopWallet>,
    pub streaming: bool,
}

/// State machine behind the live volume view. Owns the one statistics
/// record and the event log; every filter or mode change starts a new
/// generation and anything tagged with an older one is dropped.
#[derive(Debug, Clone)]
pub struct LiveVolume {
    filter: SwapFilter,
    mode: ViewMode,
    phase: Phase,
    generation: u64,
    swaps: VecDeque<Swap>,
    statistics: AggregateStatistics,
    top_wallets: Vec<TopWallet>,
    stream_swap_types: Vec<SwapType>,
    capacity: Option<usize>,
}

impl LiveVolume {
    pub fn new(
        stream_swap_types: Vec<SwapType>,
        capacity: Option<usize>,
    ) -> LiveVolume {
        LiveVolume {
            filter: SwapFilter::default(),
            mode: ViewMode::default(),
            phase: Phase::default(),
            generation: 0,
            swaps: VecDeque::new(),
            statistics: AggregateStatistics::default(),
            top_wallets: vec![],
            stream_swap_types,
            capacity,
        }
    }

    pub fn filter(&self) -> SwapFilter {
        self.filter
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn statistics(&self) -> &AggregateStatistics {
        &self.statistics
    }

    pub fn swaps(&self) -> impl Iterator<Item = &Swap> {
        self.swaps.iter()
    }

    pub fn select_filter(&mut self, filter: SwapFilter) -> Action {
        if self.mode == ViewMode::Swaps
            && self.filter == filter
            && self.phase != Phase::Idle
        {
            return Action::None;
        }

        self.mode = ViewMode::Swaps;
        self.filter = filter;
        self.generation += 1;
        self.swaps.clear();
        self.statistics = AggregateStatistics::default();
        self.phase = Phase::Loading;

        Action::FetchDashboard {
            generation: self.generation,
            filter,
        }
    }

    pub fn show_top_wallets(&mut self) -> Action {
        if self.mode == ViewMode::TopWallets {
            return Action::None;
        }

        self.mode = ViewMode::TopWallets;
        self.filter = SwapFilter::All;
        self.generation += 1;
        self.top_wallets.clear();
        self.phase = Phase::Loading;

        Action::FetchTopWallets {
            generation: self.generation,
        }
    }

    /// Applies a dashboard fetch outcome. Returns `false` when it belonged
    /// to an older generation and was dropped.
    pub fn apply_dashboard(
        &mut self,
        generation: u64,
        result: Result<DashboardResponse, Error>,
    ) -> bool {
        if !self.is_current(generation, ViewMode::Swaps) {
            debug!(generation, current = self.generation, "stale dashboard response dropped");
            return false;
        }

        match result {
            Ok(response) => {
                let mut statistics = response.statistics;
                if !statistics.reconcile_totals() {
                    warn!(
                        filter = %self.filter,
                        "dashboard totals disagree with the per-type buckets, totals re-derived"
                    );
                }

                self.swaps = response.swaps.into();
                self.statistics = statistics;
                self.truncate();
                self.phase = Phase::Ready;
            },
            Err(e) => {
                error!("{}: {}", SWAP_DATA_ERROR, e);
                self.phase = Phase::Error(String::from(SWAP_DATA_ERROR));
            },
        }

        true
    }

    pub fn apply_top_wallets(
        &mut self,
        generation: u64,
        result: Result<TopWalletsResponse, Error>,
    ) -> bool {
        if !self.is_current(generation, ViewMode::TopWallets) {
            debug!(generation, current = self.generation, "stale top wallets response dropped");
            return false;
        }

        match result {
            Ok(response) => {
                self.top_wallets = response.wallets;
                self.phase = Phase::Ready;
            },
            Err(e) => {
                error!("{}: {}", TOP_WALLETS_ERROR, e);
                self.phase = Phase::Error(String::from(TOP_WALLETS_ERROR));
            },
        }

        true
    }

    /// Whether the current state wants a live feed connection.
    pub fn wants_stream(&self) -> bool {
        self.mode == ViewMode::Swaps
            && self.phase == Phase::Ready
            && self
                .stream_swap_types
                .iter()
                .any(|swap_type| self.filter.admits(*swap_type))
    }

    /// Folds one raw stream payload into the log and the statistics.
    pub fn ingest(&mut self, generation: u64, payload: &str) -> Ingest {
        if !self.is_current(generation, ViewMode::Swaps)
            || self.phase != Phase::Ready
        {
            debug!(generation, current = self.generation, "stale swap event dropped");
            return Ingest::Stale;
        }

        let swap = match serde_json::from_str::<Swap>(payload) {
            Ok(swap) => swap,
            Err(e) => {
                warn!("{}", Error::ParseMessage(format!("swap event: {}", e)));
                return Ingest::Rejected;
            },
        };

        if !self.filter.admits(swap.swap_type) {
            return Ingest::Filtered;
        }

        self.statistics.record(&swap);
        self.swaps.push_front(swap);
        self.truncate();

        Ingest::Admitted
    }

    pub fn view(&self, streaming: bool) -> VolumeView {
        VolumeView {
            filter: self.filter,
            mode: self.mode,
            phase: self.phase.clone(),
            generation: self.generation,
            swaps: self.swaps.iter().cloned().collect(),
            statistics: self.statistics.clone(),
            top_wallets: self.top_wallets.clone(),
            streaming,
        }
    }

    fn is_current(&self, generation: u64, mode: ViewMode) -> bool {
        generation == self.generation && self.mode == mode
    }

    fn truncate(&mut self) {
        if let Some(capacity) = self.capacity {
            self.swaps.truncate(capacity);
        }
    }
}
