//! In-memory `TrackingApi` used by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    io,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{TimeZone, Utc};
use futures::{channel::mpsc, StreamExt};
use tokio::sync::Notify;

use super::api::{SwapEventStream, TrackingApi};
use crate::{
    error::Error,
    helpers::VolumeInterval,
    types::{
        AggregateStatistics, BotExecution, DashboardResponse,
        ExecutionDetails, ExecutionStatus, ExecutionsResponse, Pagination,
        PortfolioSnapshot, PortfolioSnapshotsResponse, Swap, SwapType,
        TopWallet, TopWalletsResponse, VolumeBucket, VolumeOverTimeResponse,
        WalletExecution, WalletStatus,
    },
};

fn not_found(path: &str) -> Error {
    Error::HttpStatus {
        status: 404,
        url: format!("mock://{}", path),
    }
}

#[derive(Default)]
pub struct MockApi {
    executions: Mutex<Option<ExecutionsResponse>>,
    details: Mutex<HashMap<String, ExecutionDetails>>,
    snapshots: Mutex<HashMap<String, Vec<PortfolioSnapshot>>>,
    failing_wallets: Mutex<HashSet<String>>,
    snapshot_delays: Mutex<HashMap<String, Duration>>,
    dashboards: Mutex<HashMap<Option<SwapType>, (DashboardResponse, Duration)>>,
    dashboard_calls: Mutex<Vec<Option<SwapType>>>,
    top_wallets: Mutex<Option<TopWalletsResponse>>,
    volume: Mutex<Option<VolumeOverTimeResponse>>,
    feeds: Mutex<Vec<FeedHandle>>,
    stream_opened: Notify,
    stream_opens: AtomicUsize,
    fail_stream_opens: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_executions(&self, executions: Vec<BotExecution>) {
        *self.executions.lock().unwrap() = Some(ExecutionsResponse { executions });
    }

    pub fn set_details(&self, details: ExecutionDetails) {
        self.details
            .lock()
            .unwrap()
            .insert(details.execution.execution_id.clone(), details);
    }

    pub fn set_snapshots(&self, wallet: &str, snapshots: Vec<PortfolioSnapshot>) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(wallet.to_owned(), snapshots);
    }

    pub fn fail_wallet(&self, wallet: &str) {
        self.failing_wallets.lock().unwrap().insert(wallet.to_owned());
    }

    pub fn delay_wallet(&self, wallet: &str, delay: Duration) {
        self.snapshot_delays
            .lock()
            .unwrap()
            .insert(wallet.to_owned(), delay);
    }

    pub fn set_dashboard(
        &self,
        swap_type: Option<SwapType>,
        response: DashboardResponse,
        delay: Duration,
    ) {
        self.dashboards
            .lock()
            .unwrap()
            .insert(swap_type, (response, delay));
    }

    pub fn dashboard_calls(&self) -> Vec<Option<SwapType>> {
        self.dashboard_calls.lock().unwrap().clone()
    }

    pub fn set_top_wallets(&self, wallets: Vec<TopWallet>) {
        *self.top_wallets.lock().unwrap() = Some(TopWalletsResponse { wallets });
    }

    pub fn set_volume(&self, response: VolumeOverTimeResponse) {
        *self.volume.lock().unwrap() = Some(response);
    }

    pub fn fail_stream_opens(&self, fail: bool) {
        self.fail_stream_opens.store(fail, Ordering::SeqCst);
    }

    pub fn stream_opens(&self) -> usize {
        self.stream_opens.load(Ordering::SeqCst)
    }

    pub fn feeds(&self) -> Vec<FeedHandle> {
        self.feeds.lock().unwrap().clone()
    }

    /// Waits until the `n`-th (1-based) feed connection has been opened.
    pub async fn wait_for_stream(&self, n: usize) -> FeedHandle {
        loop {
            let notified = self.stream_opened.notified();
            if let Some(feed) = self.feeds.lock().unwrap().get(n - 1).cloned() {
                return feed;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl TrackingApi for MockApi {
    async fn executions(
        &self,
        _limit: u32,
        _offset: u32,
    ) -> Result<ExecutionsResponse, Error> {
        self.executions
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| not_found("bot/executions"))
    }

    async fn execution_details(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionDetails, Error> {
        self.details
            .lock()
            .unwrap()
            .get(execution_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("bot/execution/{}", execution_id)))
    }

    async fn portfolio_snapshots(
        &self,
        execution_id: &str,
        wallet_address: &str,
    ) -> Result<PortfolioSnapshotsResponse, Error> {
        let delay = self
            .snapshot_delays
            .lock()
            .unwrap()
            .get(wallet_address)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_wallets.lock().unwrap().contains(wallet_address) {
            return Err(Error::HttpStatus {
                status: 500,
                url: format!("mock://bot/portfolio/{}/{}", execution_id, wallet_address),
            });
        }

        let snapshots = self
            .snapshots
            .lock()
            .unwrap()
            .get(wallet_address)
            .cloned()
            .unwrap_or_default();

        Ok(PortfolioSnapshotsResponse { snapshots })
    }

    async fn dashboard(
        &self,
        swap_type: Option<SwapType>,
        _limit: u32,
    ) -> Result<DashboardResponse, Error> {
        self.dashboard_calls.lock().unwrap().push(swap_type);

        let entry = self.dashboards.lock().unwrap().get(&swap_type).cloned();
        let (response, delay) = entry.ok_or_else(|| not_found("sushiswap/dashboard"))?;
        tokio::time::sleep(delay).await;

        Ok(response)
    }

    async fn volume_over_time(
        &self,
        _interval: VolumeInterval,
        _swap_type: Option<SwapType>,
    ) -> Result<VolumeOverTimeResponse, Error> {
        self.volume
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| not_found("sushiswap/dashboard/volume-over-time"))
    }

    async fn top_wallets(
        &self,
        _swap_type: Option<SwapType>,
    ) -> Result<TopWalletsResponse, Error> {
        self.top_wallets
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| not_found("sushiswap/top-wallets"))
    }

    async fn open_swap_stream(&self) -> Result<SwapEventStream, Error> {
        self.stream_opens.fetch_add(1, Ordering::SeqCst);

        if self.fail_stream_opens.load(Ordering::SeqCst) {
            return Err(Error::HttpStatus {
                status: 503,
                url: String::from("mock://sushiswap/stream"),
            });
        }

        let (sender, receiver) = mpsc::unbounded();
        let feed = FeedHandle {
            sender,
            state: Arc::new(FeedState::default()),
        };
        let guard = ReleaseGuard(feed.state.clone());

        self.feeds.lock().unwrap().push(feed);
        self.stream_opened.notify_waiters();

        let stream = receiver.map(move |item| {
            let _held = &guard;
            item
        });

        Ok(stream.boxed())
    }
}

#[derive(Default)]
pub struct FeedState {
    released: AtomicBool,
    notify: Notify,
}

struct ReleaseGuard(Arc<FeedState>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.released.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }
}

/// Server side of one mock feed connection.
#[derive(Clone)]
pub struct FeedHandle {
    sender: mpsc::UnboundedSender<Result<String, Error>>,
    state: Arc<FeedState>,
}

impl FeedHandle {
    pub fn send_raw(&self, data: &str) {
        let _ = self.sender.unbounded_send(Ok(data.to_owned()));
    }

    pub fn send_swap(&self, swap: &Swap) {
        let data = serde_json::to_string(swap).unwrap();
        self.send_raw(&data);
    }

    pub fn fail(&self, reason: &str) {
        let _ = self
            .sender
            .unbounded_send(Err(Error::Io(io::Error::other(reason.to_owned()))));
    }

    pub fn is_released(&self) -> bool {
        self.state.released.load(Ordering::SeqCst)
    }

    pub async fn wait_released(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_released() {
                return;
            }
            notified.await;
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn decimal(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn swap(id: i64, swap_type: SwapType, usd_volume: &str) -> Swap {
    Swap {
        id,
        wallet_address: format!("0x{:040x}", id),
        swap_type,
        token_from_address: String::from("0xc2132d05d31c914a87c6611c10748aeb04b58e8f"),
        token_from_amount: decimal("1.5"),
        token_from_symbol: String::from("ETH"),
        token_from_logo: None,
        token_to_address: String::from("0x2791bca1f2de4661ed88a30c99a7a9449aa84174"),
        token_to_amount: decimal(usd_volume),
        token_to_symbol: String::from("USDC"),
        token_to_logo: None,
        usd_volume: decimal(usd_volume),
        timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
            + chrono::Duration::seconds(id),
        status: Some(String::from("completed")),
        filled_src_amount: None,
        filled_dst_amount: None,
        is_partial_fill: false,
    }
}

pub fn statistics(
    classic_swaps: u64,
    classic_volume: &str,
    limit_order_swaps: u64,
    limit_order_volume: &str,
) -> AggregateStatistics {
    let classic_volume_usd = decimal(classic_volume);
    let limit_order_volume_usd = decimal(limit_order_volume);

    AggregateStatistics {
        total_swaps: classic_swaps + limit_order_swaps,
        total_volume_usd: &classic_volume_usd + &limit_order_volume_usd,
        classic_swaps,
        classic_volume_usd,
        limit_order_swaps,
        limit_order_volume_usd,
        unique_wallets: 3,
    }
}

/// Dashboard whose swap list matches its statistics, newest first.
pub fn dashboard(stats: AggregateStatistics) -> DashboardResponse {
    let mut swaps = vec![];
    let mut id = 1000;

    for _ in 0..stats.classic_swaps {
        swaps.push(swap(id, SwapType::Classic, "100"));
        id += 1;
    }
    for _ in 0..stats.limit_order_swaps {
        swaps.push(swap(id, SwapType::LimitOrder, "100"));
        id += 1;
    }
    swaps.reverse();

    let returned = swaps.len() as u32;
    DashboardResponse {
        swaps,
        statistics: stats,
        pagination: Pagination {
            limit: 100,
            offset: 0,
            returned,
        },
    }
}

pub fn execution(execution_id: &str, total_wallets: u32) -> BotExecution {
    BotExecution {
        id: 1,
        execution_id: execution_id.to_owned(),
        strategy_name: String::from("volume-farming"),
        total_wallets,
        completed_wallets: total_wallets,
        failed_wallets: 0,
        total_volume_usd: 1250.0,
        start_time: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        end_time: None,
        status: ExecutionStatus::Completed,
    }
}

pub fn wallet(execution_id: &str, index: u32) -> WalletExecution {
    WalletExecution {
        id: i64::from(index) + 1,
        execution_id: execution_id.to_owned(),
        wallet_index: index,
        wallet_address: format!("0x{:040x}", index + 1),
        tokens: vec![String::from("ETH"), String::from("USDC")],
        swaps_completed: 4,
        total_volume_usd: 400.0,
        status: WalletStatus::Completed,
        error_message: None,
        start_time: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        end_time: None,
    }
}

pub fn snapshot(
    execution_id: &str,
    wallet_address: &str,
    minute: u32,
    total_capital_usd: f64,
) -> PortfolioSnapshot {
    PortfolioSnapshot {
        id: i64::from(minute),
        execution_id: execution_id.to_owned(),
        wallet_address: wallet_address.to_owned(),
        total_capital_usd,
        eth_balance: decimal("0.5"),
        usdc_balance: decimal("250"),
        wbtc_balance: decimal("0"),
        lbtc_balance: decimal("0"),
        timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, minute, 0).unwrap(),
    }
}

pub fn top_wallet(address: &str, total_volume: &str) -> TopWallet {
    TopWallet {
        wallet_address: address.to_owned(),
        total_volume: decimal(total_volume),
        swap_count: 3,
        classic_count: 2,
        limit_order_count: 1,
    }
}

pub fn volume_series() -> VolumeOverTimeResponse {
    VolumeOverTimeResponse {
        interval: String::from("day"),
        data: vec![
            VolumeBucket {
                period: String::from("2025-03-13"),
                volume: decimal("1200.5"),
                swap_count: 12,
            },
            VolumeBucket {
                period: String::from("2025-03-14"),
                volume: decimal("800"),
                swap_count: 7,
            },
        ],
    }
}
