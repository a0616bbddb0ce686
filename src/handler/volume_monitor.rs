use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::live_volume::{Action, Ingest, LiveVolume, VolumeView};
use crate::{
    configuration::{Config, ReconnectPolicy},
    error::Error,
    provider::{StreamUpdate, StreamUpdateKind, Subscription, TrackingApi},
    types::{DashboardResponse, SwapFilter, TopWalletsResponse},
};

const CHANNEL_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectFilter(SwapFilter),
    ShowTopWallets,
    Shutdown,
}

enum FetchOutcome {
    Dashboard {
        generation: u64,
        result: Result<DashboardResponse, Error>,
    },
    TopWallets {
        generation: u64,
        result: Result<TopWalletsResponse, Error>,
    },
}

/// Drives one `LiveVolume` from a single task: commands, fetch outcomes and
/// stream updates are applied in arrival order, and every change is
/// published on the watch channel.
pub struct VolumeMonitor<C>
where
    C: TrackingApi + ?Sized + 'static,
{
    api: Arc<C>,
    state: LiveVolume,
    initial_filter: SwapFilter,
    dashboard_limit: u32,
    reconnect_policy: ReconnectPolicy,
    subscription: Option<Subscription>,
    connected: bool,
    gave_up: Option<u64>,
    updates_tx: mpsc::Sender<StreamUpdate>,
    updates_rx: mpsc::Receiver<StreamUpdate>,
    outcomes_tx: mpsc::Sender<FetchOutcome>,
    outcomes_rx: mpsc::Receiver<FetchOutcome>,
    view: watch::Sender<VolumeView>,
}

impl<C> VolumeMonitor<C>
where
    C: TrackingApi + ?Sized + 'static,
{
    pub fn new(
        api: Arc<C>,
        config: &Config,
        initial_filter: SwapFilter,
    ) -> (VolumeMonitor<C>, watch::Receiver<VolumeView>) {
        let state = LiveVolume::new(
            config.stream_swap_types.clone(),
            config.event_log_capacity,
        );
        let (view, receiver) = watch::channel(state.view(false));
        let (updates_tx, updates_rx) = mpsc::channel(CHANNEL_SIZE);
        let (outcomes_tx, outcomes_rx) = mpsc::channel(CHANNEL_SIZE);

        let monitor = VolumeMonitor {
            api,
            state,
            initial_filter,
            dashboard_limit: config.dashboard_limit,
            reconnect_policy: config.reconnect_policy,
            subscription: None,
            connected: false,
            gave_up: None,
            updates_tx,
            updates_rx,
            outcomes_tx,
            outcomes_rx,
            view,
        };

        (monitor, receiver)
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
    ) -> Result<(), Error> {
        let action = self.state.select_filter(self.initial_filter);
        self.dispatch(action);
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(Command::SelectFilter(filter)) => {
                            let action = self.state.select_filter(filter);
                            self.dispatch(action);
                        },
                        Some(Command::ShowTopWallets) => {
                            let action = self.state.show_top_wallets();
                            self.dispatch(action);
                        },
                        Some(Command::Shutdown) | None => break,
                    }
                },
                Some(outcome) = self.outcomes_rx.recv() => {
                    self.apply_outcome(outcome);
                },
                Some(update) = self.updates_rx.recv() => {
                    self.apply_update(update);
                },
            }

            self.sync_stream();
            self.publish();
        }

        self.close_stream();
        self.publish();
        info!("volume monitor stopped");

        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {},
            Action::FetchDashboard { generation, filter } => {
                self.close_stream();

                let api = self.api.clone();
                let sender = self.outcomes_tx.clone();
                let limit = self.dashboard_limit;

                debug!(generation, %filter, "fetching dashboard");
                tokio::spawn(async move {
                    let result = api.dashboard(filter.swap_type(), limit).await;
                    let _ = sender
                        .send(FetchOutcome::Dashboard { generation, result })
                        .await;
                });
            },
            Action::FetchTopWallets { generation } => {
                self.close_stream();

                let api = self.api.clone();
                let sender = self.outcomes_tx.clone();

                debug!(generation, "fetching top wallets");
                tokio::spawn(async move {
                    let result = api.top_wallets(None).await;
                    let _ = sender
                        .send(FetchOutcome::TopWallets { generation, result })
                        .await;
                });
            },
        }
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Dashboard { generation, result } => {
                self.state.apply_dashboard(generation, result);
            },
            FetchOutcome::TopWallets { generation, result } => {
                self.state.apply_top_wallets(generation, result);
            },
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.generation() == generation)
            .unwrap_or(false)
    }

    fn apply_update(&mut self, update: StreamUpdate) {
        match update.kind {
            StreamUpdateKind::Connected => {
                if self.is_current(update.generation) {
                    self.connected = true;
                }
            },
            StreamUpdateKind::Message(data) => {
                if self.state.ingest(update.generation, &data)
                    == Ingest::Admitted
                {
                    debug!(generation = update.generation, "swap event merged");
                }
            },
            StreamUpdateKind::Reconnecting(reason) => {
                if self.is_current(update.generation) {
                    debug!(
                        generation = update.generation,
                        "swap stream waiting to reconnect: {}", reason
                    );
                    self.connected = false;
                }
            },
            StreamUpdateKind::Closed(reason) => {
                if self.is_current(update.generation) {
                    warn!(
                        generation = update.generation,
                        "swap stream closed: {}", reason
                    );
                    self.subscription = None;
                    self.connected = false;
                    self.gave_up = Some(update.generation);
                }
            },
        }
    }

    /// Opens or closes the feed connection to match what the state wants.
    fn sync_stream(&mut self) {
        let generation = self.state.generation();
        let wants =
            self.state.wants_stream() && self.gave_up != Some(generation);

        if !wants {
            self.close_stream();
            return;
        }

        if !self.is_current(generation) {
            self.close_stream();
            self.subscription = Some(Subscription::open(
                self.api.clone(),
                generation,
                self.reconnect_policy,
                self.updates_tx.clone(),
            ));
        }
    }

    fn close_stream(&mut self) {
        self.connected = false;
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
    }

    /// `streaming` is only reported while a connection is actually up.
    fn publish(&self) {
        self.view.send_replace(self.state.view(self.connected));
    }
}
