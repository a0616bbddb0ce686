use std::sync::Arc;

use futures::StreamExt;
use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::{debug, info, warn};

use super::api::TrackingApi;
use crate::configuration::ReconnectPolicy;

/// What the stream pump reports back, tagged with the generation that
/// opened the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub generation: u64,
    pub kind: StreamUpdateKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdateKind {
    Connected,
    Message(String),
    /// The connection dropped and the policy allows another attempt.
    Reconnecting(String),
    /// The connection is gone and the reconnect policy gave up.
    Closed(String),
}

/// Owned handle to one live feed connection. Closing (or dropping) aborts
/// the pump task, which releases the underlying transport.
#[derive(Debug)]
pub struct Subscription {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn open<C>(
        api: Arc<C>,
        generation: u64,
        policy: ReconnectPolicy,
        sender: mpsc::Sender<StreamUpdate>,
    ) -> Subscription
    where
        C: TrackingApi + ?Sized + 'static,
    {
        let handle = tokio::spawn(pump(api, generation, policy, sender));

        Subscription {
            generation,
            handle: Some(handle),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "swap stream closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

async fn report(
    sender: &mpsc::Sender<StreamUpdate>,
    generation: u64,
    kind: StreamUpdateKind,
) -> bool {
    sender.send(StreamUpdate { generation, kind }).await.is_ok()
}

async fn pump<C>(
    api: Arc<C>,
    generation: u64,
    policy: ReconnectPolicy,
    sender: mpsc::Sender<StreamUpdate>,
) where
    C: TrackingApi + ?Sized,
{
    let mut attempt = 0;

    let reason = loop {
        let reason = match api.open_swap_stream().await {
            Ok(mut stream) => {
                info!(generation, "swap stream connected");
                attempt = 0;
                if !report(&sender, generation, StreamUpdateKind::Connected).await
                {
                    return;
                }

                let mut reason = String::from("stream ended");
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(data) => {
                            let kind = StreamUpdateKind::Message(data);
                            if !report(&sender, generation, kind).await {
                                return;
                            }
                        },
                        Err(e) => {
                            reason = e.to_string();
                            break;
                        },
                    }
                }
                reason
            },
            Err(e) => e.to_string(),
        };

        attempt += 1;
        match policy.delay_for(attempt) {
            Some(delay) => {
                warn!(
                    generation,
                    attempt, "swap stream disconnected: {}, reconnecting", reason
                );
                let kind = StreamUpdateKind::Reconnecting(reason);
                if !report(&sender, generation, kind).await {
                    return;
                }
                time::sleep(delay).await;
            },
            None => break reason,
        }
    };

    report(&sender, generation, StreamUpdateKind::Closed(reason)).await;
}
