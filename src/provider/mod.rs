pub use self::{
    api::{SwapEventStream, TrackingApi},
    http::HTTP,
    sse::{SseDecoder, SseEvent},
    subscription::{StreamUpdate, StreamUpdateKind, Subscription},
};

mod api;
mod http;
mod sse;
mod subscription;

#[cfg(test)]
pub(crate) mod mock;
