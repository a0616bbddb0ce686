use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::{
    header::{HeaderValue, ACCEPT},
    Client, Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{
    api::{SwapEventStream, TrackingApi},
    sse::{SseDecoder, SseEvent},
};
use crate::{
    configuration::Config,
    error::Error,
    helpers::VolumeInterval,
    types::{
        DashboardResponse, ExecutionDetails, ExecutionsResponse,
        PortfolioSnapshotsResponse, SwapType, TopWalletsResponse,
        VolumeOverTimeResponse,
    },
};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
    stream_http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let connect_timeout = Duration::from_secs(config.connect_timeout);

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(connect_timeout)
            .build()?;

        // The feed body never completes, so only the connect phase is bounded.
        let stream_http = Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(HTTP {
            config,
            http,
            stream_http,
        })
    }

    /// Appends path segments to the configured base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.config.api_base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                Error::ConfigurationError(format!(
                    "API_BASE_URL cannot be a base: {}",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", &url);
        let response = self.http.get(url.clone()).send().await?;
        let response = check_status(response, &url)?;
        let body = response.text().await?;
        let json = serde_json::from_str::<T>(&body)?;

        Ok(json)
    }
}

fn check_status(response: Response, url: &Url) -> Result<Response, Error> {
    let status = response.status();

    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

/// Payloads of the feed's message events. Named events such as heartbeats
/// are skipped.
fn message_payloads(events: Vec<SseEvent>) -> Vec<Result<String, Error>> {
    events
        .into_iter()
        .filter_map(|event| {
            if event.is_message() {
                return Some(Ok(event.data));
            }

            debug!("skipping stream event {:?}", event.event);
            None
        })
        .collect()
}

fn append_swap_type(url: &mut Url, swap_type: Option<SwapType>) {
    if let Some(swap_type) = swap_type {
        url.query_pairs_mut()
            .append_pair("swap_type", swap_type.as_str());
    }
}

#[async_trait]
impl TrackingApi for HTTP {
    async fn executions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ExecutionsResponse, Error> {
        let mut url = self.endpoint(&["bot", "executions"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        self.get_json(url).await
    }

    async fn execution_details(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionDetails, Error> {
        let url = self.endpoint(&["bot", "execution", execution_id])?;
        self.get_json(url).await
    }

    async fn portfolio_snapshots(
        &self,
        execution_id: &str,
        wallet_address: &str,
    ) -> Result<PortfolioSnapshotsResponse, Error> {
        let url = self.endpoint(&[
            "bot",
            "portfolio",
            execution_id,
            wallet_address,
        ])?;
        self.get_json(url).await
    }

    async fn dashboard(
        &self,
        swap_type: Option<SwapType>,
        limit: u32,
    ) -> Result<DashboardResponse, Error> {
        let mut url = self.endpoint(&["sushiswap", "dashboard"])?;
        append_swap_type(&mut url, swap_type);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        self.get_json(url).await
    }

    async fn volume_over_time(
        &self,
        interval: VolumeInterval,
        swap_type: Option<SwapType>,
    ) -> Result<VolumeOverTimeResponse, Error> {
        let mut url =
            self.endpoint(&["sushiswap", "dashboard", "volume-over-time"])?;
        url.query_pairs_mut()
            .append_pair("interval", interval.as_str());
        append_swap_type(&mut url, swap_type);

        self.get_json(url).await
    }

    async fn top_wallets(
        &self,
        swap_type: Option<SwapType>,
    ) -> Result<TopWalletsResponse, Error> {
        let mut url = self.endpoint(&["sushiswap", "top-wallets"])?;
        append_swap_type(&mut url, swap_type);

        self.get_json(url).await
    }

    async fn open_swap_stream(&self) -> Result<SwapEventStream, Error> {
        let url = self.endpoint(&["sushiswap", "stream"])?;
        debug!("GET {} (stream)", &url);

        let response = self
            .stream_http
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await?;
        let response = check_status(response, &url)?;

        let mut decoder = SseDecoder::new();
        let events = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => message_payloads(decoder.push(&bytes)),
                Err(e) => vec![Err(Error::from(e))],
            })
            .flat_map(stream::iter);

        Ok(events.boxed())
    }
}
