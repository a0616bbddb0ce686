use tracing::info;

use super::snapshots::collect_snapshots;
use crate::{
    error::Error,
    model::{ExecutionOverview, ViewState},
    provider::TrackingApi,
    types::BotExecution,
};

pub const EXECUTIONS_ERROR: &str = "Failed to load executions";
pub const EXECUTION_DETAILS_ERROR: &str = "Failed to load execution details";

pub async fn load_executions<C>(
    api: &C,
    limit: u32,
    offset: u32,
) -> ViewState<Vec<BotExecution>>
where
    C: TrackingApi + ?Sized,
{
    let result = api
        .executions(limit, offset)
        .await
        .map(|response| response.executions);

    ViewState::from_result(result, EXECUTIONS_ERROR)
}

pub async fn load_execution_overview<C>(
    api: &C,
    execution_id: &str,
) -> ViewState<ExecutionOverview>
where
    C: TrackingApi + ?Sized,
{
    ViewState::from_result(
        fetch_overview(api, execution_id).await,
        EXECUTION_DETAILS_ERROR,
    )
}

async fn fetch_overview<C>(
    api: &C,
    execution_id: &str,
) -> Result<ExecutionOverview, Error>
where
    C: TrackingApi + ?Sized,
{
    let details = api.execution_details(execution_id).await?;
    let snapshots =
        collect_snapshots(api, execution_id, &details.wallets).await;

    info!(
        execution_id,
        wallets = details.wallets.len(),
        "execution overview loaded"
    );

    Ok(ExecutionOverview::new(
        details.execution,
        details.wallets,
        &snapshots,
    ))
}
