//! Plain-text rendering for the terminal binary.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};

use crate::{
    handler::{Phase, ViewMode, VolumeView},
    helpers::short_address,
    model::{ExecutionOverview, ViewState},
    types::{
        AggregateStatistics, BotExecution, Swap, TopWallet,
        VolumeOverTimeResponse,
    },
};

const SWAP_ROWS: usize = 20;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const LOADING: &str = "Loading...";

fn usd(value: &BigDecimal) -> String {
    format!("${}", value.with_scale_round(2, RoundingMode::HalfUp))
}

fn time(value: &DateTime<Utc>) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn optional_time(value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(value) => time(value),
        None => String::from("-"),
    }
}

/// Loading line, the rendered data, or the view's error message.
pub fn render_state<T, F>(state: &ViewState<T>, render: F) -> String
where
    F: FnOnce(&T) -> String,
{
    match state {
        ViewState::Loading => String::from(LOADING),
        ViewState::Ready(data) => render(data),
        ViewState::Error(message) => format!("Error: {}", message),
    }
}

pub fn render_executions(executions: &[BotExecution]) -> String {
    if executions.is_empty() {
        return String::from("No executions");
    }

    let mut lines = vec![format!(
        "{:<38} {:<18} {:<10} {:>8} {:>14} {:<19} {:<19}",
        "EXECUTION", "STRATEGY", "STATUS", "WALLETS", "VOLUME", "STARTED", "ENDED"
    )];

    for execution in executions {
        lines.push(format!(
            "{:<38} {:<18} {:<10} {:>8} {:>14} {:<19} {:<19}",
            execution.execution_id,
            execution.strategy_name,
            execution.status.to_string(),
            format!(
                "{}/{}",
                execution.completed_wallets, execution.total_wallets
            ),
            format!("${:.2}", execution.total_volume_usd),
            time(&execution.start_time),
            optional_time(&execution.end_time),
        ));
    }

    lines.join("\n")
}

pub fn render_execution_overview(overview: &ExecutionOverview) -> String {
    let execution = &overview.execution;
    let mut lines = vec![
        format!("Execution {}", execution.execution_id),
        format!("  strategy  {}", execution.strategy_name),
        format!("  status    {}", execution.status),
        format!(
            "  wallets   {} total, {} completed, {} failed",
            execution.total_wallets,
            execution.completed_wallets,
            execution.failed_wallets
        ),
        format!("  volume    ${:.2}", execution.total_volume_usd),
        format!(
            "  period    {} - {}",
            time(&execution.start_time),
            optional_time(&execution.end_time)
        ),
        String::new(),
        format!(
            "{:>3} {:<15} {:<10} {:>6} {:>12} {:>12} {:>12} {:>9}",
            "#", "WALLET", "STATUS", "SWAPS", "BEFORE", "AFTER", "CHANGE", "CHANGE%"
        ),
    ];

    for item in &overview.wallets {
        let wallet = &item.wallet;
        lines.push(format!(
            "{:>3} {:<15} {:<10} {:>6} {:>12} {:>12} {:>12} {:>8.2}%",
            wallet.wallet_index,
            short_address(&wallet.wallet_address),
            wallet.status.to_string(),
            wallet.swaps_completed,
            format!("${:.2}", item.capital.before),
            format!("${:.2}", item.capital.after),
            format!("{:+.2}", item.capital.change()),
            item.capital.change_percent(),
        ));

        if let Some(message) = &wallet.error_message {
            lines.push(format!("    error: {}", message));
        }
    }

    lines.join("\n")
}

pub fn render_statistics(statistics: &AggregateStatistics) -> String {
    [
        format!(
            "total        {:>8} swaps  {}",
            statistics.total_swaps,
            usd(&statistics.total_volume_usd)
        ),
        format!(
            "classic      {:>8} swaps  {}",
            statistics.classic_swaps,
            usd(&statistics.classic_volume_usd)
        ),
        format!(
            "limit order  {:>8} swaps  {}",
            statistics.limit_order_swaps,
            usd(&statistics.limit_order_volume_usd)
        ),
        format!("wallets      {:>8}", statistics.unique_wallets),
    ]
    .join("\n")
}

fn render_swap(swap: &Swap) -> String {
    format!(
        "{} {:<11} {} {} -> {} {} {:>14} {}{}",
        time(&swap.timestamp),
        swap.swap_type.as_str(),
        swap.token_from_amount.with_scale_round(6, RoundingMode::HalfUp),
        swap.token_from_symbol,
        swap.token_to_amount.with_scale_round(6, RoundingMode::HalfUp),
        swap.token_to_symbol,
        usd(&swap.usd_volume),
        short_address(&swap.wallet_address),
        if swap.is_partial_fill { " (partial)" } else { "" },
    )
}

pub fn render_top_wallets(wallets: &[TopWallet]) -> String {
    if wallets.is_empty() {
        return String::from("No wallets");
    }

    let mut lines = vec![format!(
        "{:>3} {:<15} {:>16} {:>7} {:>8} {:>6}",
        "#", "WALLET", "VOLUME", "SWAPS", "CLASSIC", "LIMIT"
    )];

    for (rank, wallet) in wallets.iter().enumerate() {
        lines.push(format!(
            "{:>3} {:<15} {:>16} {:>7} {:>8} {:>6}",
            rank + 1,
            short_address(&wallet.wallet_address),
            usd(&wallet.total_volume),
            wallet.swap_count,
            wallet.classic_count,
            wallet.limit_order_count,
        ));
    }

    lines.join("\n")
}

pub fn render_volume_series(series: &VolumeOverTimeResponse) -> String {
    if series.data.is_empty() {
        return format!("No volume per {}", series.interval);
    }

    let mut lines = vec![format!(
        "{:<20} {:>16} {:>7}",
        series.interval.to_uppercase(),
        "VOLUME",
        "SWAPS"
    )];

    for bucket in &series.data {
        lines.push(format!(
            "{:<20} {:>16} {:>7}",
            bucket.period,
            usd(&bucket.volume),
            bucket.swap_count
        ));
    }

    lines.join("\n")
}

pub fn render_volume_view(view: &VolumeView) -> String {
    let title = match view.mode {
        ViewMode::Swaps => format!(
            "Swaps [{}]{}",
            view.filter,
            if view.streaming { " live" } else { "" }
        ),
        ViewMode::TopWallets => String::from("Top wallets"),
    };

    let body = match &view.phase {
        Phase::Idle | Phase::Loading => String::from(LOADING),
        Phase::Error(message) => format!("Error: {}", message),
        Phase::Ready => match view.mode {
            ViewMode::TopWallets => render_top_wallets(&view.top_wallets),
            ViewMode::Swaps => {
                let mut lines = vec![render_statistics(&view.statistics)];
                lines.push(String::new());
                lines.extend(view.swaps.iter().take(SWAP_ROWS).map(render_swap));
                if view.swaps.len() > SWAP_ROWS {
                    lines.push(format!(
                        "... {} more",
                        view.swaps.len() - SWAP_ROWS
                    ));
                }
                lines.join("\n")
            },
        },
    };

    format!("{}\n{}", title, body)
}
