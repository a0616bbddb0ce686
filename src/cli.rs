//! CLI module for the tracker
//!
//! One-shot views of the bot executions and swap dashboards, and the live
//! volume monitor driven by commands read from stdin.

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    configuration::{get_configuration, set_configuration, Config},
    error::Error,
    handler::{
        load_execution_overview, load_executions, Command, VolumeMonitor,
        TOP_WALLETS_ERROR,
    },
    helpers::VolumeInterval,
    model::ViewState,
    provider::{TrackingApi, HTTP},
    render::{
        render_execution_overview, render_executions, render_state,
        render_top_wallets, render_volume_series, render_volume_view, LOADING,
    },
    types::{SwapFilter, SwapType},
};

/// Trading bot and swap volume tracker
#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Trading bot executions and live swap volume", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List bot executions
    Executions {
        /// Page size (defaults to EXECUTIONS_LIMIT)
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Show one execution with per-wallet capital changes
    Execution {
        execution_id: String,
    },

    /// Live swap volume monitor.
    /// Reads `all`, `classic`, `limit`, `top` and `quit` from stdin.
    Volume {
        #[arg(long, default_value = "all")]
        filter: SwapFilter,
    },

    /// Wallets ranked by swap volume
    TopWallets {
        #[arg(long)]
        swap_type: Option<SwapType>,
    },

    /// Swap volume bucketed by time
    VolumeOverTime {
        #[arg(long, default_value = "day")]
        interval: VolumeInterval,

        #[arg(long)]
        swap_type: Option<SwapType>,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

pub async fn run(command: Commands, config: Config) -> Result<(), Error> {
    let http = Arc::new(HTTP::new(config.clone())?);

    match command {
        Commands::Executions { limit, offset } => {
            let limit = limit.unwrap_or(config.executions_limit);
            println!("{}", LOADING);
            let state = load_executions(http.as_ref(), limit, offset).await;
            print_state(&state, |executions| render_executions(executions))
        },
        Commands::Execution { execution_id } => {
            println!("{}", LOADING);
            let state =
                load_execution_overview(http.as_ref(), &execution_id).await;
            print_state(&state, render_execution_overview)
        },
        Commands::Volume { filter } => run_volume(http, &config, filter).await,
        Commands::TopWallets { swap_type } => {
            println!("{}", LOADING);
            let state = ViewState::from_result(
                http.top_wallets(swap_type).await.map(|r| r.wallets),
                TOP_WALLETS_ERROR,
            );
            print_state(&state, |wallets| render_top_wallets(wallets))
        },
        Commands::VolumeOverTime {
            interval,
            swap_type,
        } => {
            println!("{}", LOADING);
            let state = ViewState::from_result(
                http.volume_over_time(interval, swap_type).await,
                "Failed to fetch volume over time",
            );
            print_state(&state, render_volume_series)
        },
    }
}

fn print_state<T, F>(state: &ViewState<T>, render: F) -> Result<(), Error>
where
    F: FnOnce(&T) -> String,
{
    println!("{}", render_state(state, render));

    match state.error() {
        Some(message) => Err(Error::ViewFailed(message.to_owned())),
        None => Ok(()),
    }
}

/// Parses one stdin line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, Error> {
    let command = match line.trim().to_lowercase().as_str() {
        "" => return Ok(None),
        "all" => Command::SelectFilter(SwapFilter::All),
        "classic" => Command::SelectFilter(SwapFilter::Classic),
        "limit" | "limit-order" => Command::SelectFilter(SwapFilter::LimitOrder),
        "top" => Command::ShowTopWallets,
        "quit" | "exit" | "q" => Command::Shutdown,
        other => {
            return Err(Error::InvalidOption {
                option: format!(
                    "'{}'. Valid commands: all, classic, limit, top, quit",
                    other
                ),
            })
        },
    };

    Ok(Some(command))
}

async fn run_volume<C>(
    api: Arc<C>,
    config: &Config,
    filter: SwapFilter,
) -> Result<(), Error>
where
    C: TrackingApi + ?Sized + 'static,
{
    let (monitor, mut view) = VolumeMonitor::new(api, config, filter);
    let (commands, receiver) = mpsc::channel(16);
    let monitor = tokio::spawn(monitor.run(receiver));

    let printer = tokio::spawn(async move {
        println!("{}", render_volume_view(&view.borrow_and_update()));
        while view.changed().await.is_ok() {
            println!("{}", render_volume_view(&view.borrow_and_update()));
        }
    });

    // stdin is read on a plain thread so a pending read never holds up
    // runtime shutdown
    let (lines_tx, mut lines) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if lines_tx.send(line).is_err() {
                        break;
                    }
                },
                Err(_) => break,
            }
        }
    });

    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };

        let command = match line {
            Some(line) => match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                },
            },
            None => Command::Shutdown,
        };

        if commands.send(command).await.is_err() || command == Command::Shutdown
        {
            break;
        }
    }

    info!("stopping volume monitor");
    drop(commands);

    let result = monitor.await?;
    printer.await?;

    result
}
