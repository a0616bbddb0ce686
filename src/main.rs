use clap::Parser;
use tracing::{error, Level};

use tracker::{
    cli::{init_config, run, Cli},
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let cli = Cli::parse();
    let config = init_config();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(
            config
                .as_ref()
                .map(|config| config.log_level)
                .unwrap_or(Level::INFO),
        )
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match config {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    run(cli.command, config).await
}
