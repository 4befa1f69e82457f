use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, Text};
use serde_json::to_string_pretty;
use std::sync::Arc;
use weather_core::{CancellationToken, Config, service_from_config};

use crate::{
    server,
    tools::{self, WeatherTools},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the fetched data as JSON instead of a formatted report.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the OpenWeather API key and base URI.
    Configure,

    /// Serve `get_current_weather` and `get_forecast` as MCP tools over stdio.
    Serve,

    /// Show current weather conditions for a city.
    Current {
        /// City name, e.g. "London".
        city: String,

        /// Optional country code, e.g. "GB" or "US".
        #[arg(long)]
        country: Option<String>,

        /// One of: metric, imperial, standard.
        #[arg(long, default_value = tools::DEFAULT_UNITS)]
        units: String,
    },

    /// Show the forecast for a city, in 3-hour steps.
    Forecast {
        /// City name, e.g. "London".
        city: String,

        /// Optional country code, e.g. "GB" or "US".
        #[arg(long)]
        country: Option<String>,

        /// One of: metric, imperial, standard.
        #[arg(long, default_value = tools::DEFAULT_UNITS)]
        units: String,

        /// Number of days to forecast (1-5).
        #[arg(long, default_value_t = 1)]
        days: u32,
    },
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(config),
            Command::Serve => server::serve_stdio(weather_tools(&config)?).await,
            Command::Current { city, country, units } => {
                let tools = weather_tools(&config)?;

                if self.json {
                    let weather = tools
                        .fetch_current(&city, country.as_deref(), &units)
                        .await
                        .map_err(anyhow::Error::msg)?;
                    println!("{}", to_string_pretty(&weather)?);
                } else {
                    print!("{}", tools.current_weather(&city, country.as_deref(), &units).await);
                }
                Ok(())
            }
            Command::Forecast { city, country, units, days } => {
                let tools = weather_tools(&config)?;

                if self.json {
                    let forecast = tools
                        .fetch_forecast(&city, country.as_deref(), &units, days)
                        .await
                        .map_err(anyhow::Error::msg)?;
                    println!("{}", to_string_pretty(&forecast)?);
                } else {
                    print!("{}", tools.forecast(&city, country.as_deref(), &units, days).await);
                }
                Ok(())
            }
        }
    }
}

fn weather_tools(config: &Config) -> anyhow::Result<WeatherTools> {
    let service = Arc::from(service_from_config(config)?);
    Ok(WeatherTools::new(service, cancel_on_ctrl_c()))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let mut prompt = Password::new("OpenWeather API key:").without_confirmation();
    if config.is_configured() {
        prompt = prompt.with_help_message("An API key is already set; this replaces it.");
    }
    let api_key = prompt.prompt().context("Failed to read API key")?;

    let base_uri = Text::new("Base URI:")
        .with_default(&config.openweather.base_uri)
        .prompt()
        .context("Failed to read base URI")?;

    config.set_api_key(api_key.trim().to_string());
    config.openweather.base_uri = base_uri.trim_end_matches('/').to_string();

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling request");
            trigger.cancel();
        }
    });

    cancel
}
