use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::Context;
use cityweather_core::{Config, DisplayState, Session, config::API_KEY_ENV, provider_from_config};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather conditions for a city")]
pub struct Cli {
    /// Read and write configuration at this path instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for city names and show current conditions until Esc or Ctrl-C.
    Interactive,

    /// Show current conditions for one city and exit.
    Show {
        /// City or address, passed to the weather service as typed.
        city: String,

        /// Print the result as JSON instead of a panel.
        #[arg(long)]
        json: bool,
    },

    /// Store the Visual Crossing API key in the config file.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        let mut config = Config::load_from(&config_path)?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => {
                configure(&mut config, &config_path)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                println!("{}", config_path.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json } => {
                config.apply_env();
                warn_if_missing_key(&config);
                let found = show(&config, city, json, &mut std::io::stdout()).await?;
                Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Interactive => {
                config.apply_env();
                warn_if_missing_key(&config);
                interactive(&config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure(config: &mut Config, path: &std::path::Path) -> anyhow::Result<()> {
    let api_key = Password::new("Visual Crossing API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://www.visualcrossing.com/account")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save_to(path)?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

fn warn_if_missing_key(config: &Config) {
    if !config.has_api_key() {
        tracing::warn!("No API key configured. Set {API_KEY_ENV} or run `cityweather configure`.");
    }
}

/// Fetch once and print the panel. Returns `false` when the fetch failed.
async fn show(
    config: &Config,
    city: String,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let mut session = Session::new(provider_from_config(config)?);
    session.set_query(city);

    let display = session.submit_and_wait().await;
    let failed = display.error().is_some();
    tracing::debug!(failed, "show finished");

    if json {
        writeln!(out, "{}", render::as_json(display).context("Failed to serialize result")?)?;
    } else {
        writeln!(out, "{}", render::panel(display, config.icon_base_url()))?;
    }

    Ok(!matches!(display, DisplayState::Error(_)))
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let mut session = Session::new(provider_from_config(config)?);

    loop {
        let input = Text::new("Enter city name")
            .with_initial_value(session.query())
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let city = match input {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        if city.trim().is_empty() {
            continue;
        }

        session.set_query(city);
        let display = session.submit_and_wait().await;

        println!("{}\n", render::panel(display, config.icon_base_url()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn config_for(server: &MockServer) -> Config {
        Config {
            api_key: Some("TEST_KEY".into()),
            base_url: Some(format!("{}/timeline", server.uri())),
            icon_base_url: None,
        }
    }

    async fn run_show(config: &Config, city: &str, json: bool) -> (bool, String) {
        let mut out = Vec::new();
        let found = show(config, city.to_string(), json, &mut out).await.unwrap();
        (found, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn show_succeeds_and_prints_panel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resolvedAddress": "Paris, France",
                "currentConditions": {
                    "temp": 9.5, "humidity": 70, "conditions": "Rain",
                    "icon": "rain", "windspeed": 12.0
                }
            })))
            .mount(&server)
            .await;

        let (found, out) = run_show(&config_for(&server), "Paris", false).await;

        assert!(found);
        assert!(out.starts_with("Paris, France\n"));
        assert!(out.contains("9.5°C"));
    }

    #[tokio::test]
    async fn show_fails_with_error_panel_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (found, out) = run_show(&config_for(&server), "Atlantis", false).await;

        assert!(!found);
        assert_eq!(out, "✗ City not found. Please try again.\n");
    }

    #[tokio::test]
    async fn show_json_reports_error_kind_and_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (found, out) = run_show(&config_for(&server), "Paris", true).await;
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(!found);
        assert_eq!(value["error"], "unauthorized");
        assert_eq!(value["message"], "Invalid API key. Please check your API key.");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["cityweather"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_takes_city_with_spaces() {
        let cli = Cli::try_parse_from(["cityweather", "show", "New York", "-v"]).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Command::Show { city, json }) => {
                assert_eq!(city, "New York");
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["cityweather", "config-path", "--config", "/tmp/cw.toml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cw.toml")));
        assert!(matches!(cli.command, Some(Command::ConfigPath)));
    }
}
