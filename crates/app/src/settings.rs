//! Settings for the `finplan` binary.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file
//! (`settings.toml`, or the path given with `--config`), `FINPLAN__*`
//! environment variables, then `DATABASE_URL` and `PORT`.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 8080
//! database = { sqlite = "finplan.db" }
//! ```
use clap::Parser;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
    Url(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, Parser)]
#[command(name = "finplan", version, about = "Budget planning HTTP service")]
struct Args {
    /// Optional settings file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = defaults()?
            .add_source(File::with_name(path).required(args.config.is_some()))
            .add_source(
                Environment::with_prefix("FINPLAN")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_overrides(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("PORT").ok(),
        )?;
        Ok(settings)
    }

    fn apply_overrides(
        &mut self,
        database_url: Option<String>,
        port: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            self.server.database = Database::Url(url);
        }
        if let Some(port) = port {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|err| ConfigError::Message(format!("invalid PORT '{port}': {err}")))?;
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.database", "memory")
}
