use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};
use crate::models::ItemState;

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A personal task tracker backed by a synchronized store

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/taskwise/config.toml
    * $HOME/.config/taskwise/config.toml
    * $HOME/.taskwise.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    #[command(subcommand)]
    task: Option<TaskCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TaskCommand {
    /// List items, all states or a single one
    List {
        #[arg(value_enum)]
        state: Option<StateArg>,
    },
    /// Add a new item
    Add {
        title: String,
        #[arg(value_enum)]
        state: Option<StateArg>,
    },
    /// Remove an item by title
    Remove { title: String },
    /// Clear every stored item
    Clear,
    /// Destroy the persisted store entirely
    Destroy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    Todo,
    InProgress,
    Done,
}

impl From<StateArg> for ItemState {
    fn from(state: StateArg) -> ItemState {
        match state {
            StateArg::Todo => ItemState::Todo,
            StateArg::InProgress => ItemState::InProgress,
            StateArg::Done => ItemState::Done,
        }
    }
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        Ok(load_configuration(config_path.as_str()).wrap_err("loading configuration")?)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }

    pub fn task(&self) -> Option<&TaskCommand> {
        self.task.as_ref()
    }
}
