use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hubctl", version, about = "Render and act on SmartBot Hub chat messages")]
pub struct Cli {
    /// Directory holding hub_config.json.
    #[arg(long, env = "HUB_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Backend base url (overrides config and HUB_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Channel to act in (overrides config and HUB_CHANNEL).
    #[arg(long)]
    pub channel: Option<String>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Parse and render a message without touching the network.
    Render {
        /// RawMessage JSON file; `-` reads stdin.
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
        #[arg(long, default_value = "Admin")]
        sender_name: String,
        #[arg(long, default_value = "admin")]
        sender_id: String,
        /// Message content, when no file is given.
        content: Option<String>,
    },
    /// Fetch a shared-data blob and show it.
    Fetch { data_id: String },
    /// Resend the request carried by a message (RawMessage JSON file).
    Retry {
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Cancel the running task of a task bot.
    Cancel {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "task_bot")]
        kind: String,
    },
    /// Send a plain message as the operator.
    Send { content: String },
    /// Print the default config file.
    Config,
}
