mod cli;
mod confirm;
mod output;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hub_core::protocol::{Participant, RawMessage};
use hub_core::{
    default_config_json, init_logging, ActionDispatcher, ActionOutcome, AlwaysConfirm, Confirm,
    DispatchSettings, HttpHubApi, HubConfig, MessageAction,
};

use cli::{Cli, Cmd};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Cli) -> anyhow::Result<HubConfig> {
    let mut config = HubConfig::load(&args.data_dir)
        .with_context(|| format!("load config from {}", args.data_dir.display()))?;
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(channel) = &args.channel {
        config.channel_id = channel.clone();
    }
    config.validate()?;
    Ok(config)
}

fn read_message(path: &Path) -> anyhow::Result<RawMessage> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read message from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("parse message json")
}

fn adhoc_message(config: &HubConfig, sender_id: String, sender_name: String, content: String) -> RawMessage {
    RawMessage {
        id: "local".to_string(),
        channel_id: config.channel_id.clone(),
        sender_id,
        sender_name,
        sender_type: "user".to_string(),
        content,
        tags: Vec::new(),
        timestamp: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default(),
    }
}

async fn run(args: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    init_logging(&config.log_filter);
    tracing::debug!(base_url = %config.base_url, channel = %config.channel_id, "hubctl starting");

    let action = match args.cmd {
        Cmd::Config => {
            println!("{}", default_config_json());
            return Ok(ExitCode::SUCCESS);
        }
        Cmd::Render {
            ref file,
            ref sender_name,
            ref sender_id,
            ref content,
        } => {
            let message = match (file, content) {
                (Some(path), _) => read_message(path)?,
                (None, Some(content)) => adhoc_message(
                    &config,
                    sender_id.clone(),
                    sender_name.clone(),
                    content.clone(),
                ),
                (None, None) => anyhow::bail!("render needs --file or message content"),
            };
            let view = hub_core::render_message(&message, &config);
            if args.json {
                output::print_json(&view)?;
            } else {
                output::print_view(&view);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Cmd::Fetch { ref data_id } => MessageAction::FetchData {
            data_id: data_id.clone(),
        },
        Cmd::Retry { ref file, .. } => MessageAction::Retry {
            owner: read_message(file)?,
        },
        Cmd::Cancel {
            ref id,
            ref name,
            ref kind,
        } => MessageAction::CancelTask {
            participant: Participant {
                id: id.clone(),
                name: name.clone(),
                kind: kind.clone(),
                window_hwnd: None,
            },
        },
        Cmd::Send { ref content } => MessageAction::Send {
            content: content.clone(),
        },
    };

    let confirm: Arc<dyn Confirm> = match args.cmd {
        Cmd::Retry { yes: true, .. } => Arc::new(AlwaysConfirm),
        _ => Arc::new(confirm::StdinConfirm),
    };
    let api = HttpHubApi::new(&config.base_url, config.request_timeout())?;
    let (dispatcher, _outcomes) = ActionDispatcher::new(
        Arc::new(api),
        confirm,
        DispatchSettings::from(&config),
        tokio::runtime::Handle::current(),
    );

    let outcome = dispatcher.perform(action).await;
    if args.json {
        output::print_json(&outcome)?;
    } else {
        output::print_outcome(&outcome);
    }

    Ok(match outcome {
        ActionOutcome::Unchanged => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
