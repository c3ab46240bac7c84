mod actions;
mod api;
mod bot_format;
mod config;
mod detail;
mod dispatch;
mod logging;
pub mod markup;
mod render;

pub use actions::MessageAction;
pub use api::{ApiError, HttpHubApi, HubApi};
pub use bot_format::{default_bot_identities, format_bullets, RenderMode};
pub use config::{default_config_json, ConfigError, HubConfig, CONFIG_FILE_NAME};
pub use detail::{DetailBody, DetailView};
pub use dispatch::{
    retry_content, ActionDispatcher, ActionOutcome, AlwaysConfirm, Confirm, DispatchSettings,
};
pub use logging::init_logging;
pub use render::{
    display_text, format_relative_time, render, Element, MessageBody, MessageStyle, MessageView,
};

pub use hub_protocol as protocol;

/// Render one message the way the dashboard shows it.
pub fn render_message(message: &protocol::RawMessage, config: &HubConfig) -> MessageView {
    MessageView::build(message, &config.bot_identities, chrono::Utc::now())
}
