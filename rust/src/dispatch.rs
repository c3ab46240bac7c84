use std::sync::Arc;

use chrono::Utc;
use flume::{Receiver, Sender};
use hub_protocol::{
    ControlCommand, ControlCommandRequest, Participant, RawMessage, SendAck, SendMessageRequest,
    SYSTEM_SENDER_ID, SYSTEM_SENDER_NAME,
};
use serde::Serialize;

use crate::actions::MessageAction;
use crate::api::HubApi;
use crate::config::HubConfig;
use crate::detail::DetailView;
use crate::markup::first_block;

pub const RETRY_CONFIRM_PROMPT: &str = "Are you sure you want to retry this message?";

/// Operator confirmation before an outbound action is submitted.
pub trait Confirm: Send + Sync + 'static {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    OpenDetail { detail: DetailView },
    Sent { ack: SendAck },
    /// The operator declined the confirmation; nothing was sent.
    Declined,
    /// Nothing to show: no-op action or a logged failure.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub base_url: String,
    pub channel_id: String,
    pub operator_name: String,
}

impl From<&HubConfig> for DispatchSettings {
    fn from(config: &HubConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            channel_id: config.channel_id.clone(),
            operator_name: config.operator_name.clone(),
        }
    }
}

/// Message the operator sends when retrying `owner`: a mention of the
/// original sender plus its first `[json]` block, if any.
pub fn retry_content(owner: &RawMessage) -> String {
    let json_block = first_block(&owner.content).unwrap_or_default();
    format!(
        "@{} Retrying your request...\n{json_block}",
        owner.sender_id
    )
}

pub struct ActionDispatcher {
    api: Arc<dyn HubApi>,
    confirm: Arc<dyn Confirm>,
    settings: DispatchSettings,
    runtime: tokio::runtime::Handle,
    outcome_tx: Sender<ActionOutcome>,
}

impl ActionDispatcher {
    pub fn new(
        api: Arc<dyn HubApi>,
        confirm: Arc<dyn Confirm>,
        settings: DispatchSettings,
        runtime: tokio::runtime::Handle,
    ) -> (Arc<Self>, Receiver<ActionOutcome>) {
        let (outcome_tx, outcome_rx) = flume::unbounded();
        let dispatcher = Arc::new(Self {
            api,
            confirm,
            settings,
            runtime,
            outcome_tx,
        });
        (dispatcher, outcome_rx)
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Fire and forget: the outcome arrives on the receiver returned by `new`.
    pub fn dispatch(self: &Arc<Self>, action: MessageAction) {
        // Contract: never block caller.
        let this = Arc::clone(self);
        self.runtime.spawn(async move {
            let outcome = this.perform(action).await;
            let _ = this.outcome_tx.send(outcome);
        });
    }

    pub async fn perform(&self, action: MessageAction) -> ActionOutcome {
        tracing::debug!(action = action.tag(), "dispatch");
        match action {
            MessageAction::ViewJson { id, payload } => ActionOutcome::OpenDetail {
                detail: DetailView::for_inline_json(&id, &payload, Utc::now()),
            },
            MessageAction::FetchData { data_id } => self.fetch_data(&data_id).await,
            MessageAction::Retry { owner } => self.retry(&owner).await,
            MessageAction::CancelTask { participant } => self.cancel_task(&participant).await,
            MessageAction::Send { content } => {
                let content = content.trim();
                if content.is_empty() {
                    return ActionOutcome::Unchanged;
                }
                self.send_as_operator(content.to_string(), "send").await
            }
        }
    }

    async fn fetch_data(&self, data_id: &str) -> ActionOutcome {
        match self.api.fetch_shared_data(data_id).await {
            Ok(data) => {
                if let Some(error) = data.error.as_deref() {
                    tracing::warn!(data_id, error, "fetch data: blob reports an error");
                }
                ActionOutcome::OpenDetail {
                    detail: DetailView::for_shared_data(&data, &self.settings.base_url),
                }
            }
            Err(err) => {
                tracing::warn!(%err, data_id, "fetch data: failed");
                ActionOutcome::Unchanged
            }
        }
    }

    async fn retry(&self, owner: &RawMessage) -> ActionOutcome {
        if !self.confirm.confirm(RETRY_CONFIRM_PROMPT) {
            return ActionOutcome::Declined;
        }
        self.send_as_operator(retry_content(owner), "retry").await
    }

    async fn send_as_operator(&self, content: String, what: &'static str) -> ActionOutcome {
        let request = SendMessageRequest {
            channel_id: self.settings.channel_id.clone(),
            content,
            sender_id: None,
            sender_name: self.settings.operator_name.clone(),
        };
        match self.api.send_message(&request).await {
            Ok(ack) => {
                tracing::info!(what, channel = %request.channel_id, "message sent");
                ActionOutcome::Sent { ack }
            }
            Err(err) => {
                tracing::warn!(%err, what, channel = %request.channel_id, "message send failed");
                ActionOutcome::Unchanged
            }
        }
    }

    async fn cancel_task(&self, participant: &Participant) -> ActionOutcome {
        if !participant.is_task_bot() {
            tracing::debug!(participant = %participant.id, kind = %participant.kind, "cancel: no actions for participant");
            return ActionOutcome::Unchanged;
        }
        let request = ControlCommandRequest {
            target_id: participant.id.clone(),
            command: ControlCommand::Cancel,
        };
        if let Err(err) = self
            .api
            .send_control_command(&self.settings.channel_id, &request)
            .await
        {
            tracing::warn!(%err, participant = %participant.id, "cancel: control command failed");
            return ActionOutcome::Unchanged;
        }
        tracing::info!(participant = %participant.name, "cancel command sent");

        let notice = SendMessageRequest {
            channel_id: self.settings.channel_id.clone(),
            content: format!("{} task has been cancelled", participant.name),
            sender_id: Some(SYSTEM_SENDER_ID.to_string()),
            sender_name: SYSTEM_SENDER_NAME.to_string(),
        };
        match self.api.send_message(&notice).await {
            Ok(ack) => ActionOutcome::Sent { ack },
            Err(err) => {
                // The command itself went through.
                tracing::warn!(%err, "cancel: channel notice failed");
                ActionOutcome::Sent {
                    ack: SendAck::default(),
                }
            }
        }
    }
}
