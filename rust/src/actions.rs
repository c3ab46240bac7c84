use hub_protocol::{Participant, RawMessage};
use serde::Serialize;
use serde_json::Value;

/// Something the operator can trigger from a rendered message.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MessageAction {
    // Inline markup
    ViewJson {
        id: String,
        payload: Value,
    },
    FetchData {
        data_id: String,
    },
    Retry {
        owner: RawMessage,
    },

    // Participants
    CancelTask {
        participant: Participant,
    },

    // Composer
    Send {
        content: String,
    },
}

impl MessageAction {
    /// Log-safe action tag (never includes message content).
    pub fn tag(&self) -> &'static str {
        match self {
            MessageAction::ViewJson { .. } => "ViewJson",
            MessageAction::FetchData { .. } => "FetchData",
            MessageAction::Retry { .. } => "Retry",
            MessageAction::CancelTask { .. } => "CancelTask",
            MessageAction::Send { .. } => "Send",
        }
    }
}
