use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SYSTEM_SENDER_ID: &str = "system";
pub const SYSTEM_SENDER_NAME: &str = "System";
pub const DEFAULT_OPERATOR_NAME: &str = "Admin";
pub const SERVER_SENDER_TYPE: &str = "server";
pub const TASK_BOT_PARTICIPANT_TYPE: &str = "task_bot";

/// A chat message as delivered by the channel transport.
///
/// Immutable once received; the markup core only ever reads `content`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    pub channel_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_type: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Seconds since the unix epoch.
    pub timestamp: i64,
}

impl RawMessage {
    pub fn is_system(&self) -> bool {
        self.sender_id == SYSTEM_SENDER_ID
    }

    pub fn is_from_server(&self) -> bool {
        self.sender_type == SERVER_SENDER_TYPE
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "window_hwnd")]
    pub window_hwnd: Option<u64>,
}

impl Participant {
    pub fn is_task_bot(&self) -> bool {
        self.kind == TASK_BOT_PARTICIPANT_TYPE
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedDataKind {
    String,
    Image,
    Document,
    Json,
}

impl SharedDataKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SharedDataKind::String => "string",
            SharedDataKind::Image => "image",
            SharedDataKind::Document => "document",
            SharedDataKind::Json => "json",
        }
    }
}

impl std::fmt::Display for SharedDataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blob stored by the backend and referenced from chat as `[id: <token>]`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SharedData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SharedDataKind,
    pub content: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Envelope returned by `GET /api/data/{id}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SharedDataResponse {
    pub data: SharedData,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub channel_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub sender_name: String,
}

/// Whatever the backend answers to a send; the dashboard only logs it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SendAck(pub Value);

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Cancel,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlCommandRequest {
    pub target_id: String,
    pub command: ControlCommand,
}

pub fn send_message_path(channel_id: &str) -> String {
    format!("/api/channels/{channel_id}/sendMessage")
}

pub fn control_command_path(channel_id: &str) -> String {
    format!("/api/channels/{channel_id}/controlCommand")
}

pub fn shared_data_path(data_id: &str) -> String {
    format!("/api/data/{data_id}")
}
