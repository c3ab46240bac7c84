use chrono::{DateTime, TimeZone, Utc};
use hub_protocol::{shared_data_path, SharedData, SharedDataKind};
use serde::Serialize;
use serde_json::Value;

pub const DETAIL_TITLE: &str = "Shared Data";

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailBody {
    Text { text: String },
    Image { src: String },
    Json { pretty: String },
}

/// The modal opened by `ViewJson` and a successful `FetchData`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub id: String,
    pub kind: SharedDataKind,
    pub body: DetailBody,
    pub shared_at: DateTime<Utc>,
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl DetailView {
    pub fn for_inline_json(id: &str, payload: &Value, now: DateTime<Utc>) -> Self {
        Self {
            title: DETAIL_TITLE.to_string(),
            id: id.to_string(),
            kind: SharedDataKind::Json,
            body: DetailBody::Json {
                pretty: pretty(payload),
            },
            shared_at: now,
        }
    }

    /// `base_url` is only used to point non-inline images back at the blob
    /// endpoint.
    pub fn for_shared_data(data: &SharedData, base_url: &str) -> Self {
        let body = match data.kind {
            SharedDataKind::Image => {
                let src = if data.content.starts_with("data:") {
                    data.content.clone()
                } else {
                    format!(
                        "{}{}",
                        base_url.trim_end_matches('/'),
                        shared_data_path(&data.id)
                    )
                };
                DetailBody::Image { src }
            }
            SharedDataKind::Json => match serde_json::from_str::<Value>(&data.content) {
                Ok(value) => DetailBody::Json {
                    pretty: pretty(&value),
                },
                Err(err) => {
                    tracing::warn!(%err, id = %data.id, "detail: json blob does not parse, showing raw text");
                    DetailBody::Text {
                        text: data.content.clone(),
                    }
                }
            },
            SharedDataKind::String | SharedDataKind::Document => DetailBody::Text {
                text: data.content.clone(),
            },
        };

        // Blob timestamps are milliseconds.
        let shared_at = Utc
            .timestamp_millis_opt(data.timestamp)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            title: DETAIL_TITLE.to_string(),
            id: data.id.clone(),
            kind: data.kind,
            body,
            shared_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blob(kind: SharedDataKind, content: &str) -> SharedData {
        SharedData {
            id: "report_17".into(),
            kind,
            content: content.into(),
            timestamp: 1_700_000_000_000,
            error: None,
        }
    }

    #[test]
    fn inline_json_is_pretty_printed() {
        let view = DetailView::for_inline_json("inline-json-0", &json!({"x": 2}), Utc::now());
        assert_eq!(view.kind, SharedDataKind::Json);
        assert_eq!(
            view.body,
            DetailBody::Json {
                pretty: "{\n  \"x\": 2\n}".into()
            }
        );
    }

    #[test]
    fn data_url_image_is_used_directly() {
        let view = DetailView::for_shared_data(
            &blob(SharedDataKind::Image, "data:image/png;base64,AAAA"),
            "http://hub.local",
        );
        assert_eq!(
            view.body,
            DetailBody::Image {
                src: "data:image/png;base64,AAAA".into()
            }
        );
    }

    #[test]
    fn stored_image_points_at_blob_endpoint() {
        let view = DetailView::for_shared_data(
            &blob(SharedDataKind::Image, "/tmp/shot.png"),
            "http://hub.local/",
        );
        assert_eq!(
            view.body,
            DetailBody::Image {
                src: "http://hub.local/api/data/report_17".into()
            }
        );
    }

    #[test]
    fn json_blob_is_reformatted_or_shown_raw() {
        let ok = DetailView::for_shared_data(&blob(SharedDataKind::Json, r#"{"a":[1]}"#), "");
        assert!(matches!(ok.body, DetailBody::Json { ref pretty } if pretty.contains("\"a\": [")));

        let raw = DetailView::for_shared_data(&blob(SharedDataKind::Json, "{nope"), "");
        assert_eq!(
            raw.body,
            DetailBody::Text {
                text: "{nope".into()
            }
        );
    }

    #[test]
    fn documents_and_strings_are_text() {
        let view = DetailView::for_shared_data(&blob(SharedDataKind::Document, "# Notes"), "");
        assert_eq!(
            view.body,
            DetailBody::Text {
                text: "# Notes".into()
            }
        );
        assert_eq!(view.shared_at.timestamp(), 1_700_000_000);
    }
}
