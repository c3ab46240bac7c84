use hub_protocol::RawMessage;
use serde::Serialize;
use serde_json::Value;

use super::extract::{placeholder, PayloadMap};
use super::tokenize::{Span, RETRY_MARKER};

/// One independently renderable piece of a chat message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text {
        value: String,
    },
    JsonRef {
        id: String,
        payload: Value,
    },
    DataRef {
        data_id: String,
    },
    Retry {
        owner_message: RawMessage,
    },
}

impl Segment {
    pub fn text(value: impl Into<String>) -> Self {
        Segment::Text {
            value: value.into(),
        }
    }

    /// The markup this segment stands for in the substituted text.
    pub fn markup(&self) -> String {
        match self {
            Segment::Text { value } => value.clone(),
            Segment::JsonRef { id, .. } => placeholder(id),
            Segment::DataRef { data_id } => format!("[id: {data_id}]"),
            Segment::Retry { .. } => RETRY_MARKER.to_string(),
        }
    }
}

/// Resolve tokenizer spans into segments, keeping their order.
///
/// A placeholder whose id has no payload, or a `[Retry]` with no owning
/// message, degrades to literal text instead of failing the message.
pub fn build(
    spans: &[Span<'_>],
    payloads: &PayloadMap,
    owner: Option<&RawMessage>,
) -> Vec<Segment> {
    spans
        .iter()
        .map(|span| match *span {
            Span::Text(value) => Segment::text(value),
            Span::JsonView { id } => match payloads.get(id) {
                Some(payload) => Segment::JsonRef {
                    id: id.to_string(),
                    payload: payload.clone(),
                },
                None => {
                    tracing::debug!(id, "markup: json placeholder without payload");
                    Segment::text(placeholder(id))
                }
            },
            Span::DataRef { data_id } => Segment::DataRef {
                data_id: data_id.to_string(),
            },
            Span::Retry => match owner {
                Some(message) => Segment::Retry {
                    owner_message: message.clone(),
                },
                None => Segment::text(RETRY_MARKER),
            },
        })
        .collect()
}

pub fn to_markup(segments: &[Segment]) -> String {
    segments.iter().map(Segment::markup).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tokenize::{tokenize, TokenizeMode};
    use serde_json::json;

    fn owner() -> RawMessage {
        RawMessage {
            id: "m1".into(),
            channel_id: "general".into(),
            sender_id: "geo_bot".into(),
            sender_name: "Geo Bot".into(),
            sender_type: "bot".into(),
            content: "failed [Retry]".into(),
            tags: vec![],
            timestamp: 0,
        }
    }

    #[test]
    fn resolves_payloads_and_keeps_order() {
        let mut payloads = PayloadMap::new();
        payloads.insert("inline-json-0".into(), json!({"x": 2}));
        let text = r#"a [json-view id="inline-json-0"] b [Retry]"#;
        let spans = tokenize(text, TokenizeMode::Standard);
        let owner = owner();
        let segments = build(&spans, &payloads, Some(&owner));

        assert_eq!(
            segments,
            vec![
                Segment::text("a "),
                Segment::JsonRef {
                    id: "inline-json-0".into(),
                    payload: json!({"x": 2}),
                },
                Segment::text(" b "),
                Segment::Retry {
                    owner_message: owner.clone(),
                },
            ]
        );
        assert_eq!(to_markup(&segments), text);
    }

    #[test]
    fn unknown_placeholder_degrades_to_literal_text() {
        let text = r#"[json-view id="made-up"]"#;
        let spans = tokenize(text, TokenizeMode::Standard);
        let segments = build(&spans, &PayloadMap::new(), None);
        assert_eq!(segments, vec![Segment::text(text)]);
    }

    #[test]
    fn retry_without_owner_degrades_to_literal_text() {
        let spans = tokenize("oops [Retry]", TokenizeMode::Standard);
        let segments = build(&spans, &PayloadMap::new(), None);
        assert_eq!(
            segments,
            vec![Segment::text("oops "), Segment::text("[Retry]")]
        );
    }

    #[test]
    fn data_refs_serialize_back_to_reference_syntax() {
        let text = "see [id: report_17] for details";
        let spans = tokenize(text, TokenizeMode::DataRefs);
        let segments = build(&spans, &PayloadMap::new(), None);
        assert_eq!(
            segments,
            vec![
                Segment::text("see "),
                Segment::DataRef {
                    data_id: "report_17".into()
                },
                Segment::text(" for details"),
            ]
        );
        assert_eq!(to_markup(&segments), text);
    }

    #[test]
    fn segment_json_is_tagged_by_kind() {
        let seg = Segment::DataRef {
            data_id: "a".into(),
        };
        assert_eq!(
            serde_json::to_value(&seg).unwrap(),
            json!({"kind": "data_ref", "data_id": "a"})
        );
    }
}
