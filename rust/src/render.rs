use chrono::{DateTime, TimeZone, Utc};
use hub_protocol::RawMessage;
use serde::Serialize;

use crate::actions::MessageAction;
use crate::bot_format::{format_bullets, RenderMode};
use crate::markup::{parse_message, Segment};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text { text: String },
    Link { label: String, action: MessageAction },
}

fn push_text(out: &mut Vec<Element>, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(Element::Text { text }) = out.last_mut() {
        text.push_str(value);
        return;
    }
    out.push(Element::Text {
        text: value.to_string(),
    });
}

fn push_bracketed_link(out: &mut Vec<Element>, label: String, action: MessageAction) {
    push_text(out, "[");
    out.push(Element::Link { label, action });
    push_text(out, "]");
}

/// Map segments to display elements; interactive segments become links
/// wrapped in literal brackets, adjacent text is merged.
pub fn render(segments: &[Segment]) -> Vec<Element> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Text { value } => push_text(&mut out, value),
            Segment::JsonRef { id, payload } => push_bracketed_link(
                &mut out,
                "JSON data".to_string(),
                MessageAction::ViewJson {
                    id: id.clone(),
                    payload: payload.clone(),
                },
            ),
            Segment::DataRef { data_id } => push_bracketed_link(
                &mut out,
                format!("Data: {data_id}"),
                MessageAction::FetchData {
                    data_id: data_id.clone(),
                },
            ),
            Segment::Retry { owner_message } => push_bracketed_link(
                &mut out,
                "Retry".to_string(),
                MessageAction::Retry {
                    owner: owner_message.clone(),
                },
            ),
        }
    }
    out
}

/// Flatten elements to what a reader sees, link labels included.
pub fn display_text(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|element| match element {
            Element::Text { text } => text.as_str(),
            Element::Link { label, .. } => label.as_str(),
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStyle {
    System,
    Server,
    Participant,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    Elements { elements: Vec<Element> },
    Bullets { heading: String, items: Vec<String> },
}

/// One chat line as the dashboard shows it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MessageView {
    pub message_id: String,
    pub style: MessageStyle,
    pub sender_label: Option<String>,
    pub body: MessageBody,
    pub footer: String,
}

impl MessageView {
    pub fn build(message: &RawMessage, bot_identities: &[String], now: DateTime<Utc>) -> Self {
        let style = if message.is_system() {
            MessageStyle::System
        } else if message.is_from_server() {
            MessageStyle::Server
        } else {
            MessageStyle::Participant
        };
        let sender_label = match style {
            MessageStyle::System => None,
            _ => Some(format!("{}:", message.sender_name)),
        };

        let body = match RenderMode::select(
            &message.sender_name,
            &message.sender_id,
            bot_identities,
        ) {
            RenderMode::Bullets => MessageBody::Bullets {
                heading: format!("{} Answer:", message.sender_name),
                items: format_bullets(&message.content),
            },
            RenderMode::Standard => {
                let parsed = parse_message(&message.content, Some(message));
                MessageBody::Elements {
                    elements: render(&parsed.segments),
                }
            }
        };

        let footer = format!(
            "{} \u{2022} {}",
            message.sender_name,
            format_relative_time(message.timestamp, now)
        );

        Self {
            message_id: message.id.clone(),
            style,
            sender_label,
            body,
            footer,
        }
    }
}

const MINUTES_IN_DAY: f64 = 1440.0;
const MINUTES_IN_MONTH: f64 = 43_200.0;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

fn distance_words(seconds: i64) -> String {
    let minutes = seconds as f64 / 60.0;
    if seconds < 30 {
        return "less than a minute".to_string();
    }
    if minutes < 44.5 {
        return plural((minutes.round() as i64).max(1), "minute");
    }
    if minutes < 89.5 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        return format!("about {}", plural((minutes / 60.0).round() as i64, "hour"));
    }
    if minutes < 2520.0 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        return plural((minutes / MINUTES_IN_DAY).round() as i64, "day");
    }
    if minutes < 2.0 * MINUTES_IN_MONTH {
        let months = (minutes / MINUTES_IN_MONTH).round() as i64;
        return format!("about {}", plural(months, "month"));
    }

    let months = (minutes / MINUTES_IN_MONTH).round() as i64;
    if months < 12 {
        return plural(months, "month");
    }
    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

/// "3 minutes ago" style wording for a unix timestamp in seconds.
pub fn format_relative_time(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(then) = Utc.timestamp_opt(timestamp, 0).single() else {
        return "unknown time".to_string();
    };
    let delta = now.signed_duration_since(then).num_seconds();
    let words = distance_words(delta.abs());
    if delta >= 0 {
        format!("{words} ago")
    } else {
        format!("in {words}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot_format::default_bot_identities;
    use serde_json::json;

    fn message(sender_id: &str, sender_name: &str, sender_type: &str, content: &str) -> RawMessage {
        RawMessage {
            id: "m1".into(),
            channel_id: "general".into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            sender_type: sender_type.into(),
            content: content.into(),
            tags: vec![],
            timestamp: 1_700_000_000,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + 120, 0).single().unwrap()
    }

    #[test]
    fn data_reference_renders_bracketed_link() {
        let parsed = parse_message("see [id: report_17] for details", None);
        let elements = render(&parsed.segments);
        assert_eq!(
            elements,
            vec![
                Element::Text {
                    text: "see [".into()
                },
                Element::Link {
                    label: "Data: report_17".into(),
                    action: MessageAction::FetchData {
                        data_id: "report_17".into()
                    },
                },
                Element::Text {
                    text: "] for details".into()
                },
            ]
        );
        assert_eq!(display_text(&elements), "see [Data: report_17] for details");
    }

    #[test]
    fn json_ref_and_retry_render_links() {
        let msg = message("geo", "Geo Bot", "bot", r#"[json]{"q":1}[/json] failed [Retry]"#);
        let parsed = parse_message(&msg.content, Some(&msg));
        let elements = render(&parsed.segments);
        assert_eq!(display_text(&elements), "[JSON data] failed [Retry]");
        let actions: Vec<&str> = elements
            .iter()
            .filter_map(|e| match e {
                Element::Link { action, .. } => Some(action.tag()),
                Element::Text { .. } => None,
            })
            .collect();
        assert_eq!(actions, vec!["ViewJson", "Retry"]);
        assert!(matches!(
            &elements[1],
            Element::Link { action: MessageAction::ViewJson { payload, .. }, .. } if *payload == json!({"q": 1})
        ));
    }

    #[test]
    fn bot_message_renders_bullets_without_markup() {
        let msg = message(
            "math_calcy",
            "Math Calcy Bot",
            "bot",
            "1. two plus two 2. equals four [Retry]",
        );
        let view = MessageView::build(&msg, &default_bot_identities(), now());
        assert_eq!(
            view.body,
            MessageBody::Bullets {
                heading: "Math Calcy Bot Answer:".into(),
                items: vec!["two plus two".into(), "equals four [Retry]".into()],
            }
        );
    }

    #[test]
    fn view_style_follows_sender() {
        let ids = default_bot_identities();
        let system = MessageView::build(&message("system", "System", "system", "hi"), &ids, now());
        assert_eq!(system.style, MessageStyle::System);
        assert_eq!(system.sender_label, None);

        let server = MessageView::build(&message("srv", "Hub", "server", "hi"), &ids, now());
        assert_eq!(server.style, MessageStyle::Server);
        assert_eq!(server.sender_label.as_deref(), Some("Hub:"));

        let user = MessageView::build(&message("admin", "Admin", "user", "hi"), &ids, now());
        assert_eq!(user.style, MessageStyle::Participant);
        assert_eq!(user.footer, "Admin \u{2022} 2 minutes ago");
    }

    #[test]
    fn relative_time_wording() {
        let base = 1_700_000_000;
        let at = |offset: i64| Utc.timestamp_opt(base + offset, 0).single().unwrap();
        assert_eq!(format_relative_time(base, at(10)), "less than a minute ago");
        assert_eq!(format_relative_time(base, at(60)), "1 minute ago");
        assert_eq!(format_relative_time(base, at(60 * 30)), "30 minutes ago");
        assert_eq!(format_relative_time(base, at(60 * 60)), "about 1 hour ago");
        assert_eq!(format_relative_time(base, at(60 * 60 * 5)), "about 5 hours ago");
        assert_eq!(format_relative_time(base, at(60 * 60 * 30)), "1 day ago");
        assert_eq!(format_relative_time(base, at(60 * 60 * 24 * 4)), "4 days ago");
        assert_eq!(
            format_relative_time(base, at(60 * 60 * 24 * 35)),
            "about 1 month ago"
        );
        assert_eq!(
            format_relative_time(base, at(60 * 60 * 24 * 365)),
            "about 1 year ago"
        );
        assert_eq!(format_relative_time(base + 600, at(0)), "in 10 minutes");
    }
}
