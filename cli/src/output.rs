use hub_core::{ActionOutcome, DetailBody, DetailView, Element, MessageBody, MessageView};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_view(view: &MessageView) {
    match &view.body {
        MessageBody::Elements { elements } => {
            let label = view
                .sender_label
                .as_deref()
                .map(|l| format!("{l} "))
                .unwrap_or_default();
            println!("{label}{}", hub_core::display_text(elements));
            let links: Vec<(&str, &'static str)> = elements
                .iter()
                .filter_map(|e| match e {
                    Element::Link { label, action } => Some((label.as_str(), action.tag())),
                    Element::Text { .. } => None,
                })
                .collect();
            for (i, (label, tag)) in links.iter().enumerate() {
                println!("  [{}] {label} -> {tag}", i + 1);
            }
        }
        MessageBody::Bullets { heading, items } => {
            println!("{heading}");
            for item in items {
                println!("  \u{2022} {item}");
            }
        }
    }
    println!("  {}", view.footer);
}

pub fn print_detail(detail: &DetailView) {
    println!("{} ({})", detail.title, detail.id);
    match &detail.body {
        DetailBody::Text { text } => println!("{text}"),
        DetailBody::Image { src } => println!("image: {src}"),
        DetailBody::Json { pretty } => println!("{pretty}"),
    }
    println!(
        "Type: {} \u{2022} Shared at: {}",
        detail.kind,
        detail.shared_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn print_outcome(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::OpenDetail { detail } => print_detail(detail),
        ActionOutcome::Sent { ack } => println!("sent: {}", ack.0),
        ActionOutcome::Declined => println!("declined, nothing sent"),
        ActionOutcome::Unchanged => println!("nothing changed (see log output)"),
    }
}
