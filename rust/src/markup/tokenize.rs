use std::sync::OnceLock;

pub const RETRY_MARKER: &str = "[Retry]";

/// Which placeholder family a message is tokenized for.
///
/// A message that mentions any `[id: …]` data reference only ever gets data
/// reference links; inline JSON and `[Retry]` stay literal in that message.
/// Everything else gets JSON view and retry links but no data references.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenizeMode {
    DataRefs,
    Standard,
}

impl TokenizeMode {
    /// Decided on the original message content, before any extraction.
    pub fn select(original_content: &str) -> Self {
        if data_ref_re().is_match(original_content) {
            TokenizeMode::DataRefs
        } else {
            TokenizeMode::Standard
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Span<'a> {
    Text(&'a str),
    JsonView { id: &'a str },
    DataRef { data_id: &'a str },
    Retry,
}

fn data_ref_re() -> &'static regex::Regex {
    static DATA_REF_RE: OnceLock<regex::Regex> = OnceLock::new();
    DATA_REF_RE.get_or_init(|| {
        regex::Regex::new(r"\[id: ([A-Za-z0-9_]+)\]").expect("valid data reference regex")
    })
}

fn standard_re() -> &'static regex::Regex {
    static STANDARD_RE: OnceLock<regex::Regex> = OnceLock::new();
    STANDARD_RE.get_or_init(|| {
        regex::Regex::new(r#"\[json-view id="(?P<json>[^"]+)"\]|(?P<retry>\[Retry\])"#)
            .expect("valid placeholder regex")
    })
}

/// Split `text` into literal runs and recognised placeholders, in order.
///
/// Empty literal runs are not emitted, so concatenating the spans (with each
/// placeholder written back in its source syntax) yields `text` again.
pub fn tokenize(text: &str, mode: TokenizeMode) -> Vec<Span<'_>> {
    let re = match mode {
        TokenizeMode::DataRefs => data_ref_re(),
        TokenizeMode::Standard => standard_re(),
    };

    let mut spans = Vec::new();
    let mut last_end = 0usize;

    for caps in re.captures_iter(text) {
        let Some(full_match) = caps.get(0) else {
            continue;
        };
        let before = &text[last_end..full_match.start()];
        if !before.is_empty() {
            spans.push(Span::Text(before));
        }

        let span = match mode {
            TokenizeMode::DataRefs => match caps.get(1) {
                Some(id) => Span::DataRef {
                    data_id: id.as_str(),
                },
                None => Span::Text(full_match.as_str()),
            },
            TokenizeMode::Standard => {
                if let Some(id) = caps.name("json") {
                    Span::JsonView { id: id.as_str() }
                } else if caps.name("retry").is_some() {
                    Span::Retry
                } else {
                    Span::Text(full_match.as_str())
                }
            }
        };
        spans.push(span);
        last_end = full_match.end();
    }

    let tail = &text[last_end..];
    if !tail.is_empty() {
        spans.push(Span::Text(tail));
    }
    spans
}
