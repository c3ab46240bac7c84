use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

pub const INLINE_JSON_ID_PREFIX: &str = "inline-json-";

/// Parsed `[json]` payloads keyed by the placeholder id allocated for them.
///
/// Scoped to one extraction pass; ids mean nothing outside it.
pub type PayloadMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub substituted_text: String,
    pub payloads: PayloadMap,
}

impl ExtractionResult {
    fn unchanged(content: &str) -> Self {
        Self {
            substituted_text: content.to_string(),
            payloads: PayloadMap::new(),
        }
    }
}

fn json_block_re() -> &'static regex::Regex {
    static JSON_BLOCK_RE: OnceLock<regex::Regex> = OnceLock::new();
    JSON_BLOCK_RE.get_or_init(|| {
        regex::Regex::new(r"(?s)\[json\](.*?)\[/json\]").expect("valid json block regex")
    })
}

pub fn placeholder(id: &str) -> String {
    format!("[json-view id=\"{id}\"]")
}

/// Replace every parseable `[json]…[/json]` block with a `[json-view id="…"]`
/// placeholder and collect the parsed values.
///
/// Blocks whose interior is not valid JSON stay verbatim and consume no id.
pub fn extract(content: &str) -> ExtractionResult {
    let re = json_block_re();
    if !re.is_match(content) {
        return ExtractionResult::unchanged(content);
    }

    let mut substituted = String::with_capacity(content.len());
    let mut payloads = PayloadMap::new();
    let mut last_end = 0usize;

    for caps in re.captures_iter(content) {
        let Some(full_match) = caps.get(0) else {
            continue;
        };
        let interior = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        substituted.push_str(&content[last_end..full_match.start()]);
        match serde_json::from_str::<Value>(interior) {
            Ok(value) => {
                let id = format!("{INLINE_JSON_ID_PREFIX}{}", payloads.len());
                substituted.push_str(&placeholder(&id));
                payloads.insert(id, value);
            }
            Err(err) => {
                tracing::warn!(
                    %err,
                    offset = full_match.start(),
                    "markup: inline json block does not parse, leaving it as text"
                );
                substituted.push_str(full_match.as_str());
            }
        }
        last_end = full_match.end();
    }
    substituted.push_str(&content[last_end..]);

    ExtractionResult {
        substituted_text: substituted,
        payloads,
    }
}

/// The first `[json]…[/json]` block in `content`, delimiters included.
///
/// Validity of the interior is not checked.
pub fn first_block(content: &str) -> Option<&str> {
    json_block_re().find(content).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_without_blocks_is_returned_untouched() {
        for input in ["", "plain text", "[json] never closed", "[/json][json]"] {
            let res = extract(input);
            assert_eq!(res.substituted_text, input);
            assert!(res.payloads.is_empty());
        }
    }

    #[test]
    fn single_block_becomes_placeholder() {
        let res = extract(r#"result: [json]{"x":2}[/json]"#);
        assert_eq!(
            res.substituted_text,
            r#"result: [json-view id="inline-json-0"]"#
        );
        assert_eq!(res.payloads.len(), 1);
        assert_eq!(res.payloads["inline-json-0"], json!({"x": 2}));
    }

    #[test]
    fn blocks_get_sequential_ids_left_to_right() {
        let res = extract("a [json]1[/json] b [json][true][/json] c");
        assert_eq!(
            res.substituted_text,
            r#"a [json-view id="inline-json-0"] b [json-view id="inline-json-1"] c"#
        );
        assert_eq!(res.payloads["inline-json-0"], json!(1));
        assert_eq!(res.payloads["inline-json-1"], json!([true]));
    }

    #[test]
    fn malformed_block_is_kept_and_consumes_no_id() {
        let input = r#"[json]{broken[/json] then [json]{"ok":true}[/json]"#;
        let res = extract(input);
        assert_eq!(
            res.substituted_text,
            r#"[json]{broken[/json] then [json-view id="inline-json-0"]"#
        );
        assert_eq!(res.payloads.len(), 1);
        assert_eq!(res.payloads["inline-json-0"], json!({"ok": true}));
    }

    #[test]
    fn block_interior_may_span_lines_and_is_non_greedy() {
        let input = "[json]{\n  \"a\": 1\n}[/json] mid [json]2[/json]";
        let res = extract(input);
        assert_eq!(res.payloads["inline-json-0"], json!({"a": 1}));
        assert_eq!(res.payloads["inline-json-1"], json!(2));
        assert!(res.substituted_text.contains(" mid "));
    }

    #[test]
    fn extraction_is_idempotent_on_its_output() {
        let first = extract(r#"x [json]{"k":[1,2]}[/json] y"#);
        let second = extract(&first.substituted_text);
        assert_eq!(second.substituted_text, first.substituted_text);
        assert!(second.payloads.is_empty());
    }

    #[test]
    fn repeated_calls_allocate_identical_ids() {
        let input = r#"[json]{"a":1}[/json][json]{"b":2}[/json]"#;
        assert_eq!(extract(input), extract(input));
    }

    #[test]
    fn first_block_returns_raw_match_even_when_invalid() {
        let input = "retry [json]{nope[/json] and [json]{}[/json]";
        assert_eq!(first_block(input), Some("[json]{nope[/json]"));
        assert_eq!(first_block("nothing here"), None);
    }
}
