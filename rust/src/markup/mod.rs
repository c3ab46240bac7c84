//! Inline markup pipeline for chat message content.
//!
//! Raw content goes through mode selection, `[json]` extraction (standard
//! mode only), tokenization and segment building. Every stage is a pure
//! function of its input and nothing is cached between passes.

pub mod extract;
pub mod segments;
pub mod tokenize;

use hub_protocol::RawMessage;

pub use extract::{extract, first_block, ExtractionResult, PayloadMap};
pub use segments::{build, to_markup, Segment};
pub use tokenize::{tokenize, Span, TokenizeMode};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    pub mode: TokenizeMode,
    pub extraction: ExtractionResult,
    pub segments: Vec<Segment>,
}

/// Run the whole pipeline over one message body.
///
/// `owner` is the message the content belongs to; without it `[Retry]`
/// renders as plain text.
pub fn parse_message(content: &str, owner: Option<&RawMessage>) -> ParsedMessage {
    let mode = TokenizeMode::select(content);
    let extraction = match mode {
        TokenizeMode::Standard => extract(content),
        TokenizeMode::DataRefs => ExtractionResult {
            substituted_text: content.to_string(),
            payloads: PayloadMap::new(),
        },
    };
    let spans = tokenize(&extraction.substituted_text, mode);
    let segments = build(&spans, &extraction.payloads, owner);
    ParsedMessage {
        mode,
        extraction,
        segments,
    }
}
