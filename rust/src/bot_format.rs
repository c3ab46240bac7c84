use std::sync::OnceLock;

pub const MATH_BOT_NAME: &str = "Math Calcy Bot";
pub const MATH_BOT_ID: &str = "math_calcy";

pub fn default_bot_identities() -> Vec<String> {
    vec![MATH_BOT_NAME.to_string(), MATH_BOT_ID.to_string()]
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderMode {
    /// Content is prose split into bullet points; markup is not interpreted.
    Bullets,
    Standard,
}

impl RenderMode {
    /// `identities` holds sender names and sender ids that get bullet rendering.
    pub fn select(sender_name: &str, sender_id: &str, identities: &[String]) -> Self {
        let known = identities
            .iter()
            .any(|identity| identity == sender_name || identity == sender_id);
        if known {
            RenderMode::Bullets
        } else {
            RenderMode::Standard
        }
    }
}

fn bullet_split_re() -> &'static regex::Regex {
    static BULLET_SPLIT_RE: OnceLock<regex::Regex> = OnceLock::new();
    BULLET_SPLIT_RE
        .get_or_init(|| regex::Regex::new(r"\n|\d+\. |- ").expect("valid bullet split regex"))
}

/// Split on line breaks, `<n>. ` step markers and `- ` dash markers.
pub fn format_bullets(content: &str) -> Vec<String> {
    bullet_split_re()
        .split(content)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
