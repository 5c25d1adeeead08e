use super::record::{Classification, ScreeningDecision};
use regex::Regex;
use std::sync::LazyLock;

// Braces around the first two values are optional and may repeat; the last field runs to end of text.
static SCREENING_REPLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)Reason for exclusion:\s*\{*([^}]*)\}*\s*Final decision:\s*\{*(Include|Exclude)\}*\s*Reason for decision:\s*(.*)",
    )
    .unwrap()
});

/// Turns a free-text completion into a [`Classification`].
pub trait ReplyParser: Send + Sync {
    fn parse(&self, reply: &str) -> Classification;
}

/// Parses replies following the three-field answer template:
///
/// ```text
/// Reason for exclusion: {3}
/// Final decision: {Exclude}
/// Reason for decision: retracted in 2020
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateReplyParser;

impl ReplyParser for TemplateReplyParser {
    fn parse(&self, reply: &str) -> Classification {
        parse_screening_reply(reply)
    }
}

/// Replies that do not match the template yield [`Classification::not_formatted`].
pub fn parse_screening_reply(reply: &str) -> Classification {
    let Some(caps) = SCREENING_REPLY.captures(reply) else {
        return Classification::not_formatted();
    };
    let decision = match ScreeningDecision::from_label(&caps[2]) {
        Some(decision) => decision,
        None => return Classification::not_formatted(),
    };
    Classification::new(caps[1].trim(), decision, caps[3].trim())
}
