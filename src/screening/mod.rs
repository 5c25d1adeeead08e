pub mod parser;
pub mod prompt;
pub mod record;
pub mod screener;

pub use parser::{parse_screening_reply, ReplyParser, TemplateReplyParser};
pub use prompt::{build_screening_prompt, SYSTEM_PROMPT};
pub use record::{
    ArticleRecord,
    Classification,
    ScreeningDecision,
    NOT_FORMATTED,
    NO_EVIDENCE,
    REQUIRED_COLUMNS,
    RESULT_COLUMNS,
};
pub use screener::Screener;
