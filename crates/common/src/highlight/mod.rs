// Keyword highlighting for scrum output: rules, styles, and the
// line-buffered writer that applies them.

pub mod distance;
pub mod rule;
pub mod style;
pub mod writer;

pub use distance::damerau_levenshtein;
pub use rule::{parse_key, HighlightRule, MatchMode, RuleError};
pub use style::{attribute_code, Style};
pub use writer::Highlighter;
