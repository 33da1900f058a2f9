//! fOS CSS - Inline Style & Computed Values
//!
//! Parses `style` attributes and resolves the computed values of the
//! properties that decide whether an element is painted.

mod parser;
mod cascade;

pub use parser::CssParser;
pub use cascade::StyleResolver;

/// Parse the contents of a `style` attribute
pub fn parse_inline_style(css: &str) -> Result<Vec<Declaration>, CssError> {
    CssParser::new().parse_declarations(css)
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercase property name
    pub property: String,
    /// Serialized value, without `!important`
    pub value: String,
    pub important: bool,
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
