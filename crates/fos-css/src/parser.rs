//! CSS Parser using lightningcss
//!
//! Parses declaration blocks (inline `style` attributes) into our
//! internal representation.

use crate::{CssError, Declaration};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::stylesheet::ParserOptions;

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a declaration list such as `display: none; opacity: .5`
    ///
    /// Invalid declarations are dropped, the rest are kept in source
    /// order with important declarations last.
    pub fn parse_declarations(&self, css: &str) -> Result<Vec<Declaration>, CssError> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };

        let block = DeclarationBlock::parse_string(css, options)
            .map_err(|e| CssError::ParseError {
                line: 0,
                message: format!("{:?}", e),
            })?;

        let normal = block.declarations.iter().map(|p| (p, false));
        let important = block.important_declarations.iter().map(|p| (p, true));

        Ok(normal
            .chain(important)
            .filter_map(|(property, important)| self.convert_declaration(property, important))
            .collect())
    }

    fn convert_declaration(&self, property: &Property, important: bool) -> Option<Declaration> {
        let name = property.property_id().name().to_ascii_lowercase();

        match property.value_to_css_string(PrinterOptions::default()) {
            Ok(value) => Some(Declaration { property: name, value, important }),
            Err(e) => {
                tracing::warn!(property = %name, error = ?e, "Dropping unserializable declaration");
                None
            }
        }
    }
}
