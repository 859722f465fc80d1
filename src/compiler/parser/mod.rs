use super::ast::ProgramNode;
use super::diagnostics::Diagnostic;

pub mod gibberish_pest_parser;

/// Parser handles interpretation of high-level tokens into the
/// intermediate representation. Put another way the parser turns a source
/// string into an abstract syntax tree.
pub trait AstParser {
    /// Creates a default configuration of an AstParser
    fn default() -> Self;

    /// Parse a source string into an Abstract Syntax Tree root.
    /// A malformed source yields one positioned syntax diagnostic.
    fn parse(self, source: &str) -> Result<ProgramNode, Diagnostic>;
}

// Concrete Definition Export
pub use self::gibberish_pest_parser::PestGibberishParser;

#[cfg(test)]
mod test;
