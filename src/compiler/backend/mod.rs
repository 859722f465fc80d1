mod mips_builder;
mod mips_generator;

use super::ast::AbstractSyntaxTree;
use super::diagnostics::InternalError;

// Abstract Definitions

/// BackEndGenerator takes an AbstractSyntaxTree and generates the target
/// assembly text. It only runs over trees that passed both analysis
/// passes; the failures it can produce are internal compiler errors, not
/// user diagnostics.
pub trait BackEndGenerator {
    /// Generate default generator configuration
    fn default() -> Self;

    /// Generate assembly text from an abstract syntax tree
    fn generate(self, tree: AbstractSyntaxTree) -> Result<String, InternalError>;
}

// Concrete Definition Export
pub use self::mips_generator::MipsCodeGenerator;

#[cfg(test)]
mod test;
