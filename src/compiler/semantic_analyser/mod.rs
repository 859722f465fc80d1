mod name_analysis;
mod type_checker;

use self::name_analysis::NameAnalyser;
use self::type_checker::TypeChecker;
use super::ast::{AbstractSyntaxTree, ProgramNode, SymbolTable};
use super::diagnostics::{CompileError, ErrorReporter};

/// SemanticAnalyser decorates a parsed AST into an AbstractSyntaxTree
/// ready for code generation, or fails with the diagnostics it collected.
pub trait SemanticAnalyser {
    /// Creates a default configuration of a SemanticAnalyser
    fn default() -> Self;

    /// Run the analysis passes over a parsed program.
    fn analyse(self, root: ProgramNode) -> Result<AbstractSyntaxTree, CompileError>;
}

/// GibberishSemanticAnalyser is a concrete SemanticAnalyser.
/// It runs name analysis and then type checking against one shared
/// reporter. Type checking runs even when name analysis reported errors,
/// to surface as many diagnostics as possible; unresolved identifiers
/// simply type as ERROR. Code generation is gated behind a clean run: any
/// diagnostic makes `analyse` fail with the collected list.
pub struct GibberishSemanticAnalyser {
    reporter: ErrorReporter,
}

impl SemanticAnalyser for GibberishSemanticAnalyser {
    fn default() -> Self {
        Self {
            reporter: ErrorReporter::new(),
        }
    }

    fn analyse(mut self, root: ProgramNode) -> Result<AbstractSyntaxTree, CompileError> {
        let mut root = root;
        let mut symbol_table = SymbolTable::new();

        NameAnalyser::new(&mut symbol_table, &mut self.reporter)
            .analyse_program(&mut root)
            .map_err(CompileError::Internal)?;

        TypeChecker::new(&symbol_table, &mut self.reporter).check_program(&mut root);

        if self.reporter.has_errors() {
            return Err(CompileError::Semantic(self.reporter.into_diagnostics()));
        }

        Ok(AbstractSyntaxTree::new(root, symbol_table))
    }
}

#[cfg(test)]
mod test;
