mod type_checker_test;

use super::{GibberishSemanticAnalyser, SemanticAnalyser};
use crate::compiler::ast::AbstractSyntaxTree;
use crate::compiler::diagnostics::{CompileError, Diagnostic};
use crate::compiler::parser::{AstParser, PestGibberishParser};

/// Run both analysis passes over a source string.
pub(crate) fn analyse(source: &str) -> Result<AbstractSyntaxTree, CompileError> {
    let root = PestGibberishParser::default()
        .parse(source)
        .expect("test source should parse");
    GibberishSemanticAnalyser::default().analyse(root)
}

/// The diagnostics a source string produces, in report order. An empty
/// vector means the source analysed cleanly.
pub(crate) fn diagnostics(source: &str) -> Vec<Diagnostic> {
    match analyse(source) {
        Ok(_) => vec![],
        Err(CompileError::Semantic(diagnostics)) => diagnostics,
        Err(other) => panic!("expected user diagnostics, got {:?}", other),
    }
}

pub(crate) fn assert_diagnostic(
    diagnostic: &Diagnostic,
    line: usize,
    col: usize,
    message: &str,
) {
    assert_eq!(
        (diagnostic.pos.line, diagnostic.pos.col, diagnostic.message.as_str()),
        (line, col, message),
        "unexpected diagnostic {:?}",
        diagnostic
    );
}
