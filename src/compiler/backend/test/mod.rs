mod mips_generator_test;

use crate::compiler::{
    Compiler, GibberishSemanticAnalyser, MipsCodeGenerator, PestGibberishParser,
};

/// Compile a source string all the way to assembly text.
pub(crate) fn compile(source: &str) -> String {
    let compiler: Compiler<PestGibberishParser, GibberishSemanticAnalyser, MipsCodeGenerator> =
        Compiler::default();
    compiler
        .compile_str(source)
        .expect("test source should compile")
}
