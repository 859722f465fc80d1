pub mod ast;
pub mod backend;
pub mod diagnostics;
pub mod parser;
pub mod semantic_analyser;

use std::error::Error;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// Interface Definitions
use self::backend::BackEndGenerator;
use self::parser::AstParser;
use self::semantic_analyser::SemanticAnalyser;

// Concrete Definitions Re-Export
pub use self::backend::MipsCodeGenerator;
pub use self::diagnostics::{CompileError, Diagnostic, InternalError};
pub use self::parser::PestGibberishParser;
pub use self::semantic_analyser::GibberishSemanticAnalyser;

/// Compiler is a simple class that holds the configuration of a
/// compilation. Compiler takes three typed parameters defining:
///  the AstParser being used,
///  the SemanticAnalyser being used,
///  and the BackEndGenerator being used.
///
/// # Compilation Diagram
/// gibberish_code -> AstParser -> AST -> SemanticAnalyser -> Annotated AST -> BackEndGenerator -> MIPS text
///
/// Name analysis and type checking both run inside the semantic analyser;
/// the generator never runs when either pass reported a diagnostic, so no
/// assembly is ever produced for an erroneous program.
pub struct Compiler<P: AstParser, A: SemanticAnalyser, G: BackEndGenerator> {
    parser: P,
    semantic_analyser: A,
    generator: G,
}

#[allow(dead_code)] // Many of the functions on compiler act as a library interface and are not used
impl<P: AstParser, A: SemanticAnalyser, G: BackEndGenerator> Compiler<P, A, G> {
    /// Default generates a default compiler configuration. Default
    /// configuration is determined by the default methods of the parser,
    /// analyser and generator.
    pub fn default() -> Self {
        Compiler {
            parser: P::default(),
            semantic_analyser: A::default(),
            generator: G::default(),
        }
    }

    /// Create new compiler using preconfigured pipeline stages.
    pub fn new(parser: P, semantic_analyser: A, generator: G) -> Self {
        Compiler {
            parser,
            semantic_analyser,
            generator,
        }
    }

    /// Compiles a string of Gibberish source into MIPS assembly text.
    pub fn compile_str(self, source: &str) -> Result<String, CompileError> {
        let root = self.parser.parse(source).map_err(CompileError::Syntax)?;
        let tree = self.semantic_analyser.analyse(root)?;
        let assembly = self
            .generator
            .generate(tree)
            .map_err(CompileError::Internal)?;

        Ok(assembly)
    }

    /// Compiles a Gibberish source file into MIPS assembly text.
    /// @return: assembly text if Ok. Otherwise an IO error from a failed
    /// read, or the compilation failure.
    pub fn compile(self, source_filename: &Path) -> Result<String, Box<dyn Error>> {
        let source_str = fs::read_to_string(source_filename)?;

        Ok(self.compile_str(source_str.as_str())?)
    }

    /// Compiles a source file and writes the assembly text into the
    /// destination file path.
    pub fn compile_and_save(
        self,
        source_filename: &Path,
        dest_filename: &Path,
    ) -> Result<(), Box<dyn Error>> {
        if source_filename == dest_filename {
            bail!(
                "output path {} would overwrite the source file",
                dest_filename.display()
            );
        }

        let assembly = self.compile(source_filename)?;

        let mut file = File::create(dest_filename)?;
        file.write_all(assembly.as_bytes())?;

        Ok(())
    }
}
