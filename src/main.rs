// External Modules
extern crate exitcode;
extern crate pest;
#[macro_use]
extern crate pest_derive;
#[macro_use]
extern crate simple_error;

// Internal Modules
mod compiler;
use compiler::{CompileError, Compiler};

// Standard Imports
use clap::Parser;

// Basic Compiler Configuration
type PARSER = compiler::PestGibberishParser;
type ANALYSER = compiler::GibberishSemanticAnalyser;
type GENERATOR = compiler::MipsCodeGenerator;

/// Command Line interface struct
/// Describes possible arguments using the clap library
#[derive(Parser)]
struct CompilerCLIOptions {
    /// Path of file to compile. Gibberish source files end in .gib
    #[clap(parse(from_os_str))]
    path: std::path::PathBuf,

    /// Path to output file, default is <path_filename>.s
    #[clap(short, long, parse(from_os_str))]
    output: Option<std::path::PathBuf>,

    // Flags

    /// Write the generated assembly to stdout instead of output
    #[clap(long, action)]
    stdout: bool,
}

impl CompilerCLIOptions {
    /// Derives default values for empty arguments that cannot be set to
    /// constants. For instance output is derived from the input file path.
    /// @return: Returns CompilerCLIOptions with modified empty arguments
    fn derive_defaults(mut self) -> Self {
        // Derive output file path from input file path if not set
        if self.output.is_none() {
            self.output = Some(self.path.with_extension("s"))
        }

        return self;
    }
}

fn main() {
    // Parse Command line arguments
    let cli_args = CompilerCLIOptions::parse().derive_defaults();

    let compiler: Compiler<PARSER, ANALYSER, GENERATOR> = Compiler::default();

    let source_str = match std::fs::read_to_string(cli_args.path.as_path()) {
        Ok(source) => source,
        Err(why) => {
            eprintln!("Couldn't read {}: {}", cli_args.path.display(), why);
            std::process::exit(exitcode::IOERR);
        }
    };

    match compiler.compile_str(source_str.as_str()) {
        Ok(assembly) => {
            if cli_args.stdout {
                print!("{}", assembly);
            } else {
                let dest_path = cli_args.output.unwrap(); // Can unwrap as output will always be derived
                if let Err(why) = std::fs::write(&dest_path, assembly.as_bytes()) {
                    eprintln!("Couldn't write to {}: {}", dest_path.display(), why);
                    std::process::exit(exitcode::IOERR);
                }
                println!("Compile success!");
            }
            std::process::exit(exitcode::OK);
        }
        Err(CompileError::Internal(why)) => {
            eprintln!("internal compiler error: {}", why);
            std::process::exit(exitcode::SOFTWARE);
        }
        Err(why) => {
            // Syntax and semantic failures render one diagnostic per line
            eprint!("{}", why);
            std::process::exit(exitcode::DATAERR);
        }
    };
}
