// External Modules
extern crate pest;
#[macro_use]
extern crate pest_derive;
#[macro_use]
extern crate simple_error;
extern crate safer_ffi;

use safer_ffi::prelude::*;

use compiler::Compiler;

// Internal Modules
mod compiler;

// Compiler types to use
type PARSER = compiler::PestGibberishParser;
type ANALYSER = compiler::GibberishSemanticAnalyser;
type GENERATOR = compiler::MipsCodeGenerator;

/// Compiler response describes the result of one compilation attempt.
#[derive_ReprC]
#[repr(C)]
pub struct CompilerResponse {
    /// Assembly text is a null-terminated string with the generated MIPS
    /// program. Empty when the compilation failed.
    assembly_text: char_p::Box, // C Repr: char *

    /// Diagnostics text is a null-terminated string holding the collected
    /// diagnostics, one `<line>:<col>: <message>` per line. Empty when
    /// the compilation succeeded.
    diagnostics_text: char_p::Box, // C Repr: char *

    /// True when assembly_text holds a complete program.
    compiled_ok: bool,
}

/// Compiler request describes the content needed to attempt a compilation.
#[derive_ReprC]
#[repr(C)]
pub struct CompilerRequest {
    /// Code text is a null-terminated string with Gibberish source code.
    code_text: char_p::Box, // C repr: char *
}

/// Compile attempts to compile a CompilerRequest into MIPS assembly text.
/// The memory for the compiler response is allocated on call, it is then
/// the responsibility of the caller to free this memory via
/// free_compile_response.
#[ffi_export]
pub fn compile(request: &CompilerRequest) -> CompilerResponse {
    let compiler: Compiler<PARSER, ANALYSER, GENERATOR> = Compiler::default();

    match compiler.compile_str(request.code_text.to_str()) {
        Ok(assembly) => CompilerResponse {
            assembly_text: assembly.try_into().unwrap(),
            diagnostics_text: String::new().try_into().unwrap(),
            compiled_ok: true,
        },
        Err(why) => CompilerResponse {
            assembly_text: String::new().try_into().unwrap(),
            diagnostics_text: why.to_string().try_into().unwrap(),
            compiled_ok: false,
        },
    }
}

/// Frees a compiler response returned via the API
/// Calling the function is a requirement after using a response.
#[ffi_export]
pub fn free_compile_response(response: CompilerResponse) {
    drop(response.assembly_text);
    drop(response.diagnostics_text);
}

// Header generator
// To generate call:
// $ cargo test --features c-headers -- generate_headers
#[safer_ffi::cfg_headers]
#[test]
fn generate_headers() -> std::io::Result<()> {
    safer_ffi::headers::builder()
        .to_file("include/gibberish_compiler.h")?
        .generate()
}
