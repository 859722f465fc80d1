use std::error::Error;
use std::fmt;
use strum_macros::Display;

/// Source position of a token as reported by the frontend.
/// Lines and columns are 1-based; the position (0, 0) is reserved for
/// program-level diagnostics that have no anchor token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub col: usize,
}

impl SourcePos {
    pub fn new(line: usize, col: usize) -> Self {
        SourcePos { line, col }
    }

    /// Position used for program-level diagnostics such as a missing main
    /// function or a missing return value.
    pub const fn none() -> Self {
        SourcePos { line: 0, col: 0 }
    }
}

/// The fixed set of user-facing error messages.
/// The rendered strings are part of the compiler's observable behaviour and
/// are matched verbatim by the test suite, so they must not be reworded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SemanticError {
    #[strum(serialize = "Multiply declared identifier")]
    MultiplyDeclared,
    #[strum(serialize = "Non-function declared void")]
    NonFunctionVoid,
    #[strum(serialize = "Invalid name of struct type")]
    InvalidStructType,
    #[strum(serialize = "Undeclared identifier")]
    Undeclared,
    #[strum(serialize = "Dot-access of non-struct type")]
    DotAccessNonStruct,
    #[strum(serialize = "Invalid struct field name")]
    InvalidStructField,

    #[strum(serialize = "Arithmetic operator applied to non-numeric operand")]
    ArithmeticNonNumeric,
    #[strum(serialize = "Logical operator applied to non-bool operand")]
    LogicalNonBool,
    #[strum(serialize = "Relational operator applied to non-numeric operand")]
    RelationalNonNumeric,

    #[strum(serialize = "Equality operator applied to void functions")]
    EqualityVoid,
    #[strum(serialize = "Equality operator applied to functions")]
    EqualityFunctions,
    #[strum(serialize = "Equality operator applied to struct names")]
    EqualityStructNames,
    #[strum(serialize = "Equality operator applied to struct variables")]
    EqualityStructVariables,
    #[strum(serialize = "Function assignment")]
    FunctionAssignment,
    #[strum(serialize = "Struct name assignment")]
    StructNameAssignment,
    #[strum(serialize = "Struct variable assignment")]
    StructVariableAssignment,
    #[strum(serialize = "Type mismatch")]
    TypeMismatch,

    #[strum(serialize = "Non-bool expression used as an if condition")]
    NonBoolIf,
    #[strum(serialize = "Non-bool expression used as a while condition")]
    NonBoolWhile,
    #[strum(serialize = "Non-integer expression used as a repeat clause")]
    NonIntRepeat,

    #[strum(serialize = "Attempt to read a function")]
    ReadFunction,
    #[strum(serialize = "Attempt to read a struct name")]
    ReadStructName,
    #[strum(serialize = "Attempt to read a struct variable")]
    ReadStructVariable,
    #[strum(serialize = "Attempt to write a function")]
    WriteFunction,
    #[strum(serialize = "Attempt to write a struct name")]
    WriteStructName,
    #[strum(serialize = "Attempt to write a struct variable")]
    WriteStructVariable,
    #[strum(serialize = "Attempt to write void")]
    WriteVoid,

    #[strum(serialize = "Attempt to call a non-function")]
    CallNonFunction,
    #[strum(serialize = "Function call with wrong number of args")]
    WrongArgCount,
    #[strum(serialize = "Type of actual does not match type of formal")]
    ActualFormalMismatch,

    #[strum(serialize = "Return with a value in a void function")]
    ReturnInVoid,
    #[strum(serialize = "Bad return value")]
    BadReturn,
    #[strum(serialize = "Missing return value")]
    MissingReturn,

    #[strum(serialize = "No main function")]
    NoMain,

    // ++/-- are only generated for plain identifier targets, struct fields
    // have no runtime storage to increment.
    #[strum(serialize = "Increment or decrement of a struct field")]
    IncDecStructField,
}

/// A single user diagnostic. Rendered as `<line>:<col>: <message>`, one
/// line per diagnostic on standard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: SourcePos,
    pub message: String,
}

impl Diagnostic {
    pub fn new(pos: SourcePos, message: String) -> Self {
        Diagnostic { pos, message }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.pos.line, self.pos.col, self.message)
    }
}

/// ErrorReporter is the sink for user diagnostics. The passes report into
/// it and keep going; it records whether at least one fatal error occurred
/// so the driver can gate code generation. It never fails itself.
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_flagged: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter {
            diagnostics: vec![],
            error_flagged: false,
        }
    }

    /// Record one user error at a source position.
    pub fn report(&mut self, pos: SourcePos, error: SemanticError) {
        self.diagnostics.push(Diagnostic::new(pos, error.to_string()));
        self.error_flagged = true;
    }

    /// True once any fatal diagnostic has been reported.
    pub fn has_errors(&self) -> bool {
        self.error_flagged
    }

    #[allow(dead_code)] // Library interface
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Internal compiler errors. These are bugs in the compiler, not user
/// errors: they unwind to the driver through `Result` rather than being
/// reported alongside diagnostics, and they never produce an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// The scope stack was popped while empty.
    EmptyScopePop,
    /// A symbol was inserted twice at a scope level already checked absent.
    DuplicateSymbol(String),
    /// A symbol was declared with an unusable name.
    IllegalSymbolName,
    /// The AST reached code generation in a shape the passes should have
    /// rejected or decorated.
    MalformedAst(&'static str),
    /// A construct that passed analysis but has no runtime representation
    /// in this subset, e.g. a struct value in an executable position.
    UnsupportedConstruct(&'static str),
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalError::EmptyScopePop => {
                write!(f, "scope stack popped while empty")
            }
            InternalError::DuplicateSymbol(name) => {
                write!(f, "symbol '{}' inserted twice at one scope level", name)
            }
            InternalError::IllegalSymbolName => {
                write!(f, "symbol declared with an illegal name")
            }
            InternalError::MalformedAst(what) => {
                write!(f, "malformed AST: {}", what)
            }
            InternalError::UnsupportedConstruct(what) => {
                write!(f, "construct has no runtime support: {}", what)
            }
        }
    }
}

impl Error for InternalError {}

/// CompileError is the single failure type of the compilation pipeline.
/// Syntax and semantic failures carry user diagnostics; internal failures
/// carry the bug description. Displaying a syntax or semantic failure
/// renders the diagnostics one per line in the `<line>:<col>: <message>`
/// format the driver writes to standard error.
#[derive(Debug)]
pub enum CompileError {
    Syntax(Diagnostic),
    Semantic(Vec<Diagnostic>),
    Internal(InternalError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(diagnostic) => writeln!(f, "{}", diagnostic),
            CompileError::Semantic(diagnostics) => {
                for diagnostic in diagnostics {
                    writeln!(f, "{}", diagnostic)?;
                }
                Ok(())
            }
            CompileError::Internal(error) => {
                write!(f, "internal compiler error: {}", error)
            }
        }
    }
}

impl Error for CompileError {}

impl From<InternalError> for CompileError {
    fn from(error: InternalError) -> Self {
        CompileError::Internal(error)
    }
}
