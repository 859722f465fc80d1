use enum_assoc::Assoc;

/// Unary Operations are symbolic functions with one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum UnaryOperation {
    NOT,    // ! <rhs>
    NEGATE, // - <rhs>
}

/// Binary Operations are symbolic functions with two arguments.
///
/// Each non-short-circuit operation is associated with the MIPS mnemonic
/// that implements it over two popped operands. AND and OR have no
/// mnemonic, they are lowered to branches so the right operand is only
/// evaluated when it can still decide the result. `uses_lo` marks the
/// operations whose result must be fetched from the LO register with
/// `mflo` rather than written by the operation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Assoc)]
#[func(pub const fn mnemonic(&self) -> Option<&'static str>)]
#[func(pub const fn uses_lo(&self) -> bool)]
#[allow(non_camel_case_types)]
pub enum BinaryOperation {
    #[assoc(mnemonic = "add")]
    #[assoc(uses_lo = false)]
    ADD,            // <lhs> + <rhs>
    #[assoc(mnemonic = "sub")]
    #[assoc(uses_lo = false)]
    SUB,            // <lhs> - <rhs>
    #[assoc(mnemonic = "mult")]
    #[assoc(uses_lo = true)]
    MUL,            // <lhs> * <rhs>
    #[assoc(mnemonic = "div")]
    #[assoc(uses_lo = true)]
    DIV,            // <lhs> / <rhs>

    #[assoc(uses_lo = false)]
    AND,            // <lhs> && <rhs>
    #[assoc(uses_lo = false)]
    OR,             // <lhs> || <rhs>

    #[assoc(mnemonic = "seq")]
    #[assoc(uses_lo = false)]
    EQUAL,          // <lhs> == <rhs>
    #[assoc(mnemonic = "sne")]
    #[assoc(uses_lo = false)]
    NOT_EQUAL,      // <lhs> != <rhs>
    #[assoc(mnemonic = "sgt")]
    #[assoc(uses_lo = false)]
    GREATER_THAN,   // <lhs> >  <rhs>
    #[assoc(mnemonic = "slt")]
    #[assoc(uses_lo = false)]
    LESS_THAN,      // <lhs> <  <rhs>
    #[assoc(mnemonic = "sge")]
    #[assoc(uses_lo = false)]
    GREATER_EQUAL,  // <lhs> >= <rhs>
    #[assoc(mnemonic = "sle")]
    #[assoc(uses_lo = false)]
    LESS_EQUAL,     // <lhs> <= <rhs>
}

impl BinaryOperation {
    /// The operations lowered through branches instead of a mnemonic.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, BinaryOperation::AND | BinaryOperation::OR)
    }
}
