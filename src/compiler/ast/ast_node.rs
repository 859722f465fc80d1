use super::super::diagnostics::SourcePos;
use super::datatype::DataType;
use super::operators::{BinaryOperation, UnaryOperation};
use super::symbol_table::SymbolId;

/// Identifier is a named reference to a symbol: a variable, formal,
/// function, struct definition or struct field. The node carries its
/// source position for diagnostics and, once name analysis has run, a
/// handle to the resolved symbol. An identifier whose resolution failed
/// keeps a `None` link; later passes treat it as the ERROR type.
///
/// # Example:
///     int hello;
///         ^^^^^ -> Identifier
#[derive(Debug, Clone)]
pub struct IdentNode {
    pub name: String,
    pub pos: SourcePos,
    pub symbol: Option<SymbolId>,
}

impl IdentNode {
    pub fn new(name: String, pos: SourcePos) -> Self {
        IdentNode {
            name,
            pos,
            symbol: None,
        }
    }
}

/// The root of a parsed program: the global declaration list.
#[derive(Debug, Clone)]
pub struct ProgramNode {
    pub decls: Vec<DeclNode>,
}

/// Syntactic type annotations as written in declarations. These are
/// resolved into semantic DataType values during name analysis; the
/// struct form carries the identifier so the struct name can be linked to
/// its definition symbol.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum TypeSpecNode {
    INT(SourcePos),
    BOOL(SourcePos),
    VOID(SourcePos),

    /// # Example:
    ///     struct Point p;
    ///            ^^^^^ -> Struct type name
    STRUCT(IdentNode),
}

/// Declarations introduce names.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum DeclNode {
    /// Variable declaration at global scope, in a function body or in a
    /// struct body.
    ///
    /// # Example:
    ///     int count;
    ///     struct Point origin;
    VAR_DECL {
        type_spec: TypeSpecNode,
        identifier: IdentNode,
    },

    /// Function definition. The body's variable declarations come before
    /// its statements.
    ///
    /// # Example:
    ///     int add(int a, int b) {
    ///         int sum;
    ///         sum = a + b;
    ///         return sum;
    ///     }
    FN_DECL {
        return_type: TypeSpecNode,
        identifier: IdentNode,
        formals: Vec<FormalDecl>,
        body: BlockNode,
    },

    /// Struct definition. Fields are variable declarations; they are
    /// gathered into a scope owned by the struct's symbol.
    ///
    /// # Example:
    ///     struct Point {
    ///         int x;
    ///         int y;
    ///     };
    STRUCT_DECL {
        identifier: IdentNode,
        fields: Vec<DeclNode>,
    },
}

/// One formal parameter of a function definition.
///
/// # Example:
///     int add(int a, int b) { ... }
///             ^^^^^ -> Formal declaration
#[derive(Debug, Clone)]
pub struct FormalDecl {
    pub type_spec: TypeSpecNode,
    pub identifier: IdentNode,
}

/// A brace-delimited body: local declarations followed by statements.
/// Function bodies and the bodies of if/else/while/repeat share this
/// shape; each opens one scope for the declarations it contains.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub decls: Vec<DeclNode>,
    pub stmts: Vec<StmtNode>,
}

/// Statements.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum StmtNode {
    /// An assignment expression in statement position. The pushed value is
    /// discarded after evaluation.
    ///
    /// # Example:
    ///     x = y * 2;
    ASSIGN {
        assignment: ExpNode,
    },

    /// # Example:
    ///     x++;
    POST_INC {
        target: ExpNode,
    },

    /// # Example:
    ///     x--;
    POST_DEC {
        target: ExpNode,
    },

    /// Read one integer (or boolean, encoded as an integer) from standard
    /// input into a variable.
    ///
    /// # Example:
    ///     cin >> x;
    READ {
        target: ExpNode,
    },

    /// Write one value to standard output. Type checking caches the
    /// operand's resolved type so code generation knows which service to
    /// request for it.
    ///
    /// # Example:
    ///     cout << x + 1;
    ///     cout << "total: ";
    WRITE {
        expression: ExpNode,
        expression_type: Option<DataType>,
    },

    /// # Example:
    ///     if (x < 0) {
    ///         x = 0;
    ///     }
    IF {
        condition: ExpNode,
        body: BlockNode,
    },

    /// # Example:
    ///     if (x < 0) {
    ///         cout << "neg";
    ///     } else {
    ///         cout << "pos";
    ///     }
    IF_ELSE {
        condition: ExpNode,
        then_body: BlockNode,
        else_body: BlockNode,
    },

    /// # Example:
    ///     while (x < 10) {
    ///         x++;
    ///     }
    WHILE {
        condition: ExpNode,
        body: BlockNode,
    },

    /// Run a body a fixed number of times. The clause is analysed and
    /// checked but the statement has no code generator in this subset.
    ///
    /// # Example:
    ///     repeat (3) {
    ///         cout << "ho ";
    ///     }
    REPEAT {
        clause: ExpNode,
        body: BlockNode,
    },

    /// Return from the enclosing function, jumping to its single epilogue
    /// label. `pos` is the position of the return keyword itself; a
    /// missing return value is reported at (0, 0), not here.
    ///
    /// # Example:
    ///     return x + 1;
    ///     return;
    RETURN {
        expression: Option<ExpNode>,
        pos: SourcePos,
    },

    /// A function call in statement position. The pushed return value is
    /// discarded with a dummy pop.
    ///
    /// # Example:
    ///     report(x);
    CALL {
        call: ExpNode,
    },
}

/// Expressions. Every expression's code generator leaves exactly one
/// 4-byte value on the runtime stack.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum ExpNode {
    /// # Example:
    ///     x = 42;
    ///         ^^ -> Integer literal
    INT_LIT {
        value: i32,
        pos: SourcePos,
    },

    /// A string literal, stored with its surrounding quotes exactly as
    /// written so the data-section emission and literal interning are
    /// byte-faithful to the source.
    ///
    /// # Example:
    ///     cout << "hello\n";
    ///             ^^^^^^^^^ -> String literal
    STR_LIT {
        value: String,
        pos: SourcePos,
    },

    TRUE {
        pos: SourcePos,
    },

    FALSE {
        pos: SourcePos,
    },

    IDENTIFIER(IdentNode),

    /// Access of one struct field. The left side resolves first; a
    /// resolved field that is itself a struct instance exports that
    /// nested definition through `struct_def` so a chained access can
    /// continue from it. `bad_access` is sticky along one chain to stop
    /// cascaded diagnostics.
    ///
    /// # Example:
    ///     rect.corner.x = 0;
    ///     ^^^^^^^^^^^^^ -> Dot access (chained)
    DOT_ACCESS {
        lhs: Box<ExpNode>,
        field: IdentNode,
        struct_def: Option<SymbolId>,
        bad_access: bool,
    },

    /// Assignment is an expression: it stores the right value through the
    /// left side's address and yields the stored value.
    ///
    /// # Example:
    ///     x = y = 0;
    ASSIGN {
        lhs: Box<ExpNode>,
        rhs: Box<ExpNode>,
    },

    /// # Example:
    ///     add(1, 2 * 3)
    CALL {
        callee: IdentNode,
        arguments: Vec<ExpNode>,
    },

    /// # Example:
    ///     -x
    ///     !done
    UNARY_OP {
        op: UnaryOperation,
        operand: Box<ExpNode>,
    },

    /// # Example:
    ///     a + b * c
    BINARY_OP {
        op: BinaryOperation,
        lhs: Box<ExpNode>,
        rhs: Box<ExpNode>,
    },
}

impl ExpNode {
    /// The position diagnostics for this expression attach to. Binary and
    /// assignment forms use the left operand's position; the other forms
    /// use their own leftmost token.
    pub fn pos(&self) -> SourcePos {
        match self {
            ExpNode::INT_LIT { pos, .. } => *pos,
            ExpNode::STR_LIT { pos, .. } => *pos,
            ExpNode::TRUE { pos } => *pos,
            ExpNode::FALSE { pos } => *pos,
            ExpNode::IDENTIFIER(identifier) => identifier.pos,
            ExpNode::DOT_ACCESS { lhs, .. } => lhs.pos(),
            ExpNode::ASSIGN { lhs, .. } => lhs.pos(),
            ExpNode::CALL { callee, .. } => callee.pos,
            ExpNode::UNARY_OP { operand, .. } => operand.pos(),
            ExpNode::BINARY_OP { lhs, .. } => lhs.pos(),
        }
    }

    /// True for the expressions `++`/`--` can address.
    pub fn is_plain_identifier(&self) -> bool {
        matches!(self, ExpNode::IDENTIFIER(_))
    }
}
