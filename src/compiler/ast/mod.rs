pub mod ast_node;
pub mod datatype;
pub mod operators;
pub mod symbol_table;

pub use self::{
    ast_node::{
        BlockNode, DeclNode, ExpNode, FormalDecl, IdentNode, ProgramNode, StmtNode, TypeSpecNode,
    },
    datatype::DataType,
    operators::{BinaryOperation, UnaryOperation},
    symbol_table::SymbolTable,
};

/// Intermediate Representation of the compiler model.
/// The tree is the parsed program after both analysis passes: identifier
/// nodes hold their symbol handles and write statements their cached
/// operand types. The symbol table travels with the tree because the
/// handles stored in the nodes are only meaningful against its arena.
pub struct AbstractSyntaxTree {
    root: ProgramNode,
    symbol_table: SymbolTable,
}

impl AbstractSyntaxTree {
    pub fn new(root: ProgramNode, symbol_table: SymbolTable) -> Self {
        Self { root, symbol_table }
    }

    pub fn root(&self) -> &ProgramNode {
        &self.root
    }

    /// Return cloned copy of symbol table
    pub fn get_symbol_table(&self) -> SymbolTable {
        self.symbol_table.clone()
    }

    /// Convert the tree into its root node
    pub fn into_root(self) -> ProgramNode {
        self.root
    }
}
