use super::BackEndGenerator;
use super::mips_builder::{MipsBuilder, Register, Syscall};

use super::super::ast::{
    AbstractSyntaxTree, BinaryOperation, BlockNode, DataType, DeclNode, ExpNode, IdentNode,
    ProgramNode, StmtNode, UnaryOperation,
};
use super::super::ast::symbol_table::{Storage, Symbol, SymbolTable};
use super::super::diagnostics::InternalError;

/// MipsCodeGenerator is a Backend for Gibberish.
/// It generates MIPS assembly text from an analysed Abstract Syntax Tree.
///
/// # Implementation Details
///   + Expression evaluation follows a stack-machine convention: every
///     expression's generator leaves exactly one 4-byte value on the
///     runtime stack, statements pop what they consume.
///
/// # Stack Frame Structure
/// high addr   FUNC PARAMETER 0        <- FP
///             FUNC PARAMETER 1
///             ...
///             SAVED RA                <- FP - param_size
///             SAVED OLD FP            <- FP - param_size - 4
///             LOCAL VAR 0
///             LOCAL VAR 1
///             ...
/// low addr    ANONYMOUS VALUES        <- SP
///
/// # Key
///   + FUNC PARAMETER: pushed by the caller in source order, addressed at
///     offsets 0, -4, -8, ... from FP.
///   + SAVED RA / OLD FP: pushed by the prologue; the epilogue restores
///     both and rewinds SP to FP, popping the arguments with the frame.
///   + LOCAL VAR: one 4-byte slot per declaration, reserved by the
///     prologue.
///   + ANONYMOUS VALUES: temporary computation values, e.g. for the
///     sequence push 4, push 5, add.
pub struct MipsCodeGenerator {
    builder: MipsBuilder,
    table: SymbolTable,

    current_exit_label: String,
    in_main: bool,
}

impl BackEndGenerator for MipsCodeGenerator {
    /// Creates a default configuration of MipsCodeGenerator
    fn default() -> Self {
        Self {
            builder: MipsBuilder::new(),
            table: SymbolTable::new(),
            current_exit_label: String::new(),
            in_main: false,
        }
    }

    /// Generates MIPS assembly text from an Abstract Syntax Tree
    fn generate(mut self, tree: AbstractSyntaxTree) -> Result<String, InternalError> {
        self.table = tree.get_symbol_table();
        let root: ProgramNode = tree.into_root();

        for decl in &root.decls {
            match decl {
                DeclNode::VAR_DECL { identifier, .. } => self.generate_global(identifier)?,
                DeclNode::FN_DECL {
                    identifier, body, ..
                } => self.generate_function(identifier, body)?,
                // Struct definitions have no runtime representation.
                DeclNode::STRUCT_DECL { .. } => {}
            }
        }

        Ok(self.builder.finalize())
    }
}

impl MipsCodeGenerator {
    fn linked_symbol(&self, identifier: &IdentNode) -> Result<Symbol, InternalError> {
        match identifier.symbol {
            Some(id) => Ok(self.table.symbol(id).clone()),
            None => Err(InternalError::MalformedAst(
                "identifier without a symbol link reached code generation",
            )),
        }
    }

    /// Reserve data-section space for one global. Struct instances get no
    /// runtime storage in this subset.
    fn generate_global(&mut self, identifier: &IdentNode) -> Result<(), InternalError> {
        let symbol = self.linked_symbol(identifier)?;
        if !symbol.datatype().is_struct() {
            self.builder.add_global(symbol.name());
        }
        Ok(())
    }

    fn generate_function(
        &mut self,
        identifier: &IdentNode,
        body: &BlockNode,
    ) -> Result<(), InternalError> {
        let symbol = self.linked_symbol(identifier)?;
        let (param_size, local_size) = symbol.frame_sizes();
        let name = symbol.name().to_string();

        self.in_main = name == "main";
        self.current_exit_label = format!("_{}_Exit", name);

        self.builder.comment(&format!("FN {} START", name));
        if self.in_main {
            self.builder.directive(".globl main");
            self.builder.set_label("main");
        }
        self.builder.set_label(&format!("_{}", name));

        // Prologue: save RA and the caller's FP, then raise FP to the
        // first argument and drop SP past the local slots.
        self.builder.gen_push(Register::RA);
        self.builder.gen_push(Register::FP);
        self.builder.emit(
            "addu",
            format!("{}, {}, {}", Register::FP, Register::SP, param_size + 8),
        );
        if local_size > 0 {
            self.builder.emit(
                "subu",
                format!("{}, {}, {}", Register::SP, Register::SP, local_size),
            );
        }

        self.generate_block(body)?;

        // Epilogue: every return jumps here, the body falls through.
        let exit_label = self.current_exit_label.clone();
        self.builder.set_label(&exit_label);
        self.builder
            .emit_indexed("lw", Register::RA, -param_size, Register::FP);
        self.builder
            .emit("move", format!("{}, {}", Register::T0, Register::FP));
        self.builder
            .emit_indexed("lw", Register::FP, -param_size - 4, Register::FP);
        self.builder
            .emit("move", format!("{}, {}", Register::SP, Register::T0));
        if self.in_main {
            self.builder.gen_syscall(Syscall::EXIT);
        } else {
            self.builder.emit("jr", Register::RA.to_string());
        }
        self.builder.comment(&format!("FN {} END", name));

        Ok(())
    }

    /// Local declarations produce no code, their slots were reserved by
    /// the prologue.
    fn generate_block(&mut self, block: &BlockNode) -> Result<(), InternalError> {
        for stmt in &block.stmts {
            self.generate_stmt(stmt)?;
        }
        Ok(())
    }

    fn generate_stmt(&mut self, stmt: &StmtNode) -> Result<(), InternalError> {
        match stmt {
            StmtNode::ASSIGN { assignment } => {
                self.generate_exp(assignment)?;
                self.builder.gen_pop(Register::T0);
                Ok(())
            }
            StmtNode::POST_INC { target } => self.generate_post_op(target, "add"),
            StmtNode::POST_DEC { target } => self.generate_post_op(target, "sub"),
            StmtNode::READ { target } => self.generate_read_stmt(target),
            StmtNode::WRITE {
                expression,
                expression_type,
            } => self.generate_write_stmt(expression, expression_type),
            StmtNode::IF { condition, body } => self.generate_if_stmt(condition, body),
            StmtNode::IF_ELSE {
                condition,
                then_body,
                else_body,
            } => self.generate_if_else_stmt(condition, then_body, else_body),
            StmtNode::WHILE { condition, body } => self.generate_while_stmt(condition, body),
            // repeat has no code generator in this subset.
            StmtNode::REPEAT { .. } => Ok(()),
            StmtNode::RETURN { expression, .. } => self.generate_return_stmt(expression),
            StmtNode::CALL { call } => {
                self.generate_exp(call)?;
                // Dummy pop discards the pushed return value.
                self.builder.gen_pop(Register::T0);
                Ok(())
            }
        }
    }

    /// ++/-- on a plain variable: load the value, rewrite it through the
    /// variable's address.
    fn generate_post_op(&mut self, target: &ExpNode, op: &str) -> Result<(), InternalError> {
        self.generate_exp(target)?;
        self.generate_addr(target)?;
        self.builder.gen_pop(Register::T0);
        self.builder.gen_pop(Register::T1);
        self.builder
            .emit(op, format!("{}, {}, 1", Register::T1, Register::T1));
        self.builder
            .emit_indexed("sw", Register::T1, 0, Register::T0);
        Ok(())
    }

    fn generate_read_stmt(&mut self, target: &ExpNode) -> Result<(), InternalError> {
        self.builder.comment("READ");
        self.builder.gen_syscall(Syscall::READ_INT);
        self.generate_addr(target)?;
        self.builder.gen_pop(Register::T0);
        self.builder
            .emit_indexed("sw", Register::V0, 0, Register::T0);
        Ok(())
    }

    fn generate_write_stmt(
        &mut self,
        expression: &ExpNode,
        expression_type: &Option<DataType>,
    ) -> Result<(), InternalError> {
        self.builder.comment("WRITE");
        self.generate_exp(expression)?;
        self.builder.gen_pop(Register::A0);

        match expression_type {
            Some(DataType::STRING) => self.builder.gen_syscall(Syscall::PRINT_STRING),
            Some(_) => self.builder.gen_syscall(Syscall::PRINT_INT),
            None => {
                return Err(InternalError::MalformedAst(
                    "write statement with no cached operand type",
                ))
            }
        }
        Ok(())
    }

    fn generate_if_stmt(
        &mut self,
        condition: &ExpNode,
        body: &BlockNode,
    ) -> Result<(), InternalError> {
        let then_label = self.builder.create_label();
        let done_label = self.builder.create_label();

        self.builder.comment("IF CONDITION");
        self.generate_jump_code(condition, &then_label, &done_label)?;

        self.builder.comment("IF BODY");
        self.builder.set_label(&then_label);
        self.generate_block(body)?;
        self.builder.set_label(&done_label);
        self.builder.comment("IF END");
        Ok(())
    }

    fn generate_if_else_stmt(
        &mut self,
        condition: &ExpNode,
        then_body: &BlockNode,
        else_body: &BlockNode,
    ) -> Result<(), InternalError> {
        let then_label = self.builder.create_label();
        let else_label = self.builder.create_label();
        let done_label = self.builder.create_label();

        self.builder.comment("IF CONDITION");
        self.generate_jump_code(condition, &then_label, &else_label)?;

        self.builder.comment("IF BODY");
        self.builder.set_label(&then_label);
        self.generate_block(then_body)?;
        self.builder.emit("j", done_label.clone());

        self.builder.comment("ELSE BODY");
        self.builder.set_label(&else_label);
        self.generate_block(else_body)?;
        self.builder.set_label(&done_label);
        self.builder.comment("IF END");
        Ok(())
    }

    fn generate_while_stmt(
        &mut self,
        condition: &ExpNode,
        body: &BlockNode,
    ) -> Result<(), InternalError> {
        let entry_label = self.builder.create_label();
        let body_label = self.builder.create_label();
        let done_label = self.builder.create_label();

        self.builder.comment("WHILE CONDITION");
        self.builder.set_label(&entry_label);
        self.generate_jump_code(condition, &body_label, &done_label)?;

        self.builder.comment("WHILE BODY");
        self.builder.set_label(&body_label);
        self.generate_block(body)?;
        self.builder.emit("j", entry_label.clone());

        self.builder.set_label(&done_label);
        self.builder.comment("WHILE END");
        Ok(())
    }

    fn generate_return_stmt(
        &mut self,
        expression: &Option<ExpNode>,
    ) -> Result<(), InternalError> {
        if let Some(expression) = expression {
            self.generate_exp(expression)?;
            self.builder.gen_pop(Register::V0);
        }
        self.builder.emit("j", self.current_exit_label.clone());
        Ok(())
    }

    /// Generate one expression; on return exactly one new 4-byte value
    /// sits on the runtime stack.
    fn generate_exp(&mut self, exp: &ExpNode) -> Result<(), InternalError> {
        match exp {
            ExpNode::INT_LIT { value, .. } => {
                self.builder
                    .emit("li", format!("{}, {}", Register::T0, value));
                self.builder.gen_push(Register::T0);
                Ok(())
            }
            ExpNode::STR_LIT { value, .. } => {
                let label = self.builder.intern_string(value);
                self.builder
                    .emit("la", format!("{}, {}", Register::T0, label));
                self.builder.gen_push(Register::T0);
                Ok(())
            }
            ExpNode::TRUE { .. } => {
                self.builder.emit("li", format!("{}, 1", Register::T0));
                self.builder.gen_push(Register::T0);
                Ok(())
            }
            ExpNode::FALSE { .. } => {
                self.builder.emit("li", format!("{}, 0", Register::T0));
                self.builder.gen_push(Register::T0);
                Ok(())
            }
            ExpNode::IDENTIFIER(identifier) => self.generate_identifier_value(identifier),
            ExpNode::DOT_ACCESS { .. } => Err(InternalError::UnsupportedConstruct(
                "struct field access at runtime",
            )),
            ExpNode::ASSIGN { lhs, rhs } => self.generate_assignment(lhs, rhs),
            ExpNode::CALL { callee, arguments } => self.generate_call(callee, arguments),
            ExpNode::UNARY_OP { op, operand } => self.generate_unary_op(*op, operand),
            ExpNode::BINARY_OP { op, lhs, rhs } => self.generate_binary_op(*op, lhs, rhs),
        }
    }

    /// Push the value of a variable: globals load through their label,
    /// locals and formals through their frame offset.
    fn generate_identifier_value(&mut self, identifier: &IdentNode) -> Result<(), InternalError> {
        let symbol = self.linked_symbol(identifier)?;
        match symbol.storage() {
            Some(Storage::GLOBAL) => {
                self.builder
                    .emit("lw", format!("{}, _{}", Register::T0, symbol.name()));
            }
            Some(Storage::LOCAL) | Some(Storage::FORMAL) => {
                self.builder
                    .emit_indexed("lw", Register::T0, symbol.offset(), Register::FP);
            }
            None => {
                return Err(InternalError::UnsupportedConstruct(
                    "function or struct name in value position",
                ))
            }
        }
        self.builder.gen_push(Register::T0);
        Ok(())
    }

    /// Push the address of an assignable location.
    fn generate_addr(&mut self, target: &ExpNode) -> Result<(), InternalError> {
        match target {
            ExpNode::IDENTIFIER(identifier) => {
                let symbol = self.linked_symbol(identifier)?;
                match symbol.storage() {
                    Some(Storage::GLOBAL) => {
                        self.builder
                            .emit("la", format!("{}, _{}", Register::T0, symbol.name()));
                    }
                    Some(Storage::LOCAL) | Some(Storage::FORMAL) => {
                        self.builder.emit(
                            "la",
                            format!("{}, {}({})", Register::T0, symbol.offset(), Register::FP),
                        );
                    }
                    None => {
                        return Err(InternalError::UnsupportedConstruct(
                            "function or struct name in address position",
                        ))
                    }
                }
                self.builder.gen_push(Register::T0);
                Ok(())
            }
            ExpNode::DOT_ACCESS { .. } => Err(InternalError::UnsupportedConstruct(
                "struct field access at runtime",
            )),
            _ => Err(InternalError::MalformedAst(
                "address of a non-assignable expression",
            )),
        }
    }

    /// Assignment is an expression: evaluate the right side, store it
    /// through the left side's address, and leave the stored value pushed.
    fn generate_assignment(&mut self, lhs: &ExpNode, rhs: &ExpNode) -> Result<(), InternalError> {
        self.generate_exp(rhs)?;
        self.generate_addr(lhs)?;
        self.builder.gen_pop(Register::T0);
        self.builder.gen_pop(Register::T1);
        self.builder
            .emit_indexed("sw", Register::T1, 0, Register::T0);
        self.builder.gen_push(Register::T1);
        Ok(())
    }

    /// Arguments are pushed left to right, each as one 4-byte slot; the
    /// callee's epilogue pops them with the frame. The return value is
    /// pushed as the expression result.
    fn generate_call(
        &mut self,
        callee: &IdentNode,
        arguments: &[ExpNode],
    ) -> Result<(), InternalError> {
        self.builder.comment(&format!("CALL {}", callee.name));
        for argument in arguments {
            self.generate_exp(argument)?;
        }
        self.builder.emit("jal", format!("_{}", callee.name));
        self.builder.gen_push(Register::V0);
        Ok(())
    }

    fn generate_unary_op(
        &mut self,
        op: UnaryOperation,
        operand: &ExpNode,
    ) -> Result<(), InternalError> {
        self.generate_exp(operand)?;
        self.builder.gen_pop(Register::T0);
        match op {
            UnaryOperation::NEGATE => {
                self.builder
                    .emit("neg", format!("{}, {}", Register::T0, Register::T0));
            }
            UnaryOperation::NOT => {
                self.builder
                    .emit("xori", format!("{}, {}, 1", Register::T0, Register::T0));
            }
        }
        self.builder.gen_push(Register::T0);
        Ok(())
    }

    fn generate_binary_op(
        &mut self,
        op: BinaryOperation,
        lhs: &ExpNode,
        rhs: &ExpNode,
    ) -> Result<(), InternalError> {
        if op.is_short_circuit() {
            return self.generate_short_circuit_op(op, lhs, rhs);
        }

        self.generate_exp(lhs)?;
        self.generate_exp(rhs)?;
        self.builder.gen_pop(Register::T1);
        self.builder.gen_pop(Register::T0);

        let mnemonic = op.mnemonic().unwrap();
        if op.uses_lo() {
            self.builder
                .emit(mnemonic, format!("{}, {}", Register::T0, Register::T1));
            self.builder.emit("mflo", Register::T0.to_string());
        } else {
            self.builder.emit(
                mnemonic,
                format!("{}, {}, {}", Register::T0, Register::T0, Register::T1),
            );
        }

        self.builder.gen_push(Register::T0);
        Ok(())
    }

    /// && and || in value position evaluate the left side, then branch
    /// past the right side when it can no longer change the result,
    /// pushing the short-circuit constant instead.
    fn generate_short_circuit_op(
        &mut self,
        op: BinaryOperation,
        lhs: &ExpNode,
        rhs: &ExpNode,
    ) -> Result<(), InternalError> {
        let short_label = self.builder.create_label();
        let done_label = self.builder.create_label();

        self.generate_exp(lhs)?;
        self.builder.gen_pop(Register::T0);

        let (branch, short_value) = match op {
            BinaryOperation::AND => ("beq", 0),
            _ => ("bne", 1),
        };
        self.builder
            .emit(branch, format!("{}, 0, {}", Register::T0, short_label));

        self.generate_exp(rhs)?;
        self.builder.emit("j", done_label.clone());

        self.builder.set_label(&short_label);
        self.builder
            .emit("li", format!("{}, {}", Register::T0, short_value));
        self.builder.gen_push(Register::T0);
        self.builder.set_label(&done_label);
        Ok(())
    }

    /// The two-label jump protocol for conditions: control transfers to
    /// `true_label` or `false_label` without materialising the boolean,
    /// except for the value-shaped forms which evaluate to 0/1 and branch
    /// on the popped result.
    fn generate_jump_code(
        &mut self,
        condition: &ExpNode,
        true_label: &str,
        false_label: &str,
    ) -> Result<(), InternalError> {
        match condition {
            ExpNode::TRUE { .. } => {
                self.builder.emit("j", String::from(true_label));
                Ok(())
            }
            ExpNode::FALSE { .. } => {
                self.builder.emit("j", String::from(false_label));
                Ok(())
            }
            ExpNode::BINARY_OP {
                op: BinaryOperation::AND,
                lhs,
                rhs,
            } => {
                let mid_label = self.builder.create_label();
                self.generate_jump_code(lhs, &mid_label, false_label)?;
                self.builder.set_label(&mid_label);
                self.generate_jump_code(rhs, true_label, false_label)
            }
            ExpNode::BINARY_OP {
                op: BinaryOperation::OR,
                lhs,
                rhs,
            } => {
                let mid_label = self.builder.create_label();
                self.generate_jump_code(lhs, true_label, &mid_label)?;
                self.builder.set_label(&mid_label);
                self.generate_jump_code(rhs, true_label, false_label)
            }
            _ => {
                self.generate_exp(condition)?;
                self.builder.gen_pop(Register::T0);
                self.builder
                    .emit("beq", format!("{}, 0, {}", Register::T0, false_label));
                self.builder.emit("j", String::from(true_label));
                Ok(())
            }
        }
    }
}
