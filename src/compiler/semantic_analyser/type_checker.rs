use super::super::ast::{
    BinaryOperation, BlockNode, DataType, DeclNode, ExpNode, IdentNode, ProgramNode, StmtNode,
    TypeSpecNode, UnaryOperation,
};
use super::super::ast::symbol_table::SymbolTable;
use super::super::diagnostics::{ErrorReporter, SemanticError, SourcePos};

/// Type checking is a post-order evaluation producing one semantic type
/// per expression and verifying the statement-level rules. It never
/// touches the name links; its only write into the AST is the cached
/// operand type on write statements, which tells code generation which
/// output service to request.
///
/// ERROR propagates silently: an operation over an ERROR operand yields
/// ERROR without a second diagnostic.
pub(crate) struct TypeChecker<'a> {
    table: &'a SymbolTable,
    reporter: &'a mut ErrorReporter,
    current_return: DataType,
}

impl<'a> TypeChecker<'a> {
    pub fn new(table: &'a SymbolTable, reporter: &'a mut ErrorReporter) -> Self {
        TypeChecker {
            table,
            reporter,
            current_return: DataType::VOID,
        }
    }

    pub fn check_program(&mut self, program: &mut ProgramNode) {
        for decl in &mut program.decls {
            if let DeclNode::FN_DECL {
                return_type,
                identifier,
                body,
                ..
            } = decl
            {
                self.current_return = self.declared_return_type(identifier, return_type);
                self.check_block(body);
            }
        }
    }

    /// The return type a body is checked against. Taken from the function
    /// symbol when one was registered; a duplicate definition falls back
    /// to its annotation so its body is still checked.
    fn declared_return_type(
        &self,
        identifier: &IdentNode,
        return_type: &TypeSpecNode,
    ) -> DataType {
        if let Some(id) = identifier.symbol {
            if let DataType::FN { ret, .. } = self.table.symbol(id).datatype() {
                return (**ret).clone();
            }
        }

        match return_type {
            TypeSpecNode::INT(_) => DataType::INT,
            TypeSpecNode::BOOL(_) => DataType::BOOL,
            TypeSpecNode::VOID(_) => DataType::VOID,
            TypeSpecNode::STRUCT(name) => match name.symbol {
                Some(id) => DataType::STRUCT(id),
                None => DataType::ERROR,
            },
        }
    }

    fn check_block(&mut self, block: &mut BlockNode) {
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &mut StmtNode) {
        match stmt {
            StmtNode::ASSIGN { assignment } => {
                self.check_exp(assignment);
            }
            StmtNode::POST_INC { target } | StmtNode::POST_DEC { target } => {
                let target_type = self.check_exp(target);
                if target_type.is_error() {
                } else if !target_type.is_int() {
                    self.reporter
                        .report(target.pos(), SemanticError::ArithmeticNonNumeric);
                } else if !target.is_plain_identifier() {
                    self.reporter
                        .report(target.pos(), SemanticError::IncDecStructField);
                }
            }
            StmtNode::READ { target } => {
                let target_type = self.check_exp(target);
                let pos = target.pos();
                if target_type.is_fn() {
                    self.reporter.report(pos, SemanticError::ReadFunction);
                } else if target_type.is_struct_def() {
                    self.reporter.report(pos, SemanticError::ReadStructName);
                } else if target_type.is_struct() {
                    self.reporter.report(pos, SemanticError::ReadStructVariable);
                }
            }
            StmtNode::WRITE {
                expression,
                expression_type,
            } => {
                let operand_type = self.check_exp(expression);
                let pos = expression.pos();
                if operand_type.is_fn() {
                    self.reporter.report(pos, SemanticError::WriteFunction);
                } else if operand_type.is_struct_def() {
                    self.reporter.report(pos, SemanticError::WriteStructName);
                } else if operand_type.is_struct() {
                    self.reporter
                        .report(pos, SemanticError::WriteStructVariable);
                } else if operand_type.is_void() {
                    self.reporter.report(pos, SemanticError::WriteVoid);
                } else if !operand_type.is_error() {
                    *expression_type = Some(operand_type);
                }
            }
            StmtNode::IF { condition, body } => {
                let condition_type = self.check_exp(condition);
                if !condition_type.is_error() && !condition_type.is_bool() {
                    self.reporter
                        .report(condition.pos(), SemanticError::NonBoolIf);
                }
                self.check_block(body);
            }
            StmtNode::IF_ELSE {
                condition,
                then_body,
                else_body,
            } => {
                let condition_type = self.check_exp(condition);
                if !condition_type.is_error() && !condition_type.is_bool() {
                    self.reporter
                        .report(condition.pos(), SemanticError::NonBoolIf);
                }
                self.check_block(then_body);
                self.check_block(else_body);
            }
            StmtNode::WHILE { condition, body } => {
                let condition_type = self.check_exp(condition);
                if !condition_type.is_error() && !condition_type.is_bool() {
                    self.reporter
                        .report(condition.pos(), SemanticError::NonBoolWhile);
                }
                self.check_block(body);
            }
            StmtNode::REPEAT { clause, body } => {
                let clause_type = self.check_exp(clause);
                if !clause_type.is_error() && !clause_type.is_int() {
                    self.reporter
                        .report(clause.pos(), SemanticError::NonIntRepeat);
                }
                self.check_block(body);
            }
            StmtNode::RETURN { expression, .. } => self.check_return(expression),
            StmtNode::CALL { call } => {
                self.check_exp(call);
            }
        }
    }

    fn check_return(&mut self, expression: &mut Option<ExpNode>) {
        match expression {
            Some(expression) => {
                let value_type = self.check_exp(expression);
                if self.current_return.is_void() {
                    self.reporter
                        .report(expression.pos(), SemanticError::ReturnInVoid);
                } else if !value_type.is_error()
                    && !self.current_return.is_error()
                    && value_type != self.current_return
                {
                    self.reporter
                        .report(expression.pos(), SemanticError::BadReturn);
                }
            }
            None => {
                if !self.current_return.is_void() && !self.current_return.is_error() {
                    self.reporter
                        .report(SourcePos::none(), SemanticError::MissingReturn);
                }
            }
        }
    }

    fn check_exp(&mut self, exp: &mut ExpNode) -> DataType {
        match exp {
            ExpNode::INT_LIT { .. } => DataType::INT,
            ExpNode::STR_LIT { .. } => DataType::STRING,
            ExpNode::TRUE { .. } | ExpNode::FALSE { .. } => DataType::BOOL,
            ExpNode::IDENTIFIER(identifier) => self.type_of_link(identifier),
            ExpNode::DOT_ACCESS { field, .. } => self.type_of_link(field),
            ExpNode::ASSIGN { lhs, rhs } => {
                let lhs_pos = lhs.pos();
                let lhs_type = self.check_exp(lhs.as_mut());
                let rhs_type = self.check_exp(rhs.as_mut());
                self.check_assignment(lhs_type, rhs_type, lhs_pos)
            }
            ExpNode::CALL { callee, arguments } => self.check_call(callee, arguments),
            ExpNode::UNARY_OP { op, operand } => {
                let operand_pos = operand.pos();
                let operand_type = self.check_exp(operand.as_mut());
                match op {
                    UnaryOperation::NEGATE => self.check_operand(
                        operand_type,
                        operand_pos,
                        DataType::INT,
                        SemanticError::ArithmeticNonNumeric,
                    ),
                    UnaryOperation::NOT => self.check_operand(
                        operand_type,
                        operand_pos,
                        DataType::BOOL,
                        SemanticError::LogicalNonBool,
                    ),
                }
            }
            ExpNode::BINARY_OP { op, lhs, rhs } => {
                let lhs_pos = lhs.pos();
                let rhs_pos = rhs.pos();
                let lhs_type = self.check_exp(lhs.as_mut());
                let rhs_type = self.check_exp(rhs.as_mut());
                match op {
                    BinaryOperation::ADD
                    | BinaryOperation::SUB
                    | BinaryOperation::MUL
                    | BinaryOperation::DIV => self.check_binary_operands(
                        lhs_type,
                        rhs_type,
                        lhs_pos,
                        rhs_pos,
                        DataType::INT,
                        DataType::INT,
                        SemanticError::ArithmeticNonNumeric,
                    ),
                    BinaryOperation::AND | BinaryOperation::OR => self.check_binary_operands(
                        lhs_type,
                        rhs_type,
                        lhs_pos,
                        rhs_pos,
                        DataType::BOOL,
                        DataType::BOOL,
                        SemanticError::LogicalNonBool,
                    ),
                    BinaryOperation::LESS_THAN
                    | BinaryOperation::GREATER_THAN
                    | BinaryOperation::LESS_EQUAL
                    | BinaryOperation::GREATER_EQUAL => self.check_binary_operands(
                        lhs_type,
                        rhs_type,
                        lhs_pos,
                        rhs_pos,
                        DataType::INT,
                        DataType::BOOL,
                        SemanticError::RelationalNonNumeric,
                    ),
                    BinaryOperation::EQUAL | BinaryOperation::NOT_EQUAL => {
                        self.check_equality(lhs_type, rhs_type, lhs_pos)
                    }
                }
            }
        }
    }

    /// The type behind a resolved identifier link; an unresolved link has
    /// already been reported by name analysis and types as ERROR.
    fn type_of_link(&self, identifier: &IdentNode) -> DataType {
        match identifier.symbol {
            Some(id) => self.table.symbol(id).datatype().clone(),
            None => DataType::ERROR,
        }
    }

    /// Verify one operand of a unary operation.
    fn check_operand(
        &mut self,
        operand_type: DataType,
        pos: SourcePos,
        expected: DataType,
        error: SemanticError,
    ) -> DataType {
        if operand_type.is_error() {
            return DataType::ERROR;
        }
        if operand_type != expected {
            self.reporter.report(pos, error);
            return DataType::ERROR;
        }
        expected
    }

    /// Verify both operands of a homogeneous binary operation, reporting
    /// per operand at that operand's position.
    #[allow(clippy::too_many_arguments)]
    fn check_binary_operands(
        &mut self,
        lhs_type: DataType,
        rhs_type: DataType,
        lhs_pos: SourcePos,
        rhs_pos: SourcePos,
        expected: DataType,
        result: DataType,
        error: SemanticError,
    ) -> DataType {
        let mut ok = true;

        if lhs_type.is_error() {
            ok = false;
        } else if lhs_type != expected {
            self.reporter.report(lhs_pos, error);
            ok = false;
        }

        if rhs_type.is_error() {
            ok = false;
        } else if rhs_type != expected {
            self.reporter.report(rhs_pos, error);
            ok = false;
        }

        if ok {
            result
        } else {
            DataType::ERROR
        }
    }

    /// The equality rules, reported at the left operand's position.
    fn check_equality(
        &mut self,
        lhs_type: DataType,
        rhs_type: DataType,
        pos: SourcePos,
    ) -> DataType {
        if lhs_type.is_error() || rhs_type.is_error() {
            return DataType::ERROR;
        }
        if lhs_type.is_void() && rhs_type.is_void() {
            self.reporter.report(pos, SemanticError::EqualityVoid);
            return DataType::ERROR;
        }
        if lhs_type.is_fn() && rhs_type.is_fn() {
            self.reporter.report(pos, SemanticError::EqualityFunctions);
            return DataType::ERROR;
        }
        if lhs_type.is_struct_def() && rhs_type.is_struct_def() {
            self.reporter
                .report(pos, SemanticError::EqualityStructNames);
            return DataType::ERROR;
        }
        if lhs_type.is_struct() && rhs_type.is_struct() {
            self.reporter
                .report(pos, SemanticError::EqualityStructVariables);
            return DataType::ERROR;
        }
        if lhs_type != rhs_type {
            self.reporter.report(pos, SemanticError::TypeMismatch);
            return DataType::ERROR;
        }
        DataType::BOOL
    }

    /// The assignment rules mirror the equality rules with their own
    /// message per kind; a successful assignment has the left side's type.
    fn check_assignment(
        &mut self,
        lhs_type: DataType,
        rhs_type: DataType,
        pos: SourcePos,
    ) -> DataType {
        if lhs_type.is_error() || rhs_type.is_error() {
            return DataType::ERROR;
        }
        if lhs_type.is_fn() && rhs_type.is_fn() {
            self.reporter
                .report(pos, SemanticError::FunctionAssignment);
            return DataType::ERROR;
        }
        if lhs_type.is_struct_def() && rhs_type.is_struct_def() {
            self.reporter
                .report(pos, SemanticError::StructNameAssignment);
            return DataType::ERROR;
        }
        if lhs_type.is_struct() && rhs_type.is_struct() {
            self.reporter
                .report(pos, SemanticError::StructVariableAssignment);
            return DataType::ERROR;
        }
        if lhs_type != rhs_type {
            self.reporter.report(pos, SemanticError::TypeMismatch);
            return DataType::ERROR;
        }
        lhs_type
    }

    fn check_call(&mut self, callee: &IdentNode, arguments: &mut Vec<ExpNode>) -> DataType {
        let signature = callee.symbol.map(|id| self.table.symbol(id).datatype().clone());

        let (params, ret) = match signature {
            None => {
                // Undeclared callee, already reported. Still check args.
                for argument in arguments.iter_mut() {
                    self.check_exp(argument);
                }
                return DataType::ERROR;
            }
            Some(DataType::FN { params, ret }) => (params, *ret),
            Some(_) => {
                self.reporter
                    .report(callee.pos, SemanticError::CallNonFunction);
                for argument in arguments.iter_mut() {
                    self.check_exp(argument);
                }
                return DataType::ERROR;
            }
        };

        if arguments.len() != params.len() {
            self.reporter
                .report(callee.pos, SemanticError::WrongArgCount);
            for argument in arguments.iter_mut() {
                self.check_exp(argument);
            }
            return ret;
        }

        for (argument, param) in arguments.iter_mut().zip(params.iter()) {
            let argument_pos = argument.pos();
            let argument_type = self.check_exp(argument);
            if !argument_type.is_error() && !param.is_error() && argument_type != *param {
                self.reporter
                    .report(argument_pos, SemanticError::ActualFormalMismatch);
            }
        }

        ret
    }
}
