use super::super::ast::{
    BlockNode, DataType, DeclNode, ExpNode, FormalDecl, IdentNode, ProgramNode, StmtNode,
    TypeSpecNode,
};
use super::super::ast::symbol_table::{
    Storage, Symbol, SymbolId, SymbolTable, SymbolTableError, GLOBAL_OFFSET_SENTINEL,
};
use super::super::diagnostics::{ErrorReporter, InternalError, SemanticError, SourcePos};

/// Name analysis is a single recursive descent over the AST threading the
/// symbol table. It declares every name, links every identifier use to
/// its symbol handle, resolves struct fields one dot at a time and lays
/// out each function's stack frame while walking its body.
///
/// User errors go to the reporter and the walk continues; only symbol
/// table misuse (an empty-stack pop, a duplicate at a level already
/// checked absent) aborts, as an internal compiler error.
pub(crate) struct NameAnalyser<'a> {
    table: &'a mut SymbolTable,
    reporter: &'a mut ErrorReporter,
    saw_main: bool,
}

impl<'a> NameAnalyser<'a> {
    pub fn new(table: &'a mut SymbolTable, reporter: &'a mut ErrorReporter) -> Self {
        NameAnalyser {
            table,
            reporter,
            saw_main: false,
        }
    }

    pub fn analyse_program(&mut self, program: &mut ProgramNode) -> Result<(), InternalError> {
        for decl in &mut program.decls {
            self.analyse_decl(decl)?;
        }

        if !self.saw_main {
            self.reporter.report(SourcePos::none(), SemanticError::NoMain);
        }
        Ok(())
    }

    fn analyse_decl(&mut self, decl: &mut DeclNode) -> Result<(), InternalError> {
        match decl {
            DeclNode::VAR_DECL {
                type_spec,
                identifier,
            } => self.analyse_var_decl(type_spec, identifier),
            DeclNode::FN_DECL {
                return_type,
                identifier,
                formals,
                body,
            } => self.analyse_fn_decl(return_type, identifier, formals, body),
            DeclNode::STRUCT_DECL { identifier, fields } => {
                self.analyse_struct_decl(identifier, fields)
            }
        }
    }

    /// Resolve a declared type annotation into a semantic type, linking a
    /// struct type name to its definition symbol. A bad struct name is
    /// reported here and yields None.
    fn resolve_type_spec(&mut self, type_spec: &mut TypeSpecNode) -> Option<DataType> {
        match type_spec {
            TypeSpecNode::INT(_) => Some(DataType::INT),
            TypeSpecNode::BOOL(_) => Some(DataType::BOOL),
            TypeSpecNode::VOID(_) => Some(DataType::VOID),
            TypeSpecNode::STRUCT(name) => {
                let found = self.table.lookup_global(&name.name);
                match found {
                    Some(id) if self.table.symbol(id).is_struct_def() => {
                        name.symbol = Some(id);
                        Some(DataType::STRUCT(id))
                    }
                    _ => {
                        self.reporter
                            .report(name.pos, SemanticError::InvalidStructType);
                        None
                    }
                }
            }
        }
    }

    fn analyse_var_decl(
        &mut self,
        type_spec: &mut TypeSpecNode,
        identifier: &mut IdentNode,
    ) -> Result<(), InternalError> {
        let mut bad = false;

        let datatype = if matches!(type_spec, TypeSpecNode::VOID(_)) {
            self.reporter
                .report(identifier.pos, SemanticError::NonFunctionVoid);
            bad = true;
            DataType::ERROR
        } else {
            match self.resolve_type_spec(type_spec) {
                Some(datatype) => datatype,
                None => {
                    bad = true;
                    DataType::ERROR
                }
            }
        };

        if self.table.lookup_local(&identifier.name).is_some() {
            self.reporter
                .report(identifier.pos, SemanticError::MultiplyDeclared);
            bad = true;
        }

        if !bad {
            let (storage, offset) = if self.table.is_global_scope() {
                (Storage::GLOBAL, GLOBAL_OFFSET_SENTINEL)
            } else {
                // Every local occupies one 4-byte frame slot, struct
                // instances included even though they carry no runtime
                // value in this subset.
                let offset = self.table.offset();
                self.table.set_offset(offset - 4);
                (Storage::LOCAL, offset)
            };

            let symbol = Symbol::variable(identifier.name.clone(), datatype, storage, offset);
            let id = self.declare_checked(symbol)?;
            identifier.symbol = Some(id);
        }

        Ok(())
    }

    fn analyse_fn_decl(
        &mut self,
        return_type: &mut TypeSpecNode,
        identifier: &mut IdentNode,
        formals: &mut Vec<FormalDecl>,
        body: &mut BlockNode,
    ) -> Result<(), InternalError> {
        let ret = self.resolve_type_spec(return_type).unwrap_or(DataType::ERROR);

        let fn_symbol = if self.table.lookup_local(&identifier.name).is_some() {
            self.reporter
                .report(identifier.pos, SemanticError::MultiplyDeclared);
            None
        } else {
            let id = self.declare_checked(Symbol::function(identifier.name.clone(), ret))?;
            identifier.symbol = Some(id);
            if identifier.name == "main" {
                self.saw_main = true;
            }
            Some(id)
        };

        self.table.set_global_scope(false);
        self.table.set_offset(0);
        self.table.add_scope();

        let mut param_types = vec![];
        for formal in formals.iter_mut() {
            if let Some(datatype) = self.analyse_formal_decl(formal)? {
                param_types.push(datatype);
            }
        }
        let param_size = -self.table.offset();

        if let Some(id) = fn_symbol {
            self.table.symbol_mut(id).set_function_signature(param_types);
        }

        // Reserve the saved-RA and saved-FP slots between the formals and
        // the locals.
        self.table.set_offset(self.table.offset() - 8);
        let frame_mark = self.table.offset();

        self.analyse_block(body)?;

        let local_size = -(self.table.offset() - frame_mark);
        if let Some(id) = fn_symbol {
            self.table.symbol_mut(id).set_frame_sizes(param_size, local_size);
        }

        self.table.set_global_scope(true);
        self.table.remove_scope().map_err(Self::table_bug)?;
        Ok(())
    }

    /// Process one formal. A rejected formal (void-typed, bad struct type
    /// or duplicate) contributes neither a frame slot nor a signature
    /// entry.
    fn analyse_formal_decl(
        &mut self,
        formal: &mut FormalDecl,
    ) -> Result<Option<DataType>, InternalError> {
        if matches!(formal.type_spec, TypeSpecNode::VOID(_)) {
            self.reporter
                .report(formal.identifier.pos, SemanticError::NonFunctionVoid);
            return Ok(None);
        }

        let datatype = match self.resolve_type_spec(&mut formal.type_spec) {
            Some(datatype) => datatype,
            None => return Ok(None),
        };

        if self.table.lookup_local(&formal.identifier.name).is_some() {
            self.reporter
                .report(formal.identifier.pos, SemanticError::MultiplyDeclared);
            return Ok(None);
        }

        let offset = self.table.offset();
        self.table.set_offset(offset - 4);

        let symbol = Symbol::variable(
            formal.identifier.name.clone(),
            datatype.clone(),
            Storage::FORMAL,
            offset,
        );
        let id = self.declare_checked(symbol)?;
        formal.identifier.symbol = Some(id);

        Ok(Some(datatype))
    }

    fn analyse_struct_decl(
        &mut self,
        identifier: &mut IdentNode,
        fields: &mut Vec<DeclNode>,
    ) -> Result<(), InternalError> {
        let duplicate = self.table.lookup_local(&identifier.name).is_some();
        if duplicate {
            self.reporter
                .report(identifier.pos, SemanticError::MultiplyDeclared);
        }

        // Field declarations run in a fresh scope pushed on the stack, so
        // struct-typed fields resolve their type names against the outer
        // scopes. Field offsets are never assigned in this subset.
        self.table.add_scope();
        for field in fields.iter_mut() {
            self.analyse_decl(field)?;
        }
        let field_scope = self.table.remove_scope().map_err(Self::table_bug)?;

        if !duplicate {
            let id =
                self.declare_checked(Symbol::struct_def(identifier.name.clone(), field_scope))?;
            identifier.symbol = Some(id);
        }

        Ok(())
    }

    fn analyse_block(&mut self, block: &mut BlockNode) -> Result<(), InternalError> {
        for decl in &mut block.decls {
            self.analyse_decl(decl)?;
        }
        for stmt in &mut block.stmts {
            self.analyse_stmt(stmt)?;
        }
        Ok(())
    }

    /// Statement bodies each open one scope around their declarations and
    /// statements; if/else opens one per branch.
    fn analyse_scoped_block(&mut self, block: &mut BlockNode) -> Result<(), InternalError> {
        self.table.add_scope();
        self.analyse_block(block)?;
        self.table.remove_scope().map_err(Self::table_bug)?;
        Ok(())
    }

    fn analyse_stmt(&mut self, stmt: &mut StmtNode) -> Result<(), InternalError> {
        match stmt {
            StmtNode::ASSIGN { assignment } => self.analyse_exp(assignment),
            StmtNode::POST_INC { target } => self.analyse_exp(target),
            StmtNode::POST_DEC { target } => self.analyse_exp(target),
            StmtNode::READ { target } => self.analyse_exp(target),
            StmtNode::WRITE { expression, .. } => self.analyse_exp(expression),
            StmtNode::IF { condition, body } => {
                self.analyse_exp(condition)?;
                self.analyse_scoped_block(body)
            }
            StmtNode::IF_ELSE {
                condition,
                then_body,
                else_body,
            } => {
                self.analyse_exp(condition)?;
                self.analyse_scoped_block(then_body)?;
                self.analyse_scoped_block(else_body)
            }
            StmtNode::WHILE { condition, body } => {
                self.analyse_exp(condition)?;
                self.analyse_scoped_block(body)
            }
            StmtNode::REPEAT { clause, body } => {
                self.analyse_exp(clause)?;
                self.analyse_scoped_block(body)
            }
            StmtNode::RETURN { expression, .. } => match expression {
                Some(expression) => self.analyse_exp(expression),
                None => Ok(()),
            },
            StmtNode::CALL { call } => self.analyse_exp(call),
        }
    }

    fn analyse_exp(&mut self, exp: &mut ExpNode) -> Result<(), InternalError> {
        match exp {
            ExpNode::INT_LIT { .. }
            | ExpNode::STR_LIT { .. }
            | ExpNode::TRUE { .. }
            | ExpNode::FALSE { .. } => Ok(()),
            ExpNode::IDENTIFIER(identifier) => {
                self.resolve_use(identifier);
                Ok(())
            }
            ExpNode::DOT_ACCESS {
                lhs,
                field,
                struct_def,
                bad_access,
            } => self.analyse_dot_access(lhs.as_mut(), field, struct_def, bad_access),
            ExpNode::ASSIGN { lhs, rhs } => {
                self.analyse_exp(lhs.as_mut())?;
                self.analyse_exp(rhs.as_mut())
            }
            ExpNode::CALL { callee, arguments } => {
                self.resolve_use(callee);
                for argument in arguments {
                    self.analyse_exp(argument)?;
                }
                Ok(())
            }
            ExpNode::UNARY_OP { operand, .. } => self.analyse_exp(operand.as_mut()),
            ExpNode::BINARY_OP { lhs, rhs, .. } => {
                self.analyse_exp(lhs.as_mut())?;
                self.analyse_exp(rhs.as_mut())
            }
        }
    }

    /// Resolve one identifier use. An unresolved name is reported and the
    /// symbol link stays empty.
    fn resolve_use(&mut self, identifier: &mut IdentNode) {
        match self.table.lookup_global(&identifier.name) {
            Some(id) => identifier.symbol = Some(id),
            None => {
                self.reporter
                    .report(identifier.pos, SemanticError::Undeclared);
            }
        }
    }

    /// Resolve one dot access. The left side resolves first and selects
    /// the field scope to search; exactly one level resolves per dot, and
    /// a chained access continues from the struct definition the previous
    /// link exported. `bad_access` is sticky along the chain so one
    /// reported failure does not cascade.
    fn analyse_dot_access(
        &mut self,
        lhs: &mut ExpNode,
        field: &mut IdentNode,
        struct_def: &mut Option<SymbolId>,
        bad_access: &mut bool,
    ) -> Result<(), InternalError> {
        let lhs_pos = lhs.pos();
        let mut bad = false;
        let mut fields_of: Option<SymbolId> = None;

        match lhs {
            ExpNode::IDENTIFIER(identifier) => match self.table.lookup_global(&identifier.name) {
                None => {
                    self.reporter
                        .report(identifier.pos, SemanticError::Undeclared);
                    bad = true;
                }
                Some(id) => {
                    identifier.symbol = Some(id);
                    match self.table.symbol(id).datatype() {
                        DataType::STRUCT(def) => fields_of = Some(*def),
                        _ => {
                            self.reporter
                                .report(identifier.pos, SemanticError::DotAccessNonStruct);
                            bad = true;
                        }
                    }
                }
            },
            ExpNode::DOT_ACCESS {
                lhs: inner_lhs,
                field: inner_field,
                struct_def: inner_def,
                bad_access: inner_bad,
            } => {
                self.analyse_dot_access(inner_lhs.as_mut(), inner_field, inner_def, inner_bad)?;
                if *inner_bad {
                    bad = true;
                } else {
                    match inner_def {
                        Some(def) => fields_of = Some(*def),
                        None => {
                            self.reporter
                                .report(lhs_pos, SemanticError::DotAccessNonStruct);
                            bad = true;
                        }
                    }
                }
            }
            other => {
                self.analyse_exp(other)?;
                self.reporter
                    .report(lhs_pos, SemanticError::DotAccessNonStruct);
                bad = true;
            }
        }

        if let (false, Some(def)) = (bad, fields_of) {
            let resolved = self
                .table
                .symbol(def)
                .field_scope()
                .and_then(|fields| fields.get(&field.name));
            match resolved {
                None => {
                    self.reporter
                        .report(field.pos, SemanticError::InvalidStructField);
                    bad = true;
                }
                Some(field_id) => {
                    field.symbol = Some(field_id);
                    if let DataType::STRUCT(nested) = self.table.symbol(field_id).datatype() {
                        *struct_def = Some(*nested);
                    }
                }
            }
        }

        *bad_access = bad;
        Ok(())
    }

    /// Insert a symbol the caller has already checked absent from the
    /// innermost scope. Any failure here is the compiler's bug.
    fn declare_checked(&mut self, symbol: Symbol) -> Result<SymbolId, InternalError> {
        let name = symbol.name().to_string();
        self.table.add_decl(symbol).map_err(|error| match error {
            SymbolTableError::Duplicate => InternalError::DuplicateSymbol(name),
            other => Self::table_bug(other),
        })
    }

    fn table_bug(error: SymbolTableError) -> InternalError {
        match error {
            SymbolTableError::EmptyScope => InternalError::EmptyScopePop,
            SymbolTableError::Duplicate => InternalError::DuplicateSymbol(String::new()),
            SymbolTableError::IllegalName => InternalError::IllegalSymbolName,
        }
    }
}
