use crate::pest::Parser;

use super::super::ast::{
    BinaryOperation, BlockNode, DeclNode, ExpNode, FormalDecl, IdentNode, ProgramNode, StmtNode,
    TypeSpecNode, UnaryOperation,
};
use super::super::diagnostics::{Diagnostic, SourcePos};
use super::AstParser;

/// Gibberish Parser parses a string into a series of tokens.
/// These tokens are defined as a Context-Free-Grammar in the
/// src/gibberish.pest file. The tokens generated from this parser are then
/// formalised into the abstract syntax tree implementation.
#[derive(Parser)]
#[grammar = "gibberish.pest"]
pub(crate) struct GibberishParser;

/// PestGibberishParser is a concrete AstParser.
/// It uses the pest library to generate a token sequence from a source
/// string that is then converted into an AST.
pub struct PestGibberishParser;

impl PestGibberishParser {
    /// Parses a source string into a program node.
    fn parse_into_program(&self, source: &str) -> Result<ProgramNode, Diagnostic> {
        match GibberishParser::parse(Rule::program, source) {
            Ok(mut pairs) => {
                let program = pairs.next().expect("program rule always matches once");
                let mut decls = vec![];
                for pair in program.into_inner() {
                    match pair.as_rule() {
                        Rule::EOI => {}
                        _ => decls.push(self.parse_pair_decl(pair)),
                    }
                }
                Ok(ProgramNode { decls })
            }
            Err(error) => {
                let (line, col) = match error.line_col {
                    pest::error::LineColLocation::Pos((line, col)) => (line, col),
                    pest::error::LineColLocation::Span((line, col), _) => (line, col),
                };
                Err(Diagnostic::new(
                    SourcePos::new(line, col),
                    format!("Syntax error: {}", error.variant.message()),
                ))
            }
        }
    }

    fn pair_pos(pair: &pest::iterators::Pair<Rule>) -> SourcePos {
        let (line, col) = pair.as_span().start_pos().line_col();
        SourcePos::new(line, col)
    }

    /// Parses a pest token pair into an AST declaration
    fn parse_pair_decl(&self, pair: pest::iterators::Pair<Rule>) -> DeclNode {
        match pair.as_rule() {
            Rule::var_decl => self.parse_pair_var_decl(pair),
            Rule::fn_decl => self.parse_pair_fn_decl(pair),
            Rule::struct_decl => self.parse_pair_struct_decl(pair),
            _ => panic!("Whoops! Unprocessed declaration rule: {:?}", pair.as_rule()),
        }
    }

    fn parse_pair_var_decl(&self, pair: pest::iterators::Pair<Rule>) -> DeclNode {
        let mut pair = pair.into_inner();
        let type_spec = self.parse_pair_type_spec(pair.next().unwrap());
        let identifier = self.parse_pair_identifier(pair.next().unwrap());

        DeclNode::VAR_DECL {
            type_spec,
            identifier,
        }
    }

    fn parse_pair_fn_decl(&self, pair: pest::iterators::Pair<Rule>) -> DeclNode {
        let mut pair = pair.into_inner();
        let return_type = self.parse_pair_type_spec(pair.next().unwrap());
        let identifier = self.parse_pair_identifier(pair.next().unwrap());

        let mut formals = vec![];
        if pair.peek().is_some() && pair.peek().unwrap().as_rule() == Rule::formals {
            for formal_pair in pair.next().unwrap().into_inner() {
                formals.push(self.parse_pair_formal_decl(formal_pair));
            }
        }

        let body = self.parse_pair_block(pair.next().unwrap());

        DeclNode::FN_DECL {
            return_type,
            identifier,
            formals,
            body,
        }
    }

    fn parse_pair_formal_decl(&self, pair: pest::iterators::Pair<Rule>) -> FormalDecl {
        let mut pair = pair.into_inner();
        let type_spec = self.parse_pair_type_spec(pair.next().unwrap());
        let identifier = self.parse_pair_identifier(pair.next().unwrap());

        FormalDecl {
            type_spec,
            identifier,
        }
    }

    fn parse_pair_struct_decl(&self, pair: pest::iterators::Pair<Rule>) -> DeclNode {
        let mut pair = pair.into_inner();
        let identifier = self.parse_pair_identifier(pair.next().unwrap());
        let fields = pair.map(|field| self.parse_pair_decl(field)).collect();

        DeclNode::STRUCT_DECL { identifier, fields }
    }

    fn parse_pair_type_spec(&self, pair: pest::iterators::Pair<Rule>) -> TypeSpecNode {
        match pair.as_rule() {
            Rule::primitive_type => {
                let pos = Self::pair_pos(&pair);
                match pair.as_str() {
                    "int" => TypeSpecNode::INT(pos),
                    "bool" => TypeSpecNode::BOOL(pos),
                    "void" => TypeSpecNode::VOID(pos),
                    other => panic!("Whoops! Unprocessed primitive type: {:?}", other),
                }
            }
            Rule::struct_type => {
                let mut pair = pair.into_inner();
                TypeSpecNode::STRUCT(self.parse_pair_identifier(pair.next().unwrap()))
            }
            _ => panic!("Whoops! Unprocessed type rule: {:?}", pair.as_rule()),
        }
    }

    fn parse_pair_block(&self, pair: pest::iterators::Pair<Rule>) -> BlockNode {
        let mut decls = vec![];
        let mut stmts = vec![];
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::var_decl => decls.push(self.parse_pair_decl(inner)),
                _ => stmts.push(self.parse_pair_stmt(inner)),
            }
        }
        BlockNode { decls, stmts }
    }

    /// Parses a pest token pair into an AST statement
    fn parse_pair_stmt(&self, pair: pest::iterators::Pair<Rule>) -> StmtNode {
        match pair.as_rule() {
            Rule::assign_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::ASSIGN {
                    assignment: self.parse_pair_exp(pair.next().unwrap()),
                }
            }
            Rule::post_inc_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::POST_INC {
                    target: self.parse_pair_exp(pair.next().unwrap()),
                }
            }
            Rule::post_dec_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::POST_DEC {
                    target: self.parse_pair_exp(pair.next().unwrap()),
                }
            }
            Rule::read_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::READ {
                    target: self.parse_pair_exp(pair.next().unwrap()),
                }
            }
            Rule::write_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::WRITE {
                    expression: self.parse_pair_exp(pair.next().unwrap()),
                    expression_type: None,
                }
            }
            Rule::if_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::IF {
                    condition: self.parse_pair_exp(pair.next().unwrap()),
                    body: self.parse_pair_block(pair.next().unwrap()),
                }
            }
            Rule::if_else_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::IF_ELSE {
                    condition: self.parse_pair_exp(pair.next().unwrap()),
                    then_body: self.parse_pair_block(pair.next().unwrap()),
                    else_body: self.parse_pair_block(pair.next().unwrap()),
                }
            }
            Rule::while_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::WHILE {
                    condition: self.parse_pair_exp(pair.next().unwrap()),
                    body: self.parse_pair_block(pair.next().unwrap()),
                }
            }
            Rule::repeat_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::REPEAT {
                    clause: self.parse_pair_exp(pair.next().unwrap()),
                    body: self.parse_pair_block(pair.next().unwrap()),
                }
            }
            Rule::return_stmt => {
                let pos = Self::pair_pos(&pair);
                let mut pair = pair.into_inner();
                StmtNode::RETURN {
                    expression: pair.next().map(|exp| self.parse_pair_exp(exp)),
                    pos,
                }
            }
            Rule::call_stmt => {
                let mut pair = pair.into_inner();
                StmtNode::CALL {
                    call: self.parse_pair_exp(pair.next().unwrap()),
                }
            }
            _ => panic!("Whoops! Unprocessed statement rule: {:?}", pair.as_rule()),
        }
    }

    /// Parses a pest token pair into an AST expression
    fn parse_pair_exp(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        match pair.as_rule() {
            Rule::assignment => self.parse_pair_assignment(pair),
            Rule::logic_or
            | Rule::logic_and
            | Rule::equality
            | Rule::comparison
            | Rule::term
            | Rule::factor => self.parse_pair_binary_expression(pair),
            Rule::unary => self.parse_pair_unary_expression(pair),
            Rule::postfix => self.parse_pair_dot_chain(pair),
            Rule::lvalue => self.parse_pair_dot_chain(pair),
            Rule::func_call => self.parse_pair_function_call(pair),
            Rule::integer => {
                let pos = Self::pair_pos(&pair);
                // Out-of-range literals saturate rather than abort the parse.
                let value = pair.as_str().parse().unwrap_or(i32::MAX);
                ExpNode::INT_LIT { value, pos }
            }
            Rule::string => {
                let pos = Self::pair_pos(&pair);
                ExpNode::STR_LIT {
                    value: String::from(pair.as_str()),
                    pos,
                }
            }
            Rule::boolean => {
                let pos = Self::pair_pos(&pair);
                match pair.as_str() {
                    "true" => ExpNode::TRUE { pos },
                    _ => ExpNode::FALSE { pos },
                }
            }
            Rule::identifier => ExpNode::IDENTIFIER(self.parse_pair_identifier(pair)),
            _ => panic!("Whoops! Unprocessed expression rule: {:?}", pair.as_rule()),
        }
    }

    fn parse_pair_assignment(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        let mut pair = pair.into_inner();
        let lhs = self.parse_pair_exp(pair.next().unwrap());
        let rhs = self.parse_pair_exp(pair.next().unwrap());

        ExpNode::ASSIGN {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Parses a pest token pair into an AST binary expression.
    /// Converts a linear list of binary operations of equal precedence
    /// into a left-leaning tree of binary operations.
    fn parse_pair_binary_expression(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        let mut pair = pair.into_inner();

        let mut lhs = self.parse_pair_exp(pair.next().unwrap());
        while pair.peek().is_some() {
            let op = self.parse_pair_binary_op(pair.next().unwrap()).unwrap();
            let rhs = self.parse_pair_exp(pair.next().unwrap());
            lhs = ExpNode::BINARY_OP {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }
        }

        lhs
    }

    /// Parses a pest token pair into an AST unary expression
    fn parse_pair_unary_expression(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        let mut pair = pair.into_inner();
        let operator_or_operand = pair.next().unwrap();

        // Unary
        if pair.peek().is_some() {
            let op = self.parse_pair_unary_op(operator_or_operand).unwrap();
            let operand = self.parse_pair_exp(pair.next().unwrap());

            ExpNode::UNARY_OP {
                op,
                operand: Box::new(operand),
            }
        // Skip as operand
        } else {
            self.parse_pair_exp(operator_or_operand)
        }
    }

    /// Parses a postfix or lvalue pair into an expression, folding each
    /// trailing identifier into a dot access on what came before it.
    fn parse_pair_dot_chain(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        let mut pair = pair.into_inner();
        let mut expression = self.parse_pair_exp(pair.next().unwrap());

        while pair.peek().is_some() {
            let field = self.parse_pair_identifier(pair.next().unwrap());
            expression = ExpNode::DOT_ACCESS {
                lhs: Box::new(expression),
                field,
                struct_def: None,
                bad_access: false,
            };
        }

        expression
    }

    /// Parses a pest token pair into an AST function call
    fn parse_pair_function_call(&self, pair: pest::iterators::Pair<Rule>) -> ExpNode {
        let mut pair = pair.into_inner();
        let callee = self.parse_pair_identifier(pair.next().unwrap());

        let mut arguments = vec![];
        if pair.peek().is_some() {
            for argument in pair.next().unwrap().into_inner() {
                arguments.push(self.parse_pair_exp(argument));
            }
        }

        ExpNode::CALL { callee, arguments }
    }

    /// Parses a pest token pair into an AST identifier
    fn parse_pair_identifier(&self, pair: pest::iterators::Pair<Rule>) -> IdentNode {
        let pos = Self::pair_pos(&pair);
        IdentNode::new(String::from(pair.as_str()), pos)
    }

    /// Parses a pest token pair into an AST Unary Operation
    fn parse_pair_unary_op(&self, pair: pest::iterators::Pair<Rule>) -> Option<UnaryOperation> {
        match pair.as_rule() {
            Rule::unary_not => Some(UnaryOperation::NOT),
            Rule::unary_neg => Some(UnaryOperation::NEGATE),
            _ => None,
        }
    }

    /// Parses a pest token pair into an AST Binary Operation
    fn parse_pair_binary_op(&self, pair: pest::iterators::Pair<Rule>) -> Option<BinaryOperation> {
        match pair.as_rule() {
            Rule::add => Some(BinaryOperation::ADD),
            Rule::sub => Some(BinaryOperation::SUB),
            Rule::mul => Some(BinaryOperation::MUL),
            Rule::div => Some(BinaryOperation::DIV),
            Rule::and_op => Some(BinaryOperation::AND),
            Rule::or_op => Some(BinaryOperation::OR),
            Rule::equal => Some(BinaryOperation::EQUAL),
            Rule::not_equal => Some(BinaryOperation::NOT_EQUAL),
            Rule::greater_than => Some(BinaryOperation::GREATER_THAN),
            Rule::less_than => Some(BinaryOperation::LESS_THAN),
            Rule::greater_equal => Some(BinaryOperation::GREATER_EQUAL),
            Rule::less_equal => Some(BinaryOperation::LESS_EQUAL),
            _ => None,
        }
    }
}

/// AstParser Trait Concrete Implementation
impl AstParser for PestGibberishParser {
    /// PestGibberishParser has no configuration the
    /// default is just instantiation
    fn default() -> Self {
        Self
    }

    /// Parse processes a source string into an AST root
    fn parse(self, source: &str) -> Result<ProgramNode, Diagnostic> {
        self.parse_into_program(source)
    }
}
