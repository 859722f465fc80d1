use super::{AstParser, PestGibberishParser};
use crate::compiler::ast::{
    BinaryOperation, DeclNode, ExpNode, ProgramNode, StmtNode, TypeSpecNode,
};

fn parse(source: &str) -> ProgramNode {
    PestGibberishParser::default()
        .parse(source)
        .expect("test source should parse")
}

fn main_stmts(program: &ProgramNode) -> &[StmtNode] {
    match &program.decls[0] {
        DeclNode::FN_DECL { body, .. } => &body.stmts,
        other => panic!("expected a function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_global_var_decl() {
    let program = parse("int x;");
    assert_eq!(program.decls.len(), 1);

    match &program.decls[0] {
        DeclNode::VAR_DECL {
            type_spec: TypeSpecNode::INT(_),
            identifier,
        } => {
            assert_eq!(identifier.name, "x");
            assert_eq!(identifier.pos.line, 1);
            assert_eq!(identifier.pos.col, 5);
            assert!(identifier.symbol.is_none());
        }
        other => panic!("expected an int variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_fn_decl_with_formals_and_return() {
    let program = parse("int add(int a, int b){ return a + b; }");

    match &program.decls[0] {
        DeclNode::FN_DECL {
            return_type: TypeSpecNode::INT(_),
            identifier,
            formals,
            body,
        } => {
            assert_eq!(identifier.name, "add");
            assert_eq!(formals.len(), 2);
            assert_eq!(formals[0].identifier.name, "a");
            assert_eq!(formals[1].identifier.name, "b");
            assert_eq!(body.stmts.len(), 1);
            assert!(matches!(
                body.stmts[0],
                StmtNode::RETURN {
                    expression: Some(_),
                    ..
                }
            ));
        }
        other => panic!("expected a function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_struct_decl() {
    let program = parse("struct Point { int x; int y; };");

    match &program.decls[0] {
        DeclNode::STRUCT_DECL { identifier, fields } => {
            assert_eq!(identifier.name, "Point");
            assert_eq!(fields.len(), 2);
        }
        other => panic!("expected a struct declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_multiplication_binds_tighter_than_addition() {
    let program = parse("void main(){ int x; x = 1 + 2 * 3; }");

    let assignment = match &main_stmts(&program)[0] {
        StmtNode::ASSIGN { assignment } => assignment,
        other => panic!("expected an assignment statement, got {:?}", other),
    };
    let rhs = match assignment {
        ExpNode::ASSIGN { rhs, .. } => rhs.as_ref(),
        other => panic!("expected an assignment expression, got {:?}", other),
    };
    match rhs {
        ExpNode::BINARY_OP {
            op: BinaryOperation::ADD,
            rhs: add_rhs,
            ..
        } => {
            assert!(matches!(
                add_rhs.as_ref(),
                ExpNode::BINARY_OP {
                    op: BinaryOperation::MUL,
                    ..
                }
            ));
        }
        other => panic!("expected addition at the top, got {:?}", other),
    }
}

#[test]
fn test_parse_dot_chain_folds_left() {
    let program = parse("void main(){ a.b.c = 1; }");

    let assignment = match &main_stmts(&program)[0] {
        StmtNode::ASSIGN { assignment } => assignment,
        other => panic!("expected an assignment statement, got {:?}", other),
    };
    let lhs = match assignment {
        ExpNode::ASSIGN { lhs, .. } => lhs.as_ref(),
        other => panic!("expected an assignment expression, got {:?}", other),
    };
    match lhs {
        ExpNode::DOT_ACCESS { lhs, field, .. } => {
            assert_eq!(field.name, "c");
            match lhs.as_ref() {
                ExpNode::DOT_ACCESS { lhs, field, .. } => {
                    assert_eq!(field.name, "b");
                    assert!(matches!(lhs.as_ref(), ExpNode::IDENTIFIER(_)));
                }
                other => panic!("expected a nested dot access, got {:?}", other),
            }
        }
        other => panic!("expected a dot access, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_statement() {
    let program = parse("void main(){ if (true) { } else { } }");
    assert!(matches!(main_stmts(&program)[0], StmtNode::IF_ELSE { .. }));
}

#[test]
fn test_parse_call_statement() {
    let program = parse("void main(){ foo(1, true); }");

    match &main_stmts(&program)[0] {
        StmtNode::CALL {
            call: ExpNode::CALL { callee, arguments },
        } => {
            assert_eq!(callee.name, "foo");
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("expected a call statement, got {:?}", other),
    }
}

#[test]
fn test_parse_bare_return() {
    let program = parse("void main(){ return; }");
    assert!(matches!(
        main_stmts(&program)[0],
        StmtNode::RETURN {
            expression: None,
            ..
        }
    ));
}

#[test]
fn test_parse_keyword_prefixed_identifier() {
    // "interval" starts with the keyword "int" but is one identifier.
    let program = parse("int interval; void main(){ interval = 2; }");

    match &program.decls[0] {
        DeclNode::VAR_DECL { identifier, .. } => assert_eq!(identifier.name, "interval"),
        other => panic!("expected a variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_comments_are_ignored() {
    let program = parse("// leading comment\nint x; ## trailing comment\n");
    assert_eq!(program.decls.len(), 1);
}

#[test]
fn test_parse_syntax_error_yields_positioned_diagnostic() {
    let error = PestGibberishParser::default()
        .parse("int ;")
        .expect_err("missing identifier should not parse");

    assert_eq!(error.pos.line, 1);
    assert!(error.message.starts_with("Syntax error"));
}

#[test]
fn debug_scratch() {
    use crate::pest::Parser;
    use super::gibberish_pest_parser::Rule;
    use super::gibberish_pest_parser::GibberishParser;
    use Rule as MiniRule;
    #[derive(pest_derive::Parser)]
    #[grammar_inline = r#"
        WHITESPACE = _{ " " }
        a_rule = { "x" ~ inner? ~ ";" }
        inner = _{ "y" }
    "#]
    struct MiniParser;
    println!("mini: {:?}", MiniParser::parse(MiniRule::a_rule, "x y;"));

    panic!("see output");
}
