use super::{analyse, assert_diagnostic, diagnostics};

#[test]
fn test_assignment_type_mismatch() {
    let diagnostics = diagnostics("void foo(){ int x; x = true; }");
    assert_eq!(diagnostics.len(), 2);
    assert_diagnostic(&diagnostics[0], 0, 0, "No main function");
    assert_diagnostic(&diagnostics[1], 1, 20, "Type mismatch");
}

#[test]
fn test_missing_return_value_reports_at_origin() {
    let diagnostics = diagnostics("int f(){ return; }");
    assert_eq!(diagnostics.len(), 2);
    assert_diagnostic(&diagnostics[0], 0, 0, "No main function");
    assert_diagnostic(&diagnostics[1], 0, 0, "Missing return value");
}

#[test]
fn test_write_of_function() {
    let diagnostics = diagnostics("void g(){ cout << g; }");
    assert_eq!(diagnostics.len(), 2);
    assert_diagnostic(&diagnostics[0], 0, 0, "No main function");
    assert_diagnostic(&diagnostics[1], 1, 19, "Attempt to write a function");
}

#[test]
fn test_int_condition_is_not_a_bool() {
    // main exists, so no missing-main diagnostic; the wrong return type
    // of main is not flagged in this subset.
    let diagnostics = diagnostics("int main(){ if (1) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        17,
        "Non-bool expression used as an if condition",
    );
}

#[test]
fn test_non_bool_while_condition() {
    let diagnostics = diagnostics("void main(){ while (1) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        21,
        "Non-bool expression used as a while condition",
    );
}

#[test]
fn test_non_int_repeat_clause() {
    let diagnostics = diagnostics("void main(){ repeat (true) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        22,
        "Non-integer expression used as a repeat clause",
    );
}

#[test]
fn test_arithmetic_operand_error_reports_at_operand() {
    let diagnostics = diagnostics("void main(){ int x; x = x + true; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        29,
        "Arithmetic operator applied to non-numeric operand",
    );
}

#[test]
fn test_logical_operand_error_reports_at_operand() {
    let diagnostics = diagnostics("void main(){ bool b; b = 1 && true; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        26,
        "Logical operator applied to non-bool operand",
    );
}

#[test]
fn test_relational_operand_error_reports_at_operand() {
    let diagnostics = diagnostics("void main(){ bool b; b = true < 2; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        26,
        "Relational operator applied to non-numeric operand",
    );
}

#[test]
fn test_equality_of_functions() {
    let diagnostics = diagnostics("void f(){} void g(){} void main(){ if (f == g) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        40,
        "Equality operator applied to functions",
    );
}

#[test]
fn test_equality_of_struct_variables() {
    let source = "struct Point { int x; };\nvoid main(){\n    struct Point p;\n    struct Point q;\n    if (p == q) { }\n}";
    let diagnostics = diagnostics(source);
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        5,
        9,
        "Equality operator applied to struct variables",
    );
}

#[test]
fn test_struct_variable_assignment() {
    let source = "struct Point { int x; };\nvoid main(){\n    struct Point p;\n    struct Point q;\n    p = q;\n}";
    let diagnostics = diagnostics(source);
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 5, 5, "Struct variable assignment");
}

#[test]
fn test_call_of_non_function() {
    let diagnostics = diagnostics("int x; void main(){ x(); }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 1, 21, "Attempt to call a non-function");
}

#[test]
fn test_call_with_wrong_arity() {
    let diagnostics = diagnostics("int f(int a){ return a; } void main(){ f(); }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        40,
        "Function call with wrong number of args",
    );
}

#[test]
fn test_call_with_mismatched_actual() {
    let diagnostics = diagnostics("int f(int a){ return a; } void main(){ f(true); }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        42,
        "Type of actual does not match type of formal",
    );
}

#[test]
fn test_bad_return_value() {
    let diagnostics = diagnostics("int f(){ return true; } void main(){}");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 1, 17, "Bad return value");
}

#[test]
fn test_return_with_value_in_void_function() {
    let diagnostics = diagnostics("void f(){ return 1; } void main(){}");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        18,
        "Return with a value in a void function",
    );
}

#[test]
fn test_write_of_void_call() {
    let diagnostics = diagnostics("void f(){} void main(){ cout << f(); }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 1, 33, "Attempt to write void");
}

#[test]
fn test_write_of_struct_name() {
    let diagnostics =
        diagnostics("struct Point { int x; }; void main(){ cout << Point; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 1, 47, "Attempt to write a struct name");
}

#[test]
fn test_read_of_struct_variable() {
    let source = "struct Point { int x; };\nvoid main(){\n    struct Point p;\n    cin >> p;\n}";
    let diagnostics = diagnostics(source);
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 4, 12, "Attempt to read a struct variable");
}

#[test]
fn test_increment_of_int_variable_is_clean() {
    assert!(analyse("void main(){ int x; x++; }").is_ok());
}

#[test]
fn test_increment_of_non_int() {
    let diagnostics = diagnostics("void main(){ bool b; b++; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        1,
        22,
        "Arithmetic operator applied to non-numeric operand",
    );
}

#[test]
fn test_increment_of_struct_field() {
    let source = "struct Point { int x; };\nvoid main(){\n    struct Point p;\n    p.x++;\n}";
    let diagnostics = diagnostics(source);
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(
        &diagnostics[0],
        4,
        5,
        "Increment or decrement of a struct field",
    );
}

#[test]
fn test_error_type_suppresses_cascades() {
    // x is undeclared; the assignment and the addition over it stay
    // silent after the single name-analysis diagnostic.
    let diagnostics = diagnostics("void main(){ int y; y = x + 1; }");
    assert_eq!(diagnostics.len(), 1);
    assert_diagnostic(&diagnostics[0], 1, 25, "Undeclared identifier");
}
