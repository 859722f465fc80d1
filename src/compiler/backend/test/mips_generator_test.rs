use std::collections::HashSet;

use super::compile;
use crate::compiler::{
    CompileError, Compiler, GibberishSemanticAnalyser, InternalError, MipsCodeGenerator,
    PestGibberishParser,
};

#[test]
fn test_empty_main_prologue_and_exit_sequence() {
    let assembly = compile("void main(){}");

    // main is exported both prefixed and unprefixed.
    assert!(assembly.contains("\t.globl main\n"));
    assert!(assembly.contains("main:\n"));
    assert!(assembly.contains("_main:\n"));

    // Zero formals, zero locals: FP sits 8 bytes above SP after the two
    // saved words, and no local space is reserved.
    assert!(assembly.contains("\taddu\t$fp, $sp, 8\n"));

    // The epilogue exits through service 10 instead of jr.
    assert!(assembly.contains("_main_Exit:\n"));
    assert!(assembly.contains("\tlw\t$ra, 0($fp)\n"));
    assert!(assembly.contains("\tlw\t$fp, -4($fp)\n"));
    assert!(assembly.contains("\tli\t$v0, 10\n"));
    assert!(assembly.contains("\tsyscall\n"));
    assert!(!assembly.contains("\tjr\t$ra\n"));
}

#[test]
fn test_global_variable_reservation_and_access() {
    let assembly = compile("int g; void main(){ g = 1; }");

    assert!(assembly.contains("\t.align 2\n"));
    assert!(assembly.contains("_g:\t.space 4\n"));
    assert!(assembly.contains("\tla\t$t0, _g\n"));
    assert!(assembly.contains("\tsw\t$t1, 0($t0)\n"));
}

#[test]
fn test_formal_access_and_function_frame() {
    let assembly = compile("int id(int a){ return a; }\nvoid main(){ int r; r = id(5); }");

    // One formal: FP raised past 4 bytes of argument plus the two saved
    // words; the first formal reads at offset 0 from FP.
    assert!(assembly.contains("\taddu\t$fp, $sp, 12\n"));
    assert!(assembly.contains("\tlw\t$t0, 0($fp)\n"));
    assert!(assembly.contains("\tjal\t_id\n"));
    assert!(assembly.contains("_id_Exit:\n"));
    assert!(assembly.contains("\tjr\t$ra\n"));
}

#[test]
fn test_local_access_uses_frame_offset() {
    let assembly = compile("void main(){ int x; x = 7; }");

    // First local of a zero-formal function lives at -8($fp).
    assert!(assembly.contains("\tsubu\t$sp, $sp, 4\n"));
    assert!(assembly.contains("\tla\t$t0, -8($fp)\n"));
}

#[test]
fn test_multiplication_fetches_low_word() {
    let assembly = compile("void main(){ int x; x = 2 * 3; }");

    assert!(assembly.contains("\tmult\t$t0, $t1\n"));
    assert!(assembly.contains("\tmflo\t$t0\n"));
}

#[test]
fn test_short_circuit_and_branches_past_rhs() {
    let assembly = compile("void main(){ bool b; b = false && true; }");

    // The left operand is popped and tested; an unconditional jump takes
    // the evaluated right side past the short-circuit constant.
    assert!(assembly.contains("\tbeq\t$t0, 0, _L0\n"));
    assert!(assembly.contains("\tj\t_L1\n"));
    assert!(assembly.contains("_L0:\n"));
    assert!(assembly.contains("_L1:\n"));
}

#[test]
fn test_if_condition_uses_two_label_jump() {
    let assembly = compile("void main(){ int x; x = 0; if (x < 1) { x = 2; } }");

    // then-label _L0, done-label _L1: branch on false, jump on true.
    assert!(assembly.contains("\tbeq\t$t0, 0, _L1\n"));
    assert!(assembly.contains("\tj\t_L0\n"));
    assert!(assembly.contains("_L0:\n"));
    assert!(assembly.contains("_L1:\n"));
}

#[test]
fn test_while_loops_back_to_condition() {
    let assembly = compile("void main(){ while (true) { } }");

    // entry _L0, body _L1, done _L2; a true literal jumps straight to the
    // body and the body jumps back to the entry.
    assert!(assembly.contains("_L0:\n"));
    assert!(assembly.contains("\tj\t_L1\n"));
    assert!(assembly.contains("\tj\t_L0\n"));
    assert!(assembly.contains("_L2:\n"));
}

#[test]
fn test_string_literals_are_interned_by_contents() {
    let assembly = compile("void main(){ cout << \"hi\"; cout << \"hi\"; }");

    assert_eq!(assembly.matches(".asciiz").count(), 1);
    assert!(assembly.contains("_S0:\t.asciiz \"hi\"\n"));
    assert_eq!(assembly.matches("\tla\t$t0, _S0\n").count(), 2);
    // Strings print through service 4.
    assert!(assembly.contains("\tli\t$v0, 4\n"));
}

#[test]
fn test_write_int_uses_print_int_service() {
    let assembly = compile("void main(){ cout << 3; }");

    assert!(assembly.contains("\tlw\t$a0, 4($sp)\n"));
    assert!(assembly.contains("\tli\t$v0, 1\n"));
}

#[test]
fn test_read_stores_service_result_through_target_address() {
    let assembly = compile("void main(){ int x; cin >> x; }");

    assert!(assembly.contains("\tli\t$v0, 5\n"));
    assert!(assembly.contains("\tsw\t$v0, 0($t0)\n"));
}

#[test]
fn test_repeat_generates_no_code() {
    let assembly = compile("void main(){ repeat (3) { cout << 5; } }");

    // Neither the clause nor the body reaches the text section.
    assert!(!assembly.contains("\tli\t$t0, 3\n"));
    assert!(!assembly.contains("\tli\t$t0, 5\n"));
    assert!(!assembly.contains("\tli\t$v0, 1\n"));
}

#[test]
fn test_returns_in_both_branches_share_one_epilogue() {
    let source = "int f(int a){\n\
                      if (a < 0) {\n\
                          return 0;\n\
                      } else {\n\
                          return a;\n\
                      }\n\
                  }\n\
                  void main(){}";
    let assembly = compile(source);

    assert_eq!(assembly.matches("\tj\t_f_Exit\n").count(), 2);
    assert_eq!(assembly.matches("_f_Exit:\n").count(), 1);
}

#[test]
fn test_text_labels_are_unique() {
    let source = "void main(){\n\
                      int x;\n\
                      x = 0;\n\
                      while (x < 3) {\n\
                          if (x == 1) {\n\
                              cout << \"one\";\n\
                          } else {\n\
                              cout << \"other\";\n\
                          }\n\
                          x++;\n\
                      }\n\
                  }";
    let assembly = compile(source);

    let label_pattern = regex::Regex::new(r"(?m)^([A-Za-z_][A-Za-z0-9_]*):").unwrap();
    let mut seen = HashSet::new();
    for captures in label_pattern.captures_iter(&assembly) {
        let label = captures.get(1).unwrap().as_str().to_string();
        assert!(seen.insert(label.clone()), "label {} emitted twice", label);
    }
    assert!(seen.len() >= 6, "expected a full label set, got {:?}", seen);
}

#[test]
fn test_output_is_deterministic() {
    let source = "int g;\nvoid main(){ int x; x = g + 1; if (x == 2) { cout << \"two\"; } }";
    assert_eq!(compile(source), compile(source));
}

#[test]
fn test_struct_field_at_runtime_is_an_internal_error() {
    let source = "struct Point { int x; };\nvoid main(){ struct Point p; p.x = 1; }";
    let compiler: Compiler<PestGibberishParser, GibberishSemanticAnalyser, MipsCodeGenerator> =
        Compiler::default();

    match compiler.compile_str(source) {
        Err(CompileError::Internal(InternalError::UnsupportedConstruct(_))) => {}
        other => panic!("expected an internal error, got {:?}", other.map(|_| "assembly")),
    }
}

#[test]
fn test_call_arguments_push_left_to_right() {
    let source = "int add(int a, int b){ return a + b; }\nvoid main(){ int r; r = add(1, 2); }";
    let assembly = compile(source);

    // Two formals: FP raised past 8 bytes of arguments plus saved words.
    assert!(assembly.contains("\taddu\t$fp, $sp, 16\n"));
    let first = assembly.find("\tli\t$t0, 1\n").expect("first argument");
    let second = assembly.find("\tli\t$t0, 2\n").expect("second argument");
    let call = assembly.find("\tjal\t_add\n").expect("call");
    assert!(first < second);
    assert!(second < call);
}
