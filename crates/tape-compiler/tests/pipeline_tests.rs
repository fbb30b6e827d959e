//! End-to-end pipeline tests.
//!
//! Tests verify the full pipeline: source → lex → parse → encode → Go
//! source, the JSON result shape, error context windows, and that the
//! generated program agrees with the reference evaluator.

use pretty_assertions::assert_eq;
use tape_compiler::{
    compile, compile_to_result, context_window, parse, CompileOptions, CONTEXT_RADIUS,
};
use tape_types::ast::{Dialect, Node};
use tape_types::{ErrorCode, Span};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const CANONICAL: &str = "+++[>+++[>+++<-]<-]>+.";

const HELLO: &str = "\
++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn options() -> CompileOptions {
    CompileOptions::default()
}

fn classic() -> CompileOptions {
    CompileOptions {
        dialect: Dialect::Classic,
        ..CompileOptions::default()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Compile
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_canonical_compiles() {
    let code = compile(CANONICAL, &options()).unwrap();
    assert!(code.starts_with("package main\n"));
    assert_eq!(code.matches("for registers[currentIndex] != 0 {").count(), 2);
    assert_eq!(code.matches("fmt.Print(").count(), 1);
}

#[test]
fn test_hello_world_compiles() {
    let code = compile(HELLO, &options()).unwrap();
    assert!(code.contains("import \"fmt\""));
    assert!(!code.contains("import \"io\""));
    assert_eq!(code.matches("fmt.Print(").count(), 13);
}

#[test]
fn test_empty_source_is_a_valid_program() {
    let code = compile("", &options()).unwrap();
    assert!(code.contains("// Program begin\n\t// Program end\n"));
}

#[test]
fn test_comments_do_not_change_output() {
    let plain = compile("+[-].", &options()).unwrap();
    let commented = compile("add one + then [ clear - ] and print .", &options()).unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn test_classic_dialect_through_pipeline() {
    let code = compile("{+}!", &classic()).unwrap();
    assert!(!code.contains("functions"));
}

#[test]
fn test_indent_option_reaches_encoder() {
    let options = CompileOptions {
        indent: "  ".to_string(),
        ..CompileOptions::default()
    };
    let code = compile("+", &options).unwrap();
    assert!(code.contains("\n  registers[currentIndex] += 1\n"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Parse
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_frames_program() {
    let program = parse("+.", &options()).unwrap();
    assert!(matches!(program.nodes.first(), Some(Node::Preamble(_))));
    assert!(matches!(program.nodes.last(), Some(Node::Postamble(_))));
    assert_eq!(program.nodes.len(), 4);
}

#[test]
fn test_max_depth_option_reaches_parser() {
    let options = CompileOptions {
        max_depth: 2,
        ..CompileOptions::default()
    };
    assert!(parse("[[]]", &options).is_ok());
    let err = parse("[[[]]]", &options).unwrap_err();
    assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);
    assert_eq!(err.span, Span::new(2, 3));
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unmatched_closer_error() {
    let err = compile("+]", &options()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNMATCHED_CLOSER);
    assert_eq!(
        err.to_string(),
        "Error: Loop closed while not open, Position: 1 - 2"
    );
}

#[test]
fn test_unclosed_opener_error() {
    let err = compile("+[", &options()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNCLOSED_OPENER);
    assert_eq!(err.span, Span::new(1, 2));
}

#[test]
fn test_context_window_around_error() {
    let source = "0123456789abcdefghij]klmnopqrstuvwxyz";
    let err = compile(source, &options()).unwrap_err();
    assert_eq!(
        context_window(source, err.span, CONTEXT_RADIUS),
        "abcdefghij]klmnopqrst"
    );
}

#[test]
fn test_context_window_clamped_at_edges() {
    assert_eq!(context_window("]", Span::new(0, 1), CONTEXT_RADIUS), "]");
    assert_eq!(context_window("ab]", Span::new(2, 3), 1), "b]");
}

// ══════════════════════════════════════════════════════════════════════════════
// CompileResult
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_result_on_success() {
    let result = compile_to_result(CANONICAL, "canonical.tape", &options());
    assert!(result.success);
    assert!(!result.errors.has_errors());
    let output = result.output.as_deref().unwrap();
    assert_eq!(output, compile(CANONICAL, &options()).unwrap());
    let hash = result.source_hash.unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_result_on_failure() {
    let result = compile_to_result("}", "bad.tape", &options());
    assert!(!result.success);
    assert_eq!(result.filename, "bad.tape");
    assert!(result.output.is_none());
    assert!(result.source_hash.is_none());
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.errors.errors[0].code, ErrorCode::UNMATCHED_CLOSER);
}

#[test]
fn test_result_serializes_to_json() {
    let result = compile_to_result("+.", "x.tape", &options());
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["output"].as_str().unwrap().contains("package main"));
    assert_eq!(json["errors"]["total_errors"], 0);
    assert_eq!(json["filename"], "x.tape");
}

#[test]
fn test_error_json_carries_code_and_span() {
    let result = compile_to_result("[", "x.tape", &options());
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    let error = &json["errors"]["errors"][0];
    assert_eq!(error["code"], 102);
    assert_eq!(error["message"], "Loop opened but never closed");
    assert_eq!(error["span"]["start"], 0);
    assert_eq!(error["span"]["end"], 1);
}

// ══════════════════════════════════════════════════════════════════════════════
// Agreement with the evaluator
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_hello_world_runs() {
    let program = parse(HELLO, &options()).unwrap();
    let outcome = tape_eval::run(&program, b"").unwrap();
    assert_eq!(outcome.output_text(), "Hello World!\n");
}

#[test]
fn test_io_flags_match_evaluated_behaviour() {
    let program = parse(",[.,]", &options()).unwrap();
    let Some(Node::Preamble(preamble)) = program.nodes.first() else {
        panic!("expected preamble first");
    };
    assert!(preamble.uses_input);
    assert!(preamble.uses_output);
    let outcome = tape_eval::run(&program, b"abc").unwrap();
    assert_eq!(outcome.output_text(), "abc");
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compile_determinism_100_iterations() {
    let first = compile_to_result(HELLO, "hello.tape", &options());
    for i in 0..100 {
        let again = compile_to_result(HELLO, "hello.tape", &options());
        assert_eq!(
            first.source_hash, again.source_hash,
            "Determinism failure at iteration {i}"
        );
    }
}
