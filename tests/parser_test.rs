use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use iulia::parser::{
    expression::{Expression, LiteralKind},
    formatter::{BasicParserFormatter, ParserFormatter},
    statement::Statement,
    Parser, ParserErrorKind, Program,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let formatter = BasicParserFormatter::new(input);
    let actual = match Parser::new(input).parse() {
        Ok(ref program) => formatter.format(program),
        Err(ref error) => formatter.format_error(error),
    };

    assert_eq!(actual.trim_end(), expected.trim_end(), "Failed the test {test_name}");
}

fn parse(input: &str) -> Program {
    Parser::new(input).parse().expect("test program should parse")
}

fn first_statement(program: &Program) -> &Statement {
    &program[program.root()].statements[0]
}

#[test]
fn smoke_test() {
    check("{ }", "{ }", "smoke");
}

#[test]
fn single_block_becomes_the_root() {
    let program = parse("{ let x := 1 }");
    let root = &program[program.root()];
    assert_eq!(root.statements.len(), 1);
    assert!(matches!(root.statements[0], Statement::VariableDeclaration(_)));
}

#[test]
fn statement_sequence_is_wrapped_in_a_root_block() {
    let program = parse("let x := 1\n{ }");
    let root = &program[program.root()];
    assert_eq!(root.statements.len(), 2);
    assert!(matches!(root.statements[1], Statement::Block(_)));
}

#[test]
fn known_instructions_are_not_function_calls() {
    let program = parse("{ sstore(0, helper(1)) }");
    let Statement::Expression(statement) = first_statement(&program) else {
        panic!("expected an expression statement");
    };
    let Expression::Instruction(call) = &program[statement.expr] else {
        panic!("expected an instruction call");
    };
    assert_eq!(call.instruction.name, "sstore");
    assert!(matches!(
        program[call.arguments[1]],
        Expression::FunctionCall(ref call) if call.function.name == "helper"
    ));
}

#[test]
fn literals_keep_their_kind_and_text() {
    let program = parse(r#"{ let a, b, c := f(0x10, true, "x\ty") }"#);
    let Statement::VariableDeclaration(declaration) = first_statement(&program) else {
        panic!("expected a declaration");
    };
    let Some(value) = declaration.value else {
        panic!("expected an initializer");
    };
    let Expression::FunctionCall(call) = &program[value] else {
        panic!("expected a function call");
    };
    let literals: Vec<_> = call
        .arguments
        .iter()
        .map(|argument| match &program[*argument] {
            Expression::Literal(literal) => (literal.kind, literal.text().into_owned()),
            other => panic!("expected a literal, got {other:?}"),
        })
        .collect();
    assert_eq!(
        literals,
        vec![
            (LiteralKind::Number, "0x10".to_string()),
            (LiteralKind::Boolean, "true".to_string()),
            (LiteralKind::String, "x\ty".to_string()),
        ]
    );
}

#[test]
fn string_literals_hold_raw_bytes() {
    let program = parse(r#"{ sstore(0, "\xff\x41") }"#);
    let Statement::Expression(statement) = first_statement(&program) else {
        panic!("expected an expression statement");
    };
    let Expression::Instruction(call) = &program[statement.expr] else {
        panic!("expected an instruction call");
    };
    let Expression::Literal(literal) = &program[call.arguments[1]] else {
        panic!("expected a literal");
    };
    assert_eq!(literal.value, vec![0xff, b'A']);
}

#[test]
fn non_ascii_string_bytes_print_as_escapes() {
    check(
        r#"{ sstore(0, "\xffé\x41") }"#,
        "{\n    sstore(0, \"\\xff\\xc3\\xa9A\")\n}",
        "non_ascii_string",
    );
}

#[test]
fn type_annotations_are_ignored() {
    let program = parse("{ let x:u256 := 1:u256 function f(a:bool) -> r:u8 { } }");
    let Statement::VariableDeclaration(declaration) = first_statement(&program) else {
        panic!("expected a declaration");
    };
    assert_eq!(declaration.names[0].name, "x");
}

#[test]
fn switch_without_default_is_accepted() {
    let program = parse("{ switch 1 case 1 { } case 2 { } }");
    let Statement::Switch(statement) = first_statement(&program) else {
        panic!("expected a switch");
    };
    assert_eq!(statement.cases.len(), 2);
    assert!(statement.cases.iter().all(|case| case.guard.is_some()));
}

#[test]
fn only_default_is_accepted() {
    let program = parse("{ switch 1 default { } }");
    let Statement::Switch(statement) = first_statement(&program) else {
        panic!("expected a switch");
    };
    assert_eq!(statement.cases.len(), 1);
    assert!(statement.cases[0].guard.is_none());
}

#[test]
fn errors_carry_codes() {
    let error = Parser::new("{ if }").parse().unwrap_err();
    assert_eq!(
        error.kind,
        ParserErrorKind::NonExpression(iulia::lexer::TokenKind::RightBrace)
    );
    assert_eq!(error.code(), "PA003");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "yul" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one parser test case failed");

    Ok(())
}

// Property-based tests

fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[0-9]{1,10}".prop_map(|s| s),
        "0x[0-9a-f]{1,8}".prop_map(|s| s),
        "v[a-z0-9]{0,4}".prop_map(|s| s),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("add({a}, {b})")),
            inner.clone().prop_map(|a| format!("iszero({a})")),
            prop::collection::vec(inner, 0..3)
                .prop_map(|args| format!("user({})", args.join(", "))),
        ]
    })
}

proptest! {
    #[test]
    fn printed_programs_parse_back_to_the_same_text(expr in expression_strategy()) {
        let input = format!("{{ let result := {expr} }}");
        let program = Parser::new(&input).parse();
        prop_assert!(program.is_ok());
        let formatter = BasicParserFormatter::new(&input);
        let printed = formatter.format(&program.unwrap());
        let reparsed = Parser::new(&printed).parse();
        prop_assert!(reparsed.is_ok());
        prop_assert_eq!(formatter.format(&reparsed.unwrap()), printed);
    }
}
