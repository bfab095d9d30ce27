use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use iulia::{
    interpreter::{
        formatter::{BasicRuntimeFormatter, RuntimeFormatter},
        Interpreter, RuntimeError, RuntimeErrorKind,
    },
    lexer::Span,
    machine::{
        error::{Halt, MachineError},
        formatter::{BasicStateFormatter, StateFormatter},
        InstructionEvaluator, WordMachine,
    },
    parser::{
        expression::{Expression, InstructionCall, Literal, LiteralKind},
        statement::{Block, ExpressionStatement, Statement, VariableDeclaration},
        Parser, Program, ProgramBuilder,
    },
    string::Ident,
    value::{error::LiteralError, Word},
};

fn check(input: &str, expected: &str, test_name: &str) {
    let program = Parser::new(input)
        .parse()
        .expect("interpreter test programs should parse");
    let mut machine = WordMachine::new();
    let result = Interpreter::new(&program, &mut machine).run();

    let state_formatter = BasicStateFormatter;
    let mut actual = state_formatter.format_state(&machine);
    if let Err(error) = result {
        match error.halt() {
            Some(halt) => actual.push_str(&state_formatter.format_halt(halt)),
            None => actual.push_str(&BasicRuntimeFormatter::new(input).format_error(&error)),
        }
    }

    assert_eq!(actual.trim_end(), expected.trim_end(), "Failed the test {test_name}");
}

fn run(input: &str) -> (WordMachine, Result<(), RuntimeError>) {
    let program = Parser::new(input)
        .parse()
        .expect("interpreter test programs should parse");
    let mut machine = WordMachine::new();
    let result = Interpreter::new(&program, &mut machine).run();
    (machine, result)
}

fn run_program(program: &Program) -> Result<(), RuntimeError> {
    let mut machine = WordMachine::new();
    Interpreter::new(program, &mut machine).run()
}

fn word(value: u64) -> Word {
    Word::from(value)
}

#[test]
fn smoke_test() {
    check("{ sstore(1, 2) }", "storage 1 => 2", "smoke");
}

#[test]
fn arguments_are_evaluated_right_to_left() {
    let (machine, result) = run("{ sstore(sload(1), sload(2)) }");
    assert!(result.is_ok());
    let formatter = BasicStateFormatter;
    assert_eq!(
        formatter.format_trace(&machine),
        "sload(2)\nsload(1)\nsstore(0, 0)\n"
    );
}

#[test]
fn function_arguments_keep_their_written_order() {
    let (machine, result) = run(
        "{
            function store(a, b, c) {
                sstore(1, a)
                sstore(2, b)
                sstore(3, c)
            }
            store(add(10, 0), add(20, 0), add(30, 0))
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&word(1)), word(10));
    assert_eq!(machine.sload(&word(2)), word(20));
    assert_eq!(machine.sload(&word(3)), word(30));
    let adds: Vec<String> = machine
        .trace()
        .iter()
        .filter(|entry| entry.instruction.name() == "add")
        .map(ToString::to_string)
        .collect();
    assert_eq!(adds, vec!["add(30, 0)", "add(20, 0)", "add(10, 0)"]);
}

#[test]
fn for_loop_runs_its_initializer_once() {
    let (machine, result) = run(
        "{
            for { let i := 0 sstore(99, add(sload(99), 1)) } lt(i, 3) { i := add(i, 1) } {
                sstore(i, add(i, 1))
            }
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&word(99)), word(1));
    assert_eq!(machine.sload(&word(0)), word(1));
    assert_eq!(machine.sload(&word(2)), word(3));
}

#[test]
fn loop_variables_are_gone_after_the_loop() {
    let (_, result) = run("{ for { let i := 0 } i { } { } i := 1 }");
    let error = result.unwrap_err();
    assert_eq!(error.kind, RuntimeErrorKind::UndeclaredAssignment("i".into()));
}

#[test]
fn switch_stops_at_the_first_match() {
    let (machine, result) = run(
        "{
            switch 2
            case 1 { sstore(1, 1) }
            case 2 { sstore(2, 2) }
            case 2 { sstore(3, 3) }
            default { sstore(4, 4) }
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.storage().len(), 1);
    assert_eq!(machine.sload(&word(2)), word(2));
}

#[test]
fn switch_without_match_or_default_does_nothing() {
    let (machine, result) = run("{ switch 5 case 1 { sstore(1, 1) } }");
    assert!(result.is_ok());
    assert!(machine.storage().is_empty());
}

#[test]
fn condition_must_be_a_single_value() {
    let (_, result) = run("{ function none() { } if none() { } }");
    assert_eq!(
        result.unwrap_err().kind,
        RuntimeErrorKind::ArityMismatch {
            expected: 1,
            actual: 0
        }
    );
}

#[test]
fn parameters_do_not_leak_into_the_caller() {
    let (machine, result) = run(
        "{
            function id(a) -> r { r := a }
            let a := id(7)
            sstore(1, a)
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&word(1)), word(7));
}

#[test]
fn callee_sees_functions_visible_at_the_call_site() {
    let (machine, result) = run(
        "{
            function double(x) -> y { y := mul(x, 2) }
            {
                function quadruple(x) -> y { y := double(double(x)) }
                sstore(1, quadruple(3))
            }
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&word(1)), word(12));
}

#[test]
fn callee_does_not_see_caller_variables() {
    let (_, result) = run(
        "{
            let secret := 1
            function peek() -> r { r := secret }
            sstore(0, peek())
        }",
    );
    assert_eq!(
        result.unwrap_err().kind,
        RuntimeErrorKind::UndefinedVariable("secret".into())
    );
}

#[test]
fn functions_are_removed_when_their_block_closes() {
    let (_, result) = run("{ { function f() { } } f() }");
    assert_eq!(
        result.unwrap_err().kind,
        RuntimeErrorKind::UndefinedFunction("f".into())
    );
}

#[test]
fn duplicate_functions_in_one_block_are_rejected() {
    let (_, result) = run("{ function f() { } function f() { } }");
    let error = result.unwrap_err();
    assert_eq!(error.kind, RuntimeErrorKind::DuplicateDeclaration("f".into()));
    assert!(!error.is_internal());
}

#[test]
fn variables_may_not_shadow_functions() {
    let (_, result) = run("{ function f() { } let f := 1 }");
    assert_eq!(
        result.unwrap_err().kind,
        RuntimeErrorKind::DuplicateDeclaration("f".into())
    );
}

#[test]
fn parameters_may_reuse_names_of_caller_functions() {
    let (machine, result) = run(
        "{
            function g(h) -> r { r := h }
            function f() -> r {
                function h() { }
                r := g(5)
            }
            sstore(0, f())
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&Word::ZERO), word(5));
}

#[test]
fn callee_locals_may_reuse_names_of_caller_functions() {
    let (machine, result) = run(
        "{
            function g() -> r {
                let h := 7
                r := h
            }
            function f() -> r {
                function h() { }
                r := g()
            }
            sstore(0, f())
        }",
    );
    assert!(result.is_ok());
    assert_eq!(machine.sload(&Word::ZERO), word(7));
}

#[test]
fn string_literals_are_left_aligned() {
    let (machine, result) = run(r#"{ sstore(0, "ab") sstore(1, "0123456789abcdef0123456789abcdef") }"#);
    assert!(result.is_ok());
    let mut expected = [0u8; 32];
    expected[0] = b'a';
    expected[1] = b'b';
    assert_eq!(machine.sload(&word(0)), Word::from_be_bytes(expected));
    let full: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
    assert_eq!(machine.sload(&word(1)), Word::from_be_bytes(full));
}

#[test]
fn string_escapes_above_ascii_are_raw_bytes() {
    let (machine, result) = run(r#"{ sstore(0, "\xff\x80") sstore(1, "é") }"#);
    assert!(result.is_ok());
    let mut expected = [0u8; 32];
    expected[0] = 0xff;
    expected[1] = 0x80;
    assert_eq!(machine.sload(&Word::ZERO), Word::from_be_bytes(expected));
    let mut expected = [0u8; 32];
    expected[..2].copy_from_slice("é".as_bytes());
    assert_eq!(machine.sload(&word(1)), Word::from_be_bytes(expected));
}

#[test]
fn hex_and_boolean_literals() {
    let (machine, result) = run("{ sstore(0xff, true) sstore(1, false) }");
    assert!(result.is_ok());
    assert_eq!(machine.sload(&word(255)), word(1));
    assert_eq!(machine.sload(&word(1)), Word::ZERO);
}

#[test]
fn oversized_number_literal_is_rejected() {
    let too_big = format!("0x1{}", "0".repeat(64));
    let (_, result) = run(&format!("{{ sstore(0, {too_big}) }}"));
    assert_eq!(
        result.unwrap_err().kind,
        RuntimeErrorKind::Literal(LiteralError::NumberOverflow(too_big.into()))
    );
}

#[test]
fn halting_stops_execution() {
    let (machine, result) = run("{ sstore(1, 1) stop() sstore(2, 2) }");
    let error = result.unwrap_err();
    assert_eq!(error.halt(), Some(&Halt::Stop));
    assert_eq!(error.code(), "WM004");
    assert_eq!(machine.storage().len(), 1);
}

#[test]
fn initial_variables_are_visible() {
    let program = Parser::new("{ sstore(0, input) }").parse().unwrap();
    let mut machine = WordMachine::new();
    let result = Interpreter::new(&program, &mut machine)
        .with_variables([("input", word(5))])
        .run();
    assert!(result.is_ok());
    assert_eq!(machine.sload(&Word::ZERO), word(5));
}

#[test]
fn malformed_boolean_literal_is_rejected() {
    let mut builder = ProgramBuilder::new();
    let literal = builder.push_expression(Expression::Literal(Literal {
        kind: LiteralKind::Boolean,
        value: "yes".into(),
        span: Span::default(),
    }));
    let root = builder.push_block(Block {
        statements: vec![Statement::VariableDeclaration(VariableDeclaration {
            names: vec![Ident::new("x", Span::default())],
            value: Some(literal),
            span: Span::default(),
        })],
        span: Span::default(),
    });
    let program = builder.finish(root);

    let error = run_program(&program).unwrap_err();
    assert_eq!(
        error.kind,
        RuntimeErrorKind::Literal(LiteralError::InvalidBool("yes".into()))
    );
    assert_eq!(error.code(), "RT009");
}

#[test]
fn unknown_instruction_fails_in_the_machine() {
    let mut builder = ProgramBuilder::new();
    let call = builder.push_expression(Expression::Instruction(InstructionCall {
        instruction: Ident::new("frobnicate", Span::default()),
        arguments: vec![],
        span: Span::default(),
    }));
    let root = builder.push_block(Block {
        statements: vec![Statement::Expression(ExpressionStatement {
            expr: call,
            span: Span::default(),
        })],
        span: Span::default(),
    });
    let program = builder.finish(root);

    let error = run_program(&program).unwrap_err();
    assert_eq!(
        error.kind,
        RuntimeErrorKind::Machine(MachineError::UnknownInstruction("frobnicate".into()))
    );
}

/// Stands in for a machine by answering every instruction with the sum of
/// its arguments.
#[derive(Default)]
struct Summing {
    calls: Vec<(String, Vec<Word>)>,
}

impl InstructionEvaluator for Summing {
    fn evaluate(&mut self, instruction: &str, arguments: &[Word]) -> Result<Word, MachineError> {
        self.calls.push((instruction.to_string(), arguments.to_vec()));
        Ok(arguments
            .iter()
            .fold(Word::ZERO, |total, argument| total.wrapping_add(*argument)))
    }
}

#[test]
fn any_instruction_evaluator_can_drive_the_interpreter() {
    let program = Parser::new("{ pop(mul(2, 3)) }").parse().unwrap();
    let mut machine = Summing::default();
    let evaluator: &mut dyn InstructionEvaluator = &mut machine;
    assert!(Interpreter::new(&program, evaluator).run().is_ok());
    assert_eq!(
        machine.calls,
        vec![
            ("mul".to_string(), vec![word(2), word(3)]),
            ("pop".to_string(), vec![word(5)]),
        ]
    );
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/in");
    let output_dir = Path::new("./test_data/interpreter/out");

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

    assert!(succeeded, "At least one interpreter test case failed");

    Ok(())
}

// Property-based tests

proptest! {
    #[test]
    fn argument_order_holds_for_any_arity(count in 1usize..8) {
        let parameters: Vec<String> = (0..count).map(|i| format!("a{i}")).collect();
        let stores: Vec<String> = (0..count)
            .map(|i| format!("sstore({}, a{i})", 100 + i))
            .collect();
        let arguments: Vec<String> = (0..count).map(|i| format!("add({i}, 1)")).collect();
        let input = format!(
            "{{ function f({}) {{ {} }} f({}) }}",
            parameters.join(", "),
            stores.join(" "),
            arguments.join(", ")
        );
        let (machine, result) = run(&input);
        prop_assert!(result.is_ok());

        let evaluated: Vec<String> = machine
            .trace()
            .iter()
            .filter(|entry| entry.instruction.name() == "add")
            .map(ToString::to_string)
            .collect();
        let expected: Vec<String> = (0..count).rev().map(|i| format!("add({i}, 1)")).collect();
        prop_assert_eq!(evaluated, expected);

        for i in 0..count {
            prop_assert_eq!(machine.sload(&word(100 + i as u64)), word(i as u64 + 1));
        }
    }

    #[test]
    fn declarations_without_initializer_read_zero(count in 1usize..6) {
        let names: Vec<String> = (0..count).map(|i| format!("v{i}")).collect();
        let stores: Vec<String> = (0..count)
            .map(|i| format!("sstore({}, iszero(v{i}))", i + 1))
            .collect();
        let input = format!("{{ let {} {} }}", names.join(", "), stores.join(" "));
        let (machine, result) = run(&input);
        prop_assert!(result.is_ok());
        for i in 0..count {
            prop_assert_eq!(machine.sload(&word(i as u64 + 1)), word(1));
        }
    }

    #[test]
    fn short_strings_fill_memory_from_the_left(text in "[a-zA-Z0-9 ]{0,32}") {
        let input = format!("{{ mstore(0, \"{text}\") }}");
        let (machine, result) = run(&input);
        prop_assert!(result.is_ok());
        let memory = machine.memory().as_bytes();
        prop_assert_eq!(&memory[..text.len()], text.as_bytes());
        prop_assert!(memory[text.len()..32].iter().all(|byte| *byte == 0));
    }
}
