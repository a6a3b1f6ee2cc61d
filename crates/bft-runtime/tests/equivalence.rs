use bft_core::{Error, OptimizerConfig, Pass, RuntimeConfig};
use bft_ir::{emit, optimize, tokenize, Node, Optimizer, Program};
use bft_runtime::Machine;
use proptest::prelude::*;

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// Read the body statements of emitted C back into nodes.
fn read_emitted(code: &str) -> Vec<Node> {
    let body = code
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with("char *ptr"))
        .skip(1)
        .take_while(|line| *line != "return 0;");

    body.map(|line| match line {
        "ptr++;" => Node::PointerMove(1),
        "ptr--;" => Node::PointerMove(-1),
        "(*ptr)++;" => Node::CellAdjust(1),
        "(*ptr)--;" => Node::CellAdjust(-1),
        "putchar(*ptr);" => Node::Output,
        "*ptr = getchar();" => Node::Input,
        "while (*ptr) {" => Node::LoopStart,
        "}" => Node::LoopEnd,
        other => read_compound(other),
    })
    .collect()
}

fn read_compound(line: &str) -> Node {
    let number = |text: &str| -> i32 { text.trim_end_matches(';').parse().unwrap() };

    if let Some(rest) = line.strip_prefix("ptr += ") {
        Node::PointerMove(number(rest))
    } else if let Some(rest) = line.strip_prefix("ptr -= ") {
        Node::PointerMove(-number(rest))
    } else if let Some(rest) = line.strip_prefix("(*ptr) += ") {
        Node::CellAdjust(number(rest))
    } else if let Some(rest) = line.strip_prefix("(*ptr) -= ") {
        Node::CellAdjust(-number(rest))
    } else if let Some(rest) = line.strip_prefix("*ptr = ") {
        Node::Assign {
            value: number(rest),
            offset: None,
        }
    } else if let Some(rest) = line.strip_prefix("ptr[") {
        let (offset, value) = rest.split_once("] = ").unwrap();
        Node::Assign {
            value: number(value),
            offset: Some(offset.parse().unwrap()),
        }
    } else {
        panic!("unexpected statement: {line}");
    }
}

fn run(nodes: &[Node], input: &[u8]) -> Result<Vec<u8>, Error> {
    Machine::new(RuntimeConfig {
        max_fuel: 200_000,
        ..RuntimeConfig::default()
    })
    .run(nodes, input)
}

#[test]
fn test_hello_world() {
    let nodes = tokenize(HELLO_WORLD);
    assert_eq!(run(&nodes, b"").unwrap(), b"Hello World!\n");
    assert_eq!(run(&optimize(&nodes), b"").unwrap(), b"Hello World!\n");
}

#[test]
fn test_emitted_code_round_trips() {
    let nodes = tokenize(HELLO_WORLD);
    assert_eq!(read_emitted(&emit(&nodes)), nodes);

    let optimized = optimize(&nodes);
    assert_eq!(read_emitted(&emit(&optimized)), optimized);
}

#[test]
fn test_optimization_reduces_fuel() {
    let program = Program::from_source(HELLO_WORLD);
    let (optimized, _) = program.optimized(&Optimizer::default());

    let mut machine = Machine::new(RuntimeConfig::default());
    machine.run(program.nodes(), b"").unwrap();
    let raw_fuel = machine.fuel_consumed();
    machine.run(optimized.nodes(), b"").unwrap();
    assert!(machine.fuel_consumed() < raw_fuel);
}

#[test]
fn test_increment_idiom_sound_with_wrapping() {
    let optimizer = Optimizer::new(OptimizerConfig {
        zero_idiom_accepts_increment: true,
        ..OptimizerConfig::default()
    });
    let nodes = tokenize("+++++[+]>+.<.");
    let optimized = optimizer.optimize(&nodes);
    assert!(optimized.contains(&Node::clear()));
    assert_eq!(run(&nodes, b"").unwrap(), run(&optimized, b"").unwrap());
}

/// Balanced programs built from straight-line chunks and loops
fn program_strategy() -> impl Strategy<Value = String> {
    let leaf = proptest::collection::vec(
        prop_oneof![
            Just(">"),
            Just("<"),
            Just("+"),
            Just("-"),
            Just("."),
            Just(","),
            Just("[-]"),
            Just("x"),
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat());

    leaf.prop_recursive(3, 48, 4, |inner| {
        proptest::collection::vec(
            prop_oneof![inner.clone(), inner.prop_map(|body| format!("[{body}-]"))],
            1..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

/// Collapse errors to their kind so outcomes compare with `==`
fn outcome(result: Result<Vec<u8>, Error>) -> Result<Vec<u8>, &'static str> {
    result.map_err(|err| match err {
        Error::FuelExhausted { .. } => "fuel",
        Error::PointerOutOfBounds { .. } => "bounds",
        _ => "other",
    })
}

proptest! {
    #[test]
    fn prop_optimized_matches_raw(source in program_strategy(), input in proptest::collection::vec(any::<u8>(), 0..8)) {
        // Start right of cell 0 so a few leftward moves stay in bounds
        let source = format!(">>>>>>>>{source}");
        let raw = tokenize(&source);
        // Merged moves skip intermediate cells, so only compare clean runs
        let raw_outcome = outcome(run(&raw, &input));
        prop_assume!(raw_outcome.is_ok());

        let optimized = optimize(&raw);
        prop_assert_eq!(outcome(run(&optimized, &input)), raw_outcome);
    }

    #[test]
    fn prop_each_pass_preserves_output(source in program_strategy()) {
        let source = format!(">>>>>>>>{source}");
        let raw = tokenize(&source);
        let expected = outcome(run(&raw, b"ab"));
        prop_assume!(expected.is_ok());

        let optimizer = Optimizer::default();
        for pass in Pass::standard_pipeline() {
            let rewritten = optimizer.run_pass(pass, &raw);
            prop_assert_eq!(outcome(run(&rewritten, b"ab")), expected.clone());
        }
    }

    #[test]
    fn prop_emitted_code_means_the_same(source in program_strategy()) {
        let source = format!(">>>>>>>>{source}");
        let raw = tokenize(&source);
        let expected = outcome(run(&raw, b"xyz"));
        prop_assume!(expected.is_ok());

        let read_back = read_emitted(&emit(&raw));
        prop_assert_eq!(outcome(run(&read_back, b"xyz")), expected);
    }
}
