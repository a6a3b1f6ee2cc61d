//! Command line driver: reads a Brainfuck file and writes its C translation.

mod telemetry;

use anyhow::{Context, Result};
use bft_core::{Pass, TranspilerConfig};
use bft_ir::{validate_loops, Emitter, Optimizer, Program};
use bft_runtime::Machine;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitKind {
    /// C source
    C,
    /// The optimized IR as JSON
    Ir,
    /// The optimized IR decompiled back to Brainfuck
    Bf,
}

#[derive(Debug, Parser)]
#[command(name = "bft", version, about = "Translate Brainfuck to C with peephole optimizations")]
struct Args {
    /// Brainfuck source file
    input: PathBuf,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to produce
    #[arg(long, value_enum, default_value_t = EmitKind::C)]
    emit: EmitKind,

    /// Comma separated passes, e.g. `pointer-moves,cell-adjusts,zero-idiom`
    #[arg(long, conflicts_with = "no_opt")]
    passes: Option<String>,

    /// Skip all optimization passes
    #[arg(long)]
    no_opt: bool,

    /// Interpret the program with stdin as input instead of emitting code
    #[arg(long, conflicts_with_all = ["output", "compare"])]
    run: bool,

    /// Write `<stem>.unopt.c` and `<stem>.c` next to the input
    #[arg(long, conflicts_with = "output")]
    compare: bool,

    /// Do not reject unbalanced loops before translating
    #[arg(long)]
    no_validate: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pass statistics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.verbose)?;

    let config = load_config(&args)?;
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let program = Program::from_source(&source);
    if args.no_validate {
        warn!("Loop validation disabled; unbalanced input emits malformed C");
    } else {
        validate_loops(program.nodes())
            .with_context(|| format!("{} is not a well-formed program", args.input.display()))?;
    }

    let optimizer = Optimizer::new(config.optimizer.clone());
    let (optimized, stats) = program.optimized(&optimizer);
    info!(
        "Optimized {} nodes to {} ({} removed)",
        stats.nodes_before,
        stats.nodes_after,
        stats.nodes_removed()
    );

    if args.run {
        return run(&config, &optimized);
    }

    let emitter = Emitter::new(config.emitter.clone());
    if args.compare {
        let unoptimized_path = args.input.with_extension("unopt.c");
        let optimized_path = args.input.with_extension("c");
        write_file(&unoptimized_path, &emitter.emit_program(&program))?;
        write_file(&optimized_path, &emitter.emit_program(&optimized))?;
        info!(
            "Wrote {} and {}",
            unoptimized_path.display(),
            optimized_path.display()
        );
        return Ok(());
    }

    let rendered = match args.emit {
        EmitKind::C => emitter.emit_program(&optimized),
        EmitKind::Ir => optimized.to_json()?,
        EmitKind::Bf => format!("{}\n", optimized.to_source()),
    };

    match &args.output {
        Some(path) => write_file(path, &rendered),
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout"),
    }
}

fn load_config(args: &Args) -> Result<TranspilerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            TranspilerConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => TranspilerConfig::default(),
    };

    if args.no_opt {
        config.optimizer.passes.clear();
    } else if let Some(list) = &args.passes {
        config.optimizer.passes = Pass::parse_list(list)?;
    }

    info!(
        "Passes: {}",
        config
            .optimizer
            .passes
            .iter()
            .map(Pass::name)
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(config)
}

fn run(config: &TranspilerConfig, program: &Program) -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read stdin")?;

    let mut machine = Machine::new(config.runtime.clone());
    let output = machine.run(program.nodes(), &input)?;
    info!("Executed {} nodes", machine.fuel_consumed());

    io::stdout()
        .write_all(&output)
        .context("Failed to write to stdout")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
