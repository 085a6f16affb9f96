use bincr::{
    analyze, tape, Outcome, Program, ProgramManager, Step, Symbol, TuringMachine,
    DEFAULT_STEP_LIMIT,
};
use clap::Parser;
use log::{debug, error};
use std::error::Error;
use std::io::{self, Read, Write};

/// Runs the binary increment Turing machine and checks that it adds one.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  bincr-cli --number 7 --debug
  bincr-cli --tape _1011___
  echo _111___ | bincr-cli --json")]
struct Cli {
    /// The initial tape, one symbol (0, 1 or _) per cell
    #[clap(short, long, conflicts_with = "number")]
    tape: Option<String>,

    /// Lay out this number on a fresh tape instead of passing one
    #[clap(short, long)]
    number: Option<u64>,

    /// The initial head position
    #[clap(long, default_value_t = 1)]
    head: usize,

    /// Give up after this many steps
    #[clap(short, long, default_value_t = DEFAULT_STEP_LIMIT)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print machine snapshots as JSON instead of text
    #[clap(long)]
    json: bool,

    /// Analyze the transition table before running
    #[clap(long)]
    check: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = read_piped_tape(&cli).and_then(|piped| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run(&cli, piped.as_deref(), &mut out)
    });

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Reads a tape from stdin when no input flag is given and stdin is not a terminal.
fn read_piped_tape(cli: &Cli) -> Result<Option<String>, Box<dyn Error>> {
    if cli.tape.is_some() || cli.number.is_some() || !atty::isnt(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;
    Ok(Some(buffer))
}

fn run(cli: &Cli, piped: Option<&str>, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let program = load_program(cli, piped)?;

    if cli.check {
        analyze(&program)?;
        debug!("transition table of '{}' passed analysis", program.name);
    }

    let initial = tape::digit_run(program.tape());
    let initial_decimal = tape::decimal(&initial)
        .ok_or_else(|| format!("Initial number {} does not fit in 64 bits", initial))?;

    let mut machine = TuringMachine::new(program);

    if !cli.json {
        writeln!(out, "Initial tape: {}", spaced(machine.tape()))?;
        writeln!(out, "Initial binary: {} (decimal: {})", initial, initial_decimal)?;
        writeln!(out)?;
    }

    let outcome = if cli.debug {
        trace(&mut machine, cli, out)?
    } else {
        machine.run(cli.max_steps)
    };

    let halt = match outcome {
        Outcome::Halted(halt) => halt,
        Outcome::StepLimit => {
            return Err(format!(
                "Too many steps ({})! Machine may be in an infinite loop.",
                cli.max_steps
            )
            .into())
        }
    };

    let final_digits = machine.digits();
    let final_decimal = tape::decimal(&final_digits)
        .ok_or_else(|| format!("Final number {} does not fit in 64 bits", final_digits))?;

    if cli.json {
        if !cli.debug {
            writeln!(out, "{}", serde_json::to_string(&machine.snapshot())?)?;
        }
    } else {
        if cli.debug {
            writeln!(out)?;
        }
        writeln!(
            out,
            "Machine halted after {} steps ({})",
            machine.step_count(),
            halt
        )?;
        writeln!(out, "Final tape: {}", spaced(machine.tape()))?;
        writeln!(out, "Final binary: {} (decimal: {})", final_digits, final_decimal)?;
        writeln!(out)?;
    }

    verify(initial_decimal, final_decimal)?;

    if !cli.json {
        writeln!(out, "✓ {} + 1 = {}", initial_decimal, final_decimal)?;
    }

    Ok(())
}

/// Checks that the machine added exactly one.
fn verify(initial: u64, result: u64) -> Result<(), String> {
    let expected = initial + 1;
    if result != expected {
        return Err(format!("Expected {}, got {}", expected, result));
    }
    Ok(())
}

/// Builds the program from `--tape`, `--number`, piped stdin, or the reference preset,
/// in that order.
fn load_program(cli: &Cli, piped: Option<&str>) -> Result<Program, Box<dyn Error>> {
    let cells = if let Some(text) = &cli.tape {
        tape::parse(text)?
    } else if let Some(n) = cli.number {
        tape::encode(n)
    } else if let Some(text) = piped {
        tape::parse(text)?
    } else {
        return Ok(ProgramManager::get_program_by_index(0)?);
    };

    Ok(Program::binary_increment("custom", cells, cli.head)?)
}

/// Steps the machine one transition at a time, writing every intermediate configuration.
fn trace(
    machine: &mut TuringMachine,
    cli: &Cli,
    out: &mut impl Write,
) -> Result<Outcome, Box<dyn Error>> {
    if cli.json {
        writeln!(out, "{}", serde_json::to_string(&machine.snapshot())?)?;
    }

    while machine.step_count() < cli.max_steps {
        match machine.advance() {
            Step::Continue if cli.json => {
                writeln!(out, "{}", serde_json::to_string(&machine.snapshot())?)?;
            }
            Step::Continue => {
                writeln!(
                    out,
                    "Step {}: State={}, Pos={}, Symbol={}, Tape={}",
                    machine.step_count(),
                    machine.state(),
                    machine.head(),
                    machine.symbol(),
                    spaced(machine.tape())
                )?;
            }
            Step::Halt(halt) => return Ok(Outcome::Halted(halt)),
        }
    }

    // Settle whether the last allowed step left the machine halted.
    Ok(machine.run(0))
}

fn spaced(cells: &[Symbol]) -> String {
    cells
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
