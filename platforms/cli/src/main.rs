use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tape_sim::{
    present, Configuration, DescriptionLoader, Machine, MachineDescription, MachineError,
    ProgramCatalog, DEFAULT_STEP_LIMIT,
};

/// Simulates a single-tape Turing Machine, printing every configuration of the run.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tape-sim -m programs/palindrome.tm --word abba --auto
  tape-sim -m programs/binary-increment.tm input.txt
  tape-sim --program unary-addition input.txt --auto --delay 0")]
struct Cli {
    /// Path to the machine description file (.tm)
    #[clap(
        short,
        long,
        required_unless_present_any = ["program", "list"],
        conflicts_with = "program"
    )]
    machine: Option<String>,

    /// Path to a file holding the input word
    input: Option<String>,

    /// Run an embedded program instead of a description file
    #[clap(short, long)]
    program: Option<String>,

    /// The input word; takes precedence over the input file
    #[clap(short, long)]
    word: Option<String>,

    /// Run without waiting for Enter between steps
    #[clap(long)]
    auto: bool,

    /// Delay between steps in seconds
    #[clap(long, default_value_t = 0.5, value_parser = parse_delay)]
    delay: f64,

    /// Stop after this many steps if the machine has not halted; steps are counted
    /// after the initial configuration
    #[clap(long, default_value_t = DEFAULT_STEP_LIMIT)]
    max_steps: usize,

    /// List the embedded programs and exit
    #[clap(long)]
    list: bool,
}

/// How a simulation ended from the driver's point of view.
#[derive(Debug, PartialEq)]
enum Outcome {
    Accepted,
    Rejected,
    StepLimit,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Accepted => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(1),
            Outcome::StepLimit => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list {
        for name in ProgramCatalog::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Loads the machine and the input word, then drives the run to completion.
fn run(cli: &Cli) -> Result<Outcome, MachineError> {
    let (description, sample) = load_description(cli)?;
    let machine = Machine::new(&description)?;
    let word = read_word(cli, sample)?;

    simulate(&machine, &word, cli)
}

/// Loads the description from the embedded catalogue or from the machine file.
fn load_description(cli: &Cli) -> Result<(MachineDescription, Option<String>), MachineError> {
    match (&cli.program, &cli.machine) {
        (Some(name), _) => {
            let program = ProgramCatalog::by_name(name)?;
            Ok((program.description, Some(program.sample.to_string())))
        }
        (None, Some(path)) => Ok((DescriptionLoader::load(Path::new(path))?, None)),
        (None, None) => Err(MachineError::ValidationError(
            "No machine description given".to_string(),
        )),
    }
}

/// Resolves the input word: `--word`, then the input file, then the program's sample,
/// and finally a prompt on stdin.
fn read_word(cli: &Cli, sample: Option<String>) -> Result<String, MachineError> {
    if let Some(word) = &cli.word {
        return Ok(word.clone());
    }
    if let Some(path) = &cli.input {
        return DescriptionLoader::read_word(Path::new(path));
    }
    if let Some(sample) = sample {
        return Ok(sample);
    }

    if atty::is(atty::Stream::Stdin) {
        print!("Enter input word: ");
        io::stdout()
            .flush()
            .map_err(|e| MachineError::FileError(e.to_string()))?;
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| MachineError::FileError(format!("Failed to read from stdin: {}", e)))?;

    Ok(line.trim().to_string())
}

/// Prints every configuration of the run, pacing by keypress or by `delay`.
fn simulate(machine: &Machine, word: &str, cli: &Cli) -> Result<Outcome, MachineError> {
    let delay = Duration::from_secs_f64(cli.delay);
    let stdin = io::stdin();

    // The initial configuration is not a step, so the budget allows one extra snapshot.
    for (steps, snapshot) in machine.run(word).enumerate() {
        if steps > cli.max_steps {
            println!("\nStep limit of {} reached.", cli.max_steps);
            return Ok(Outcome::StepLimit);
        }

        if !cli.auto {
            println!("Press Enter to continue:");
            let mut line = String::new();
            stdin
                .lock()
                .read_line(&mut line)
                .map_err(|e| MachineError::FileError(e.to_string()))?;
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        println!("State: {}", snapshot.state());
        println!("{}", format_tape(&snapshot, machine.blank()));

        if snapshot.state() == machine.accept() {
            println!("\nAccepted after {} steps.", steps);
            return Ok(Outcome::Accepted);
        }
        if snapshot.state() == machine.reject() {
            println!("\nRejected after {} steps.", steps);
            return Ok(Outcome::Rejected);
        }
    }

    // A run only ends on a halting configuration, which returns above.
    Ok(Outcome::Rejected)
}

/// Formats the tape symbols separated by spaces, with `blank` for blank cells and the head
/// cell in brackets.
fn format_tape(snapshot: &Configuration, blank: char) -> String {
    let head = snapshot.head();
    snapshot
        .content()
        .into_iter()
        .map(|c| present(c, blank))
        .enumerate()
        .map(|(i, c)| {
            if i == head {
                format!("[{c}]")
            } else {
                c.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts any non-negative, finite number of seconds.
fn parse_delay(value: &str) -> Result<f64, String> {
    let delay: f64 = value
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;

    if !delay.is_finite() || delay < 0.0 {
        return Err(format!("'{value}' is not a non-negative number of seconds"));
    }

    Ok(delay)
}
