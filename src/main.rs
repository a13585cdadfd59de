use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use codehub_runner::config;
use codehub_runner::runner::{AnswerSource, ScriptedAnswers, run_to_completion};
use codehub_runner::session::Session;
use codehub_runner::wire::handle_run_code;
use codehub_runner::{ExecutionOutcome, Executor};
use tracing_subscriber::EnvFilter;

/// codehub-runner - replay-based script execution with captured output and plots
#[derive(Parser, Debug)]
#[command(
    name = "codehub-runner",
    about = "Run Rhai scripts with replayed input answers and captured plot images",
    after_help = "ENVIRONMENT VARIABLES:\n\
        CODEHUB_DEFAULT_PROMPT    Prompt reported when input() had none\n\
        CODEHUB_FIGURE_WIDTH      Rendered figure width (px)\n\
        CODEHUB_FIGURE_HEIGHT     Rendered figure height (px)\n\
        CODEHUB_SESSION_DIR       Base directory for artifact sessions\n\
        CODEHUB_LOG               Log filter (falls back to RUST_LOG)"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script, answering its prompts until it finishes
    Run {
        /// Path to the script file
        script: PathBuf,

        /// Answer for the next prompt; repeat for several prompts
        #[arg(short, long = "answer")]
        answers: Vec<String>,

        /// Stop at the first prompt with no scripted answer instead of reading stdin
        #[arg(long)]
        non_interactive: bool,

        /// Print the replay transcript as JSON instead of the script output
        #[arg(long)]
        json: bool,

        /// Output directory for the figure and transcript (default: auto-generated in session dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep artifacts after completion (default: cleanup unless --output is specified)
        #[arg(long, short = 'k')]
        keep: bool,
    },

    /// Handle one run-code API request body and print the JSON response
    Request {
        /// File holding the request body (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// HTTP method the request arrived with
        #[arg(short, long, default_value = "POST")]
        method: String,
    },
}

/// Answers from `--answer` first, then from the terminal.
///
/// Each attempt replays the script from the start, so only the output past
/// what was already shown is printed.
struct TerminalAnswers {
    scripted: ScriptedAnswers,
    interactive: bool,
    echo: bool,
    shown: usize,
}

impl TerminalAnswers {
    fn show_new_output(&mut self, output: &str) {
        if !self.echo {
            return;
        }
        let fresh = output.get(self.shown..).unwrap_or(output);
        print!("{fresh}");
        let _ = io::stdout().flush();
        self.shown = output.len();
    }
}

impl AnswerSource for TerminalAnswers {
    fn answer(&mut self, prompt: &str, output_so_far: &str) -> Option<String> {
        self.show_new_output(output_so_far);

        if let Some(answer) = self.scripted.answer(prompt, output_so_far) {
            if self.echo {
                println!("{prompt}{answer}");
            }
            return Some(answer);
        }
        if !self.interactive {
            return None;
        }

        print!("{prompt}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_new(&config::get().logging.filter)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let executor = Executor::from_env();

    match args.command {
        Some(Commands::Run {
            script,
            answers,
            non_interactive,
            json,
            output,
            keep,
        }) => {
            let source_text = std::fs::read_to_string(&script)?;

            let session = if let Some(ref dir) = output {
                Session::in_dir(dir)
            } else {
                let name = script
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "run".to_string());
                Session::with_name(&name).keep(keep)
            };
            session.init()?;

            let mut source = TerminalAnswers {
                scripted: ScriptedAnswers::new(answers),
                interactive: !non_interactive,
                echo: !json,
                shown: 0,
            };
            let transcript = run_to_completion(&executor, &source_text, &mut source);
            source.show_new_output(transcript.outcome.output());

            let image_path = match &transcript.outcome {
                ExecutionOutcome::Completed { image: Some(image), .. } => {
                    Some(session.write_image(image)?)
                }
                _ => None,
            };
            let transcript_path = session.write_transcript(&transcript)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                eprintln!();
                match &transcript.outcome {
                    ExecutionOutcome::Completed { .. } => {
                        eprintln!("Completed after {} attempt(s)", transcript.attempts);
                    }
                    ExecutionOutcome::Paused { prompt, .. } => {
                        eprintln!("Stopped waiting for input: {prompt}");
                    }
                    ExecutionOutcome::Failed {
                        error_kind,
                        error_detail,
                        ..
                    } => {
                        eprintln!("--- EXECUTION ERROR ---");
                        eprintln!("{error_kind}: {error_detail}");
                    }
                }
                if let Some(path) = &image_path {
                    eprintln!("  Figure: {}", path.display());
                }
                eprintln!("  Transcript: {}", transcript_path.display());
                if session.keep {
                    eprintln!("\nSession: {}", session.dir.display());
                }
            }

            Ok(match transcript.outcome {
                ExecutionOutcome::Completed { .. } => ExitCode::SUCCESS,
                ExecutionOutcome::Paused { .. } => ExitCode::from(2),
                ExecutionOutcome::Failed { .. } => ExitCode::FAILURE,
            })
        }

        Some(Commands::Request { file, method }) => {
            let body = match file {
                Some(path) => std::fs::read(path)?,
                None => {
                    let mut buf = Vec::new();
                    io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };

            let response = handle_run_code(&method, &body, &executor);
            println!("{}", response.to_json()?);
            eprintln!("status: {}", response.status_code);

            Ok(if response.is_success_status() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        None => {
            println!("codehub-runner - replay-based script execution");
            println!();
            println!("Usage: codehub-runner <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run      Run a script, answering its prompts until it finishes");
            println!("  request  Handle one run-code API request body");
            println!();
            println!("Run with --help for more information.");
            Ok(ExitCode::SUCCESS)
        }
    }
}
