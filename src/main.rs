use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use treelox::ast_printer::AstPrinter;
use treelox::error::LoxError;
use treelox::interpreter::Interpreter;
use treelox::parser::Parser;
use treelox::reporter::{ConsoleReporter, Reporter};
use treelox::scanner::Scanner;
use treelox::token::Token;
use treelox::Lox;

/// Exit code for scan, parse or resolution errors.
const EXIT_STATIC_ERROR: i32 = 65;
/// Exit code for a runtime error.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Tree-walking interpreter for the Lox language", long_about = None)]
pub struct Cli {
    /// Omit to start an interactive prompt
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a program
    Run { filename: PathBuf },
}

/// A source file mapped read-only into memory. Empty files cannot be mapped
/// and are kept as `Empty`.
enum SourceFile {
    Empty,
    Mapped(Mmap),
}

impl SourceFile {
    fn open(filename: &Path) -> Result<Self> {
        info!("Reading file: {:?}", filename);

        let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat file {:?}", filename))?
            .len();

        if len == 0 {
            return Ok(SourceFile::Empty);
        }

        // SAFETY: the mapping is only read, and the file is not modified
        // through this process while it is mapped.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map file {:?}", filename))?;

        info!("Mapped {} bytes from {:?}", mmap.len(), filename);

        Ok(SourceFile::Mapped(mmap))
    }

    /// The mapped bytes, validated as UTF-8 in place.
    fn text(&self) -> Result<&str> {
        match self {
            SourceFile::Empty => Ok(""),
            SourceFile::Mapped(mmap) => Ok(std::str::from_utf8(mmap).map_err(LoxError::from)?),
        }
    }
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Debug by default, RUST_LOG overrides.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("treelox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let file = SourceFile::open(filename)?;
    let source: &str = file.text()?;
    let mut tokens: Vec<Token> = Vec::new();
    let mut tokenized = true;

    for item in Scanner::new(source) {
        match item {
            Ok(token) => {
                if !json {
                    println!("{}", token);
                }
                tokens.push(token);
            }

            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?
        );
    }

    if !tokenized {
        std::process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse(filename: &Path) -> Result<()> {
    let file = SourceFile::open(filename)?;
    let source: &str = file.text()?;
    let mut reporter = ConsoleReporter::new();

    let tokens = Scanner::new(source).scan_tokens(&mut reporter);
    let expr = Parser::new(&tokens, &mut reporter).parse_expression();

    match expr {
        Some(expr) if !reporter.had_error() => {
            let ast_str = AstPrinter::print(&expr);
            debug!("AST: {}", ast_str);
            println!("{}", ast_str);
            Ok(())
        }
        _ => std::process::exit(EXIT_STATIC_ERROR),
    }
}

fn evaluate(filename: &Path) -> Result<()> {
    let file = SourceFile::open(filename)?;
    let source: &str = file.text()?;
    let mut reporter = ConsoleReporter::new();

    let tokens = Scanner::new(source).scan_tokens(&mut reporter);
    let expr = match Parser::new(&tokens, &mut reporter).parse_expression() {
        Some(expr) if !reporter.had_error() => expr,
        _ => std::process::exit(EXIT_STATIC_ERROR),
    };

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
            Ok(())
        }

        Err(e) => {
            debug!("Evaluation debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    }
}

fn run_file(filename: &Path) -> Result<()> {
    let file = SourceFile::open(filename)?;
    let source: &str = file.text()?;
    let mut lox = Lox::new();

    lox.run(source);

    if lox.reporter().had_error() {
        std::process::exit(EXIT_STATIC_ERROR);
    }
    if lox.reporter().had_runtime_error() {
        std::process::exit(EXIT_RUNTIME_ERROR);
    }

    info!("Program executed successfully");
    Ok(())
}

fn run_prompt() -> Result<()> {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        lox.run(&line);
        lox.reset_errors();
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(&filename, json),
        Some(Commands::Parse { filename }) => parse(&filename),
        Some(Commands::Evaluate { filename }) => evaluate(&filename),
        Some(Commands::Run { filename }) => run_file(&filename),
        None => run_prompt(),
    }
}
