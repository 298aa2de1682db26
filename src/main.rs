// cfmt: C syntax tree and pretty-printer driver

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use cfmt::config::FormatOptions;
use cfmt::parser::ast::SourceLocation;
use cfmt::parser::lexer::tokenize;
use cfmt::{Error, Parsed};

#[derive(Parser, Debug)]
#[command(name = "cfmt", version, about = "Parse and pretty-print C source")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML file with formatting options
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print width, overrides the config file
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Spaces per indentation level, overrides the config file
    #[arg(long, global = true)]
    tab_width: Option<usize>,

    /// Report pipeline progress on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the syntax tree as JSON
    Ast { input: String },
    /// Print the layout instructions
    Doc { input: String },
    /// Print the formatted source
    Fmt { input: String },
    /// List tokens and side-channel comments
    Tokens { input: String },
}

impl Command {
    fn input(&self) -> &str {
        match self {
            Command::Ast { input }
            | Command::Doc { input }
            | Command::Fmt { input }
            | Command::Tokens { input } => input,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let options = match load_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let (source, origin) = match read_input(cli.command.input()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &source, &origin, &options) {
        report(&e);
        process::exit(1);
    }
}

fn load_options(cli: &Cli) -> Result<FormatOptions, Box<dyn std::error::Error>> {
    let mut options = match &cli.config {
        Some(path) => FormatOptions::load(path)?,
        None => FormatOptions::default(),
    };
    if let Some(width) = cli.width {
        options.print_width = width;
    }
    if let Some(tab_width) = cli.tab_width {
        options.tab_width = tab_width;
    }
    options.validate()?;
    Ok(options)
}

/// A path if it names a file, inline source otherwise.
fn read_input(input: &str) -> std::io::Result<(String, String)> {
    let path = Path::new(input);
    if path.is_file() {
        Ok((fs::read_to_string(path)?, path.display().to_string()))
    } else {
        Ok((input.to_string(), "<inline>".to_string()))
    }
}

fn run(cli: &Cli, source: &str, origin: &str, options: &FormatOptions) -> Result<(), Error> {
    if cli.verbose {
        eprintln!("Reading {} ({} bytes)...", origin, source.len());
    }

    if let Command::Tokens { .. } = cli.command {
        let stream = tokenize(source)?;
        for token in &stream.tokens {
            listing(token.location, format!("{:?}", token.kind), &token.text);
        }
        for comment in &stream.comments {
            listing(comment.location, format!("{:?}", comment.kind), &comment.text);
        }
        if cli.verbose {
            eprintln!(
                "{} tokens, {} comments",
                stream.tokens.len(),
                stream.comments.len()
            );
        }
        return Ok(());
    }

    let Parsed { ast, comments } = cfmt::parse_with(source, options)?;
    if cli.verbose {
        eprintln!("Parsed {} ({} comments set aside)", origin, comments.len());
    }

    match cli.command {
        Command::Ast { .. } => match serde_json::to_string_pretty(&ast) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: cannot serialise tree: {}", e);
                process::exit(1);
            }
        },
        Command::Doc { .. } => println!("{}", cfmt::print_doc(&ast)?),
        Command::Fmt { .. } => {
            let doc = cfmt::print_doc(&ast)?;
            print!("{}", cfmt::printer::render(&doc, options));
        }
        Command::Tokens { .. } => {}
    }

    if cli.verbose {
        eprintln!("Done.");
    }
    Ok(())
}

fn listing(location: SourceLocation, kind: String, text: &str) {
    println!(
        "{:>4}:{:<4} {:<14} {}",
        location.line, location.column, kind, text
    );
}

/// One line per error.
fn report(error: &Error) {
    match error {
        Error::Syntax(errors) => {
            for e in errors {
                eprintln!("{}", e);
            }
        }
        Error::Unsupported(e) => eprintln!("Internal error: {}", e),
    }
}
