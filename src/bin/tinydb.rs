//! tinydb - interactive shell

use std::env;
use std::io::{self, Write};

use anyhow::{anyhow, bail, Context};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use tinydb::shell::{Outcome, Shell};
use tinydb::{Database, DatabaseConfig};

/// Environment variable holding the log filter
const LOG_ENV: &str = "TINYDB_LOG";

/// Print welcome banner
fn print_banner(config: &DatabaseConfig) {
    println!(
        r#"
 _   _            _ _
| |_(_)_ __  _  _| | |__
|  _| | '  \| || | | '_ \
 \__|_|_||_|\_, |_|_.__/
            |__/

 A minimal relational data engine
 Data directory: {}
 Type '.help' for help, '.quit' to exit
"#,
        config.data_dir.display()
    );
}

fn print_usage() {
    println!(
        "Usage: tinydb [--config <file>] [--data-dir <dir>] [--fresh] [-c <command>]\n\
         \n\
         Options:\n  \
           --config <file>    JSON configuration file\n  \
           --data-dir <dir>   Directory holding the table files\n  \
           --fresh            Do not load existing rows\n  \
           -c <command>       Run one command and exit"
    );
}

struct Args {
    config: Option<String>,
    data_dir: Option<String>,
    fresh: bool,
    command: Option<String>,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        config: None,
        data_dir: None,
        fresh: false,
        command: None,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?),
            "--data-dir" => {
                args.data_dir = Some(iter.next().context("--data-dir needs a directory")?)
            }
            "--fresh" => args.fresh = true,
            "-c" => args.command = Some(iter.next().context("-c needs a command")?),
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument '{}'", other),
        }
    }
    Ok(Some(args))
}

fn print_outcome(text: &str) {
    print!("{}", text);
    io::stdout().flush().ok();
}

/// Main REPL loop
fn run_repl(shell: &mut Shell) -> anyhow::Result<()> {
    let mut editor =
        DefaultEditor::new().map_err(|e| anyhow!("cannot initialise line editor: {}", e))?;

    loop {
        match editor.readline("tinydb> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str()).ok();

                match shell.execute_line(&line) {
                    Ok(Outcome::Print(text)) => print_outcome(&text),
                    Ok(Outcome::Quit) => break,
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => bail!("error reading input: {}", e),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args()? {
        Some(args) => args,
        None => {
            print_usage();
            return Ok(());
        }
    };

    let mut config = match &args.config {
        Some(path) => DatabaseConfig::from_file(path)?,
        None => DatabaseConfig::new(),
    }
    .with_env();
    if let Some(dir) = args.data_dir {
        config = config.data_dir(dir);
    }
    if args.fresh {
        config = config.load_existing(false);
    }

    let db = Database::open(&config)
        .with_context(|| format!("cannot open database in '{}'", config.data_dir.display()))?;
    let mut shell = Shell::new(db);

    if let Some(command) = args.command {
        return match shell.execute_line(&command)? {
            Outcome::Print(text) => {
                print_outcome(&text);
                Ok(())
            }
            Outcome::Quit => Ok(()),
        };
    }

    print_banner(&config);
    run_repl(&mut shell)
}
