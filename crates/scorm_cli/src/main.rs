//! CLI smoke runner for the runtime API.
//!
//! # Responsibility
//! - Build one engine from a launch options JSON file.
//! - Replay `<Method> [arg] [arg]` lines from stdin through the facade and
//!   print each standardized result.
//!
//! Arguments may be double-quoted; `""` passes an empty string.
//! Set `SCORM_LOG_DIR` (absolute path) to enable file logging.

use scorm_core::{
    core_version, default_log_level, init_logging, DataModelEngine, LaunchOptions, NotificationBus,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("SCORM_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("scorm_core {}", core_version());
        eprintln!("usage: scorm_cli <launch-options.json> < calls.txt");
        return ExitCode::from(2);
    };

    let options = match LaunchOptions::from_path(&path) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = DataModelEngine::launch(options, NotificationBus::new());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("failed to read input: {err}");
                return ExitCode::FAILURE;
            }
        };
        let tokens = tokenize(&line);
        let Some((method, args)) = tokens.split_first() else {
            continue;
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let written = match engine.api().dispatch(method, &args) {
            Ok(result) => writeln!(out, "{method} -> {result}"),
            Err(err) => writeln!(out, "{method} !! {err}"),
        };
        if written.is_err() {
            return ExitCode::FAILURE;
        }
    }

    log::info!(
        "event=cli_done module=cli status=ok lifecycle={:?} ended={}",
        engine.lifecycle(),
        engine.is_ended()
    );
    ExitCode::SUCCESS
}

fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}
