//! Kitbag console
//!
//! Usage: `kitbag [config.toml]`, then type commands on stdin.

use kitbag_runtime::{Console, KitbagConfig};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    let loaded = KitbagConfig::load(path.as_deref());

    // Initialize logging
    let level = loaded
        .as_ref()
        .map_or("info", |config| config.log_level.as_str());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    for line in config.summary() {
        log::info!("{}", line);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Console failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &KitbagConfig) -> io::Result<()> {
    let mut console = Console::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Kitbag inventory console")?;
    writeln!(stdout, "Type 'help' for commands, 'exit' to quit.")?;

    let mut input = String::new();
    loop {
        write!(stdout, "kitbag> ")?;
        stdout.flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let cmd = input.trim();
        if cmd.is_empty() {
            continue;
        }
        if cmd == "exit" || cmd == "quit" {
            break;
        }

        match console.execute_line(cmd) {
            Ok(lines) => {
                for line in lines {
                    writeln!(stdout, "{}", line)?;
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    log::info!("Shutting down");
    Ok(())
}
