use std::env;
use std::process;

use anyhow::Result;
use log::{error, info, LevelFilter};

use scopeview::config::{keys, ConfigStore, MemoryConfig};
use scopeview::tui::app::{App, Command};
use scopeview::ScriptedEngine;

/// SCOPEVIEW - terminal tree-view front-end for source-level debuggers
fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("scopeview", LevelFilter::Debug)
        .format_timestamp_secs()
        .init();

    info!("Starting scopeview v{}", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut attach_pid: Option<u32> = None;
    let mut unfold_chunk: Option<i64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            // Version
            "-v" | "--version" => {
                println!("scopeview v{}", env!("CARGO_PKG_VERSION"));
                println!("{}", env!("CARGO_PKG_DESCRIPTION"));
                process::exit(0);
            }
            // Help
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            "--attach" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse::<u32>().ok()) {
                    Some(pid) => attach_pid = Some(pid),
                    None => {
                        error!("--attach needs a pid");
                        process::exit(1);
                    }
                }
            }
            "--unfold-chunk" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse::<i64>().ok()) {
                    Some(chunk) => unfold_chunk = Some(chunk),
                    None => {
                        error!("--unfold-chunk needs a number");
                        process::exit(1);
                    }
                }
            }
            arg => {
                error!("unknown argument: {}", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    // Cosmetic settings; a durable config backend would be loaded here
    let mut config = MemoryConfig::new();
    if let Some(chunk) = unfold_chunk {
        config.set_int(keys::UNFOLD_CHUNK, chunk);
    }

    // The scripted engine stands in for an external debugger backend
    let engine = Box::new(ScriptedEngine::new());

    info!("Initializing TUI");
    let mut app = App::new(engine, &config);

    if let Some(pid) = attach_pid {
        app.execute_command(Command::Attach(pid));
    }

    if let Err(e) = app.run() {
        error!("Error running application: {}", e);
        process::exit(1);
    }

    info!("scopeview exiting");
    Ok(())
}

/// Print usage information
fn print_usage(program_name: &str) {
    println!("scopeview - terminal tree-view front-end for source-level debuggers");
    println!("Usage: {} [options]", program_name);
    println!();
    println!("Options:");
    println!("  -h, --help            Display this help message");
    println!("  -v, --version         Display version information");
    println!("  --attach <pid>        Attach to a process at startup");
    println!("  --unfold-chunk <n>    Members fetched per pointer unfold");
    println!();
    println!("Keyboard Controls:");
    println!("  q              Quit");
    println!("  1-6, Tab       Switch panel");
    println!("  r              Run target");
    println!("  g              Continue");
    println!("  s              Step");
    println!("  n              Step over");
    println!("  f              Finish frame");
    println!("  p              Pick a process to attach");
    println!("  :              Command input (monitor, print, memory, ...)");
}
