// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! TouchGrass CLI
//!
//! Injects the content-script bootstrap into a saved page and manages the
//! stored block window.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use touchgrass::touchgrass::{format_time, parse_time, save_or_start_over, FixedClock};
use touchgrass::{
    Bootstrap, ConfigBuilder, ConfigError, ConfigStore, Document, ErrorContext,
    ExtensionRuntime, FileStore, ModuleRegistry, RuntimeConfig, TouchGrass,
};

const DEFAULT_STORE: &str = "touchgrass-storage.json";
const DEFAULT_WAIT_MS: u64 = 2500;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("touchgrass=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "inject" => {
            if args.len() < 3 {
                eprintln!("Usage: touchgrass inject <page.html> [--store PATH] [--at HH:MM] [--wait MS]");
                return ExitCode::from(1);
            }
            inject_page(&args[2], &args[3..]).await
        }
        "config" => {
            if args.len() < 3 {
                eprintln!("Usage: touchgrass config <show|set|reset> [...]");
                return ExitCode::from(1);
            }
            manage_config(&args[2], &args[3..]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("touchgrass {}", touchgrass::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"TouchGrass - Content-script bootstrap and distraction blocker

USAGE:
    touchgrass <COMMAND> [OPTIONS]

COMMANDS:
    inject <page.html>        Inject the bootstrap into a saved page
    config show               Show the stored block window
    config set <start> <end>  Block between two times (HH:MM)
    config reset              Forget the stored config
    help                      Show this help message
    version                   Show version information

OPTIONS:
    --store <path>    Storage file (default: {store})
    --at <HH:MM>      Pretend it is this time of day (inject only)
    --wait <ms>       How long to run the page's timers (default: {wait})

EXAMPLES:
    touchgrass config set 22:00 06:00
    touchgrass inject home.html --at 23:15
"#,
        store = DEFAULT_STORE,
        wait = DEFAULT_WAIT_MS,
    );
}

/// Parsed `--flag value` options
#[derive(Debug, Default)]
struct Options {
    store: Option<String>,
    at: Option<u32>,
    wait_ms: Option<u64>,
    positional: Vec<String>,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--store" => {
                let value = iter.next().ok_or("--store needs a path")?;
                options.store = Some(value.clone());
            }
            "--at" => {
                let value = iter.next().ok_or("--at needs a time")?;
                options.at = Some(parse_time(value).ok_or(format!("Invalid time: {}", value))?);
            }
            "--wait" => {
                let value = iter.next().ok_or("--wait needs milliseconds")?;
                options.wait_ms = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid duration: {}", value))?,
                );
            }
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other => options.positional.push(other.to_string()),
        }
    }

    Ok(options)
}

fn open_store(options: &Options) -> Arc<FileStore> {
    Arc::new(FileStore::new(
        options.store.as_deref().unwrap_or(DEFAULT_STORE),
    ))
}

async fn load_page(path: &str) -> touchgrass::Result<Document> {
    let html = tokio::fs::read_to_string(path)
        .await
        .context(&format!("reading {}", path))?;
    touchgrass::parse_html(&html).context(&format!("parsing {}", path))
}

async fn inject_page(path: &str, args: &[String]) -> ExitCode {
    let options = match parse_options(args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let page = match load_page(path).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let runtime = ExtensionRuntime::new(RuntimeConfig::default().log_console(false));
    let registry = ModuleRegistry::new();

    let mut companion = TouchGrass::new(runtime.clone(), page.clone(), open_store(&options));
    if let Some(minute) = options.at {
        companion = companion.with_clock(Arc::new(FixedClock(minute)));
    }
    if let Err(e) = companion.register(&registry) {
        eprintln!("Failed to register companion: {}", e);
        return ExitCode::from(1);
    }

    Bootstrap::default().inject(&runtime, &registry).await;
    let wait = Duration::from_millis(options.wait_ms.unwrap_or(DEFAULT_WAIT_MS));
    let executed = runtime.run_for(wait).await;

    println!("=== Console ===");
    for message in runtime.console().messages() {
        println!("[{}] {}", message.level, message.message);
    }

    println!("\n=== Timers ===");
    println!("Executed: {}", executed);
    for label in runtime.timers().pending_labels() {
        println!("Pending: {}", label);
    }

    println!("\n=== Page ===");
    println!("{}", page.outer_html());

    let failures = runtime.unhandled();
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        eprintln!("\n[!] {} unhandled failure(s)", failures.len());
        for failure in &failures {
            eprintln!("  {}: {}", failure.source, failure.error);
        }
        ExitCode::from(1)
    }
}

async fn manage_config(action: &str, args: &[String]) -> ExitCode {
    let options = match parse_options(args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };
    let store = open_store(&options);

    match action {
        "show" => match store.get_config().await {
            Ok(config) => {
                println!("Block window: {} - {}", format_time(config.block_time_start), format_time(config.block_time_end));
                println!("Window length: {} min", config.block_window().len());
                println!("Watch time: {} min", config.total_usage);
                ExitCode::SUCCESS
            }
            Err(ConfigError::EmptyStorage) => {
                println!("Not configured yet. Run: touchgrass config set <start> <end>");
                ExitCode::SUCCESS
            }
            Err(ConfigError::CorruptedConfig) => {
                eprintln!("The config is corrupted. Run `touchgrass config set <start> <end>` to start from scratch.");
                ExitCode::from(1)
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::from(1)
            }
        },
        "set" => {
            let [start, end] = options.positional.as_slice() else {
                eprintln!("Usage: touchgrass config set <start HH:MM> <end HH:MM>");
                return ExitCode::from(1);
            };
            let (Some(start), Some(end)) = (parse_time(start), parse_time(end)) else {
                eprintln!("Times must look like HH:MM (00:00 - 23:59)");
                return ExitCode::from(1);
            };

            let update = ConfigBuilder::new().block_time_start(start).block_time_end(end);
            match save_or_start_over(store.as_ref(), update).await {
                Ok((config, discarded)) => {
                    if discarded {
                        println!("The config was corrupted! Starting from scratch.");
                    }
                    println!(
                        "Blocking between {} and {}",
                        format_time(config.block_time_start),
                        format_time(config.block_time_end)
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::from(1)
                }
            }
        }
        "reset" => match store.remove_config().await {
            Ok(()) => {
                println!("Config removed");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::from(1)
            }
        },
        other => {
            eprintln!("Unknown config action: {}", other);
            ExitCode::from(1)
        }
    }
}
