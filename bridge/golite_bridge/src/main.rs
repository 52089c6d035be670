//! Golite Bridge CLI
//!
//! Serves the bridge calls over stdin/stdout, or runs a single call.

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use golite_bridge::telemetry::{init_tracing, install_panic_hook};
use golite_bridge::{serve, Bridge, BridgeConfig, VERSION};
use golite_capture::{OutputSink, Target};

fn main() -> ExitCode {
    init_tracing();
    install_panic_hook();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map_or("serve", String::as_str);

    match command {
        "serve" => run_serve(),
        "eval" => {
            let Some(source) = args.get(2) else {
                eprintln!("Usage: golite eval <source | ->");
                eprintln!();
                eprintln!("  -    Read the source from stdin");
                return ExitCode::FAILURE;
            };
            run_eval(source)
        }
        "version" | "--version" | "-V" => {
            println!("{VERSION}");
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn load(config: &BridgeConfig, target: Target) -> Result<Bridge, ExitCode> {
    Bridge::with_sink(config, Arc::new(OutputSink::new(target))).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::FAILURE
    })
}

fn config() -> Result<BridgeConfig, ExitCode> {
    BridgeConfig::from_env().map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::FAILURE
    })
}

fn run_serve() -> ExitCode {
    // Stdout carries protocol lines only.
    let bridge = match config().and_then(|config| load(&config, Target::Stderr)) {
        Ok(bridge) => bridge,
        Err(code) => return code,
    };
    tracing::info!("golite bridge initialized");

    let stdin = io::stdin();
    match serve(&bridge, stdin.lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_eval(source: &str) -> ExitCode {
    let source = if source == "-" {
        let mut buf = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: failed to read stdin: {err}");
            return ExitCode::FAILURE;
        }
        buf
    } else {
        source.to_string()
    };

    let bridge = match config().and_then(|config| load(&config, Target::Stdout)) {
        Ok(bridge) => bridge,
        Err(code) => return code,
    };
    let response = bridge.eval_source(&source);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: failed to encode result: {err}");
            return ExitCode::FAILURE;
        }
    }
    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_usage() {
    println!("{VERSION}");
    println!();
    println!("Usage: golite <command> [args]");
    println!();
    println!("Commands:");
    println!("  serve            Answer JSON-lines requests on stdin (default)");
    println!("  eval <source|->  Evaluate source once and print the JSON result");
    println!("  version          Print the bridge version");
    println!("  help             Show this message");
    println!();
    println!("Requests (one JSON object per line):");
    println!(r#"  {{"id": 1, "call": "eval", "args": ["print(1)"]}}"#);
    println!(r#"  {{"id": 2, "call": "version"}}"#);
    println!(r#"  {{"id": 3, "call": "reset"}}"#);
    println!();
    println!("Environment:");
    println!("  GOLITE_MAX_CALL_DEPTH    Nested call limit (default 10000)");
    println!("  GOLITE_CAPTURE_CAPACITY  Buffered output chunks per evaluation (default 64)");
    println!("  GOLITE_LOG               Log filter, falls back to RUST_LOG");
}
