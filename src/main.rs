#![allow(dead_code)]

mod app;
mod bridge;
mod config;
mod storage;

use anyhow::Result;
use app::App;

fn print_help() {
    println!("dataminer - sensor preference store");
    println!();
    println!("USAGE:");
    println!("    dataminer [OPTIONS] [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    get                        Print the boolean preference map (default)");
    println!("    show                       Print the raw settings file");
    println!("    set <KEY> <VALUE>          Set a preference (\"true\"/\"false\" become booleans)");
    println!("    set <KEY> <JSON> --fence   Store a JSON object, e.g. geofence coordinates");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -V, --version    Print version information");
}

fn print_version() {
    println!("dataminer {}", env!("CARGO_PKG_VERSION"));
}

fn main() -> Result<()> {
    // Handle command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(first) = args.first() {
        match first.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            _ => {}
        }
    }

    // Set up logging (optional, for debugging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::new()?;
    let mut app = App::new(config)?;

    match args.first().map(String::as_str) {
        None | Some("get") => {
            for (key, enabled) in app.get() {
                println!("{key} = {enabled}");
            }
        }
        Some("show") => {
            println!("{}", app.show()?);
        }
        Some("set") => {
            let fence = args.iter().any(|a| a == "--fence");
            let rest: Vec<&String> = args[1..].iter().filter(|a| a.as_str() != "--fence").collect();
            match rest.as_slice() {
                [key, value] => {
                    app.set(key.as_str(), value.as_str(), fence)?;
                    println!("{key} updated");
                }
                _ => {
                    eprintln!("usage: dataminer set <KEY> <VALUE> [--fence]");
                    std::process::exit(1);
                }
            }
        }
        Some(command) => {
            eprintln!("Unknown command: {command}");
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    }

    Ok(())
}
