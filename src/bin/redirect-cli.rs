use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use redirector::config::load_config;
use redirector::config::validation::validate_config;
use redirector::RedirectTable;

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Offline tooling for redirector configuration files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and report entries that cannot match
    Check {
        config: PathBuf,
    },
    /// Print the redirect a request would receive, or null
    Resolve {
        config: PathBuf,

        #[arg(long)]
        host: String,

        #[arg(long, default_value = "/")]
        path: String,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => {
            let config = match load_config(&config) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let warnings = validate_config(&config).unwrap_or_default();
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }

            let table = RedirectTable::compile(&config.redirects, &config.matching.limits());
            println!(
                "{} redirect entries, {} usable, {} warnings",
                config.redirects.len(),
                table.len(),
                warnings.len()
            );
        }
        Commands::Resolve { config, host, path } => {
            let config = load_config(&config)?;
            let table = RedirectTable::compile(&config.redirects, &config.matching.limits());

            let redirect = table.resolve(&host.to_ascii_lowercase(), &path);
            println!("{}", serde_json::to_string_pretty(&redirect)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
