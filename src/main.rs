use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rust_sqlrunner::parser::{LexerOptions, QuoteEscape};
use rust_sqlrunner::{
    check_scripts, plan_scripts, report, PlanOptions, SecurityConfig, SplitOptions,
};

#[derive(Parser)]
#[command(name = "rust-sqlrunner")]
#[command(author, version, about = "Split, classify and check SQL scripts")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statements each script splits into, without executing them
    Split {
        /// SQL files, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Remove the trailing semicolon from each statement
        #[arg(long)]
        strip_semicolon: bool,

        /// Treat backslash as an escape character inside quoted literals
        #[arg(long)]
        backslash_escapes: bool,

        /// Skip path and content validation
        #[arg(long)]
        disable_security: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Run the security checks over scripts and a connection URL
    Check {
        /// SQL files, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Database connection URL to validate
        #[arg(short, long)]
        connection: Option<String>,
    },
}

/// Install the tracing subscriber. `RUST_LOG` wins over the default level.
fn init_logging(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            inputs,
            strip_semicolon,
            backslash_escapes,
            disable_security,
            verbose,
        } => {
            init_logging(cli.log_format, verbose);

            let quote_escape = if backslash_escapes {
                QuoteEscape::Backslash
            } else {
                QuoteEscape::Doubled
            };
            let options = PlanOptions {
                inputs,
                split: SplitOptions {
                    strip_semicolon,
                    lexer: LexerOptions {
                        quote_escape,
                        ..LexerOptions::default()
                    },
                },
                security: (!disable_security).then(SecurityConfig::default),
            };

            for plan in plan_scripts(&options)? {
                print!("{}", report::format_plan(&plan.statements, Some(&plan.path)));
            }
        }
        Commands::Check { inputs, connection } => {
            init_logging(cli.log_format, false);

            let violations =
                check_scripts(&inputs, connection.as_deref(), &SecurityConfig::default())?;
            if violations.is_empty() {
                println!("✅ No security violations found");
            } else {
                for violation in &violations {
                    println!("❌ {}: {}", violation.target, violation.message);
                }
                anyhow::bail!("{} security violation(s) found", violations.len());
            }
        }
    }

    Ok(())
}
