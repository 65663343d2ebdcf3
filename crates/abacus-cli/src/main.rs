use abacus_core::{AuditConfig, AuditOutcome, Calculators, LogBuffer, Number, audited_calculator};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "abacus", version, about = "Audited variadic calculator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one operator over two or more operands, e.g. `abacus calc - 10 2 3`
    Calc {
        /// Calculator kind to request from the factory
        #[arg(long, default_value = "simple")]
        kind: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with an error instead of printing the failure description
        #[arg(long)]
        strict: bool,

        /// Operator symbol: + - * ** / // %
        operator: String,

        #[arg(required = true, allow_negative_numbers = true)]
        operands: Vec<Number>,
    },
    /// List the operator symbols of the simple calculator
    Operators,
    /// List the calculator kinds the factory knows
    Kinds,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    // Results go to stdout; diagnostics stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("abacus=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AuditConfig::load().context("loading audit configuration")?;
    let buffer = Arc::new(config.build_buffer());

    match cli.command {
        None => run_demo(buffer),
        Some(Command::Calc { kind, format, strict, operator, operands }) => {
            run_calc(buffer, &kind, format, strict, &operator, &operands)
        }
        Some(Command::Operators) => {
            let calculator = abacus_core::SimpleCalculator::new();
            for symbol in calculator.operators().symbols() {
                println!("{symbol}");
            }
            Ok(())
        }
        Some(Command::Kinds) => {
            for kind in Calculators::kinds() {
                println!("{kind}");
            }
            Ok(())
        }
    }
}

/// `2 + 2` through the simple calculator, printed the lenient way.
fn run_demo(buffer: Arc<LogBuffer>) -> anyhow::Result<()> {
    let calculator = audited_calculator("simple", buffer)?;
    let result = calculator.calculate_compat("+", &[Number::Integer(2), Number::Integer(2)]);
    println!("{result}");
    Ok(())
}

fn run_calc(
    buffer: Arc<LogBuffer>,
    kind: &str,
    format: OutputFormat,
    strict: bool,
    operator: &str,
    operands: &[Number],
) -> anyhow::Result<()> {
    let calculator = audited_calculator(kind, buffer)?;
    info!(kind, operator, operands = operands.len(), "evaluating");
    let outcome: AuditOutcome = calculator.calculate(operator, operands);

    if strict {
        if let Some(error) = outcome.error() {
            bail!("{error}");
        }
    }

    match format {
        OutputFormat::Text => println!("{}", outcome.into_compat()),
        OutputFormat::Json => println!("{}", serde_json::to_string(&outcome)?),
    }
    Ok(())
}
