use std::{fmt::Display, str::FromStr};

use clap::Parser;
use colored::Colorize;
use petri_cover_lib::{
    analysis::{CoverabilityReport, SerializableCoverabilityReport},
    automaton::petri_net::initialized::InitializedPetriNet,
    config::{CoverabilityConfig, GeneralConfig},
    coverability::{
        CoverabilityTreeBuilder,
        tree::{CoverabilityTree, SerializableCoverabilityTree},
    },
    error::CoverabilityError,
    logger::{LogLevel, init_tracing},
    render,
};
use serde::Serialize;

/// How the finished tree and its analysis are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Json,
    Dot,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "Petri Net Coverability Tool")]
#[command(version = "0.1")]
#[command(about = "Build the Karp-Miller coverability tree of a Petri net", long_about = None)]
struct Args {
    /// Net description, either `.pn`/`.txt` text format or `.json`.
    file: String,

    #[arg(short, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    tree: SerializableCoverabilityTree,
    report: SerializableCoverabilityReport,
}

fn print_result(
    tree: &CoverabilityTree,
    net: &InitializedPetriNet,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = CoverabilityReport::new(tree);

    match format {
        OutputFormat::Text => {
            println!("=== COVERABILITY TREE ===");
            println!("{}", render::to_text(tree, &net.net));
            println!();
            println!("=== PROPERTIES ===");
            for line in report.summary_lines(&net.net) {
                if line.starts_with('✓') {
                    println!("{}", line.green());
                } else {
                    println!("{}", line.red());
                }
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                tree: tree.to_serializable(&net.net),
                report: report.to_serializable(tree, &net.net),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Dot => {
            print!("{}", render::to_graphviz(tree, &net.net));
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = CoverabilityConfig::from_optional_file(args.config.as_ref())?;
    init_tracing(config.logger(), "coverability")?;

    let net = InitializedPetriNet::from_file(&args.file)?;
    tracing::debug!(
        "Loaded net from {} with {} places and {} transitions",
        args.file,
        net.place_count(),
        net.net.transitions().len()
    );

    match CoverabilityTreeBuilder::new(&net, config)?.build() {
        Ok(tree) => print_result(&tree, &net, args.format),
        Err(CoverabilityError::ResourceExhausted { limit, tree }) => {
            eprintln!(
                "[{}] {}, printing the partial tree",
                LogLevel::Warn.colored_tag(),
                limit
            );
            print_result(&tree, &net, args.format)?;
            Err(anyhow::anyhow!("coverability tree construction stopped: {}", limit))
        }
        Err(e) => Err(e.into()),
    }
}
