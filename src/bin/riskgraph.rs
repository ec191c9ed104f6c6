//! riskgraph CLI - simulate a scenario model file
//!
//! Usage:
//!   riskgraph <model.json>                     # Simulate every goal node
//!   riskgraph <model.json> --goal profit       # Simulate selected goals
//!   riskgraph <model.json> -o json --seed 7    # Machine-readable stats

use clap::{Parser, ValueEnum};
use riskgraph_core::logging::init_tracing;
use riskgraph_core::model::load_model;
use riskgraph_core::{display, ScenarioConfig, ScenarioGraph, Stats};
use serde_json::json;
use std::process;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Summary,
    Json,
    Trace,
    Dot,
}

#[derive(Parser)]
#[command(name = "riskgraph")]
#[command(version)]
#[command(about = "Monte Carlo simulation of risk scenario graphs")]
struct Cli {
    /// JSON model file
    #[arg(value_name = "MODEL")]
    file: String,

    /// Goal to simulate; repeatable (default: every goal node)
    #[arg(short, long = "goal", value_name = "NAME")]
    goals: Vec<String>,

    /// Override the model's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the model's number of simulations
    #[arg(long)]
    nsim: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: Output,

    /// Histogram bins in JSON chart data
    #[arg(long, default_value_t = 20)]
    bins: usize,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let model = match load_model(&cli.file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading model '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let config = ScenarioConfig {
        seed: cli.seed.unwrap_or(model.config.seed),
        nsim: cli.nsim.unwrap_or(model.config.nsim),
    };
    let mut graph = match model.build_with(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building graph: {}", e);
            process::exit(1);
        }
    };

    if let Output::Dot = cli.output {
        println!("{}", graph.to_dot());
        return;
    }

    let goals: Vec<String> = if cli.goals.is_empty() {
        graph.goal_nodes().into_iter().map(str::to_string).collect()
    } else {
        cli.goals.clone()
    };
    if goals.is_empty() {
        eprintln!("Model '{}' declares no goal nodes", cli.file);
        process::exit(1);
    }

    let stats = match simulate(&mut graph, &goals) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            process::exit(1);
        }
    };

    match cli.output {
        Output::Json => {
            let body: serde_json::Map<String, serde_json::Value> = stats
                .iter()
                .map(|(name, s)| {
                    let chart = graph.chart(name, cli.bins).ok();
                    (name.clone(), json!({ "stats": s, "chart": chart }))
                })
                .collect();
            let doc = json!({ "seed": graph.seed(), "nsim": graph.nsim(), "goals": body });
            match serde_json::to_string_pretty(&doc) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
        Output::Trace => {
            for name in &goals {
                if let Ok(text) = graph.trace(name) {
                    println!("{}", text);
                }
            }
        }
        Output::Summary | Output::Dot => {
            for (name, s) in &stats {
                println!("{}", display::format_stats(name, s));
            }
        }
    }
}

/// Evaluates all goals in one pass and summarizes each.
fn simulate(graph: &mut ScenarioGraph, goals: &[String]) -> riskgraph_core::Result<Vec<(String, Stats)>> {
    let names: Vec<&str> = goals.iter().map(String::as_str).collect();
    graph.eval_many(&names)?;
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        out.push((name.to_string(), graph.generate_stats(name)?));
    }
    Ok(out)
}
