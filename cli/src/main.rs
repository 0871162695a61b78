//! is-connected: answer "is there a path from X to Y" over a small graph.
//!
//! Loads a graph (the built-in airport network, or a JSON description given
//! with `--graph`), reads an origin and destination either from flags or from
//! an interactive prompt, and reports whether they are connected.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use graph_reach_core::{is_reachable, shortest_path, AdjacencyMatrix, Graph, GraphError, NodeId};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod error;
mod prompt;

use config::GraphSpec;
use error::CliExitCode;
use prompt::Query;

#[derive(Parser)]
#[command(name = "is-connected")]
#[command(version)]
#[command(about = "Check whether two nodes of a small undirected graph are connected")]
struct Cli {
    /// JSON graph description; defaults to the built-in airport network
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Override the graph's node capacity
    #[arg(long, value_name = "N")]
    capacity: Option<usize>,

    /// Origin node (skips the prompt)
    #[arg(long, value_name = "NAME", requires = "to")]
    from: Option<String>,

    /// Destination node (skips the prompt)
    #[arg(long, value_name = "NAME", requires = "from")]
    to: Option<String>,

    /// Print the adjacency matrix before querying
    #[arg(long)]
    matrix: bool,

    /// Also print the shortest route when one exists
    #[arg(long)]
    path: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {:#}", e);
            CliExitCode::Usage.into()
        }
    }
}

fn run(cli: &Cli) -> Result<CliExitCode> {
    let spec = match &cli.graph {
        Some(path) => GraphSpec::from_path(path)?,
        None => GraphSpec::airports(),
    };
    let mut graph = spec.build(cli.capacity)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    if cli.matrix {
        print!("{}", AdjacencyMatrix::new(&graph));
    }

    let query = match cli.from.as_deref().zip(cli.to.as_deref()) {
        Some((src, dest)) => Query::path(src, dest)?,
        None => {
            let query = prompt::read_query(&mut io::stdin().lock(), &mut io::stdout())?;
            println!();
            query
        }
    };

    let (src_name, dest_name) = match query {
        Query::Quit => {
            println!("Quitting.");
            return Ok(CliExitCode::Success);
        }
        Query::Path { src, dest } => (src, dest),
    };

    let (src, dest) = match (graph.find_node(&src_name), graph.find_node(&dest_name)) {
        (Ok(src), Ok(dest)) => (src, dest),
        (Err(e), _) | (_, Err(e)) => return Ok(not_found(e)),
    };

    graph.reset_seen();
    if is_reachable(&mut graph, src, dest)? {
        println!("There is a path from {} to {}.", src_name, dest_name);
        if cli.path {
            print_route(&graph, src, dest)?;
        }
    } else {
        println!("There is no path from {} to {}.", src_name, dest_name);
    }

    Ok(CliExitCode::Success)
}

fn not_found(e: GraphError) -> CliExitCode {
    eprintln!("error: {}", e);
    CliExitCode::NodeNotFound
}

fn print_route(graph: &Graph, src: NodeId, dest: NodeId) -> Result<()> {
    if let Some(route) = shortest_path(graph, src, dest)? {
        let names = route
            .iter()
            .map(|&id| graph.name(id))
            .collect::<Result<Vec<_>, _>>()?;
        println!("Route: {} ({} hops)", names.join(" -> "), route.len() - 1);
    }
    Ok(())
}
