use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetcore::{compile_graph, compile_rows, EventBus, RunEvent, SheetRow, Value};
use sheetruntime::{bind, inject_registry, verify_injection, AgentCatalog, AgentRegistry, GraphRunner};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sheet")]
#[command(about = "Sheet-driven agent graph engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run one graph from a rows file
    Run {
        /// Path to rows JSON file (output of the external sheet parser)
        #[arg(short, long)]
        file: PathBuf,

        /// Graph name to run
        #[arg(short, long)]
        graph: String,

        /// Initial workflow state as a JSON object
        #[arg(short, long)]
        input: Option<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile every graph in a rows file and report the results
    Validate {
        /// Path to rows JSON file
        file: PathBuf,
    },

    /// Print the node registry derived from one graph
    Registry {
        /// Path to rows JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Graph name
        #[arg(short, long)]
        graph: String,
    },

    /// List available agent types
    Agents,

    /// Create an example rows file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "rows.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            graph,
            input,
            verbose,
        } => {
            let level = if verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            };
            tracing_subscriber::fmt().with_max_level(level).init();

            run_graph(file, &graph, input).await?;
        }

        Commands::Validate { file } => {
            validate_rows(file)?;
        }

        Commands::Registry { file, graph } => {
            print_registry(file, &graph)?;
        }

        Commands::Agents => {
            list_agents();
        }

        Commands::Init { output } => {
            create_example_rows(output)?;
        }
    }

    Ok(())
}

fn load_rows(file: &PathBuf) -> Result<Vec<SheetRow>> {
    let raw = std::fs::read_to_string(file)?;
    let rows: Vec<SheetRow> = serde_json::from_str(&raw)?;
    Ok(rows)
}

/// Convert a JSON object string into initial workflow state
fn parse_initial(input: Option<String>) -> Result<HashMap<String, Value>> {
    let Some(raw) = input else {
        return Ok(HashMap::new());
    };
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    match Value::from(json) {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow::anyhow!("input must be a JSON object")),
    }
}

async fn run_graph(file: PathBuf, graph_name: &str, input: Option<String>) -> Result<()> {
    println!("🚀 Loading rows from: {}", file.display());

    let rows = load_rows(&file)?;
    let initial = parse_initial(input)?;

    let model = compile_graph(graph_name, &rows)?;
    println!("📋 Graph: {} ({} nodes)", model.name(), model.len());

    let mut catalog = AgentCatalog::new();
    sheetagents::register_builtin(&mut catalog);

    let registry = Arc::new(AgentRegistry::from_graph(&model));
    let executable = bind(model, &catalog)?;

    let injected = inject_registry(&executable, &registry);
    if injected > 0 {
        for (node, ok) in verify_injection(&executable) {
            tracing::debug!(node = %node, attached = ok, "injection check");
        }
    }

    let bus = EventBus::default();
    let mut events = bus.subscribe();

    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                RunEvent::RunStarted { graph, .. } => {
                    println!("▶️  Run started: {}", graph);
                }
                RunEvent::NodeStarted { node, agent_type, .. } => {
                    println!("  ⚡ {} ({})", node, agent_type);
                }
                RunEvent::NodeCompleted { node, duration_ms, .. } => {
                    println!("  ✅ {} completed in {}ms", node, duration_ms);
                }
                RunEvent::NodeFailed { node, error, .. } => {
                    println!("  ❌ {} failed: {}", node, error);
                }
                RunEvent::RouteChosen {
                    node,
                    selected,
                    confidence,
                    rationale,
                    ..
                } => {
                    println!(
                        "  🧭 {} → {} (confidence {:.2}: {})",
                        node, selected, confidence, rationale
                    );
                }
                RunEvent::RunCompleted {
                    success,
                    hops,
                    duration_ms,
                    ..
                } => {
                    if success {
                        println!("✨ Run completed in {}ms ({} hops)", duration_ms, hops);
                    } else {
                        println!("💥 Run failed after {}ms", duration_ms);
                    }
                }
            }
        }
    });

    let runner = GraphRunner::default();
    let outcome = runner.run(&executable, &bus, initial).await?;

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    event_task.abort();

    println!();
    println!("📊 Final state (last node: {}):", outcome.last_node);
    let mut fields: Vec<_> = outcome.state.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    for (field, value) in fields {
        println!("   {}: {}", field, value.render());
    }

    Ok(())
}

fn validate_rows(file: PathBuf) -> Result<()> {
    println!("🔍 Validating rows: {}", file.display());

    let rows = load_rows(&file)?;
    let results = compile_rows(&rows);

    let mut failed = false;
    let mut names: Vec<_> = results.keys().cloned().collect();
    names.sort();
    for name in names {
        match &results[&name] {
            Ok(model) => println!("  ✅ {}: {} nodes", name, model.len()),
            Err(e) => {
                failed = true;
                println!("  ❌ {}: {}", name, e);
            }
        }
    }

    if failed {
        Err(anyhow::anyhow!("one or more graphs failed to compile"))
    } else {
        Ok(())
    }
}

fn print_registry(file: PathBuf, graph_name: &str) -> Result<()> {
    let rows = load_rows(&file)?;
    let model = compile_graph(graph_name, &rows)?;
    let registry = AgentRegistry::from_graph(&model);

    println!("📇 Registry for graph '{}':", graph_name);
    for (name, entry) in registry.iter() {
        println!("  • {} ({})", name, entry.agent_type);
        if !entry.description.is_empty() {
            println!("    {}", entry.description);
        }
    }

    Ok(())
}

fn list_agents() {
    let mut catalog = AgentCatalog::new();
    sheetagents::register_builtin(&mut catalog);

    println!("📦 Available agent types:");
    for agent_type in catalog.list_types() {
        println!("  • {}", agent_type);
    }
}

fn create_example_rows(output: PathBuf) -> Result<()> {
    let rows = serde_json::json!([
        {
            "graph": "support",
            "node": "intake",
            "agent_type": "work.template",
            "inputs": "utterance",
            "outputs": "greeting",
            "prompt": "Received request: {utterance}",
            "successor": "triage"
        },
        {
            "graph": "support",
            "node": "triage",
            "agent_type": "route.orchestrator",
            "inputs": "utterance",
            "outputs": "next_node|confidence|rationale",
            "prompt": "Route the request to the team best suited to handle it.",
            "context": "description: Picks the team that should handle the request"
        },
        {
            "graph": "support",
            "node": "billing",
            "agent_type": "work.template",
            "inputs": "utterance",
            "outputs": "reply",
            "prompt": "Billing team will review: {utterance}",
            "context": "description: Handles invoices, refunds and payment problems"
        },
        {
            "graph": "support",
            "node": "tech",
            "agent_type": "work.template",
            "inputs": "utterance",
            "outputs": "reply",
            "prompt": "Tech support will investigate: {utterance}",
            "context": "description: Handles outages, bugs and technical issues"
        }
    ]);

    std::fs::write(&output, serde_json::to_string_pretty(&rows)?)?;

    println!("✨ Created example rows: {}", output.display());
    println!();
    println!("Run it with:");
    println!(
        "  sheet run --file {} --graph support --input '{{\"utterance\": \"I was double charged on my invoice\"}}'",
        output.display()
    );

    Ok(())
}
