use clap::{Parser, Subcommand};
use pipewright::prelude::*;
use std::fs;
use std::time::Instant;

/// A canvas pipeline execution and SQL preview CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a canvas document and print the resulting table
    Run {
        /// Path to the canvas JSON file
        canvas_path: String,

        /// Evaluate only this operator instead of the terminal one
        #[arg(short, long)]
        operator: Option<String>,

        /// Print the result table as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render the SQL preview for a canvas document
    Sql {
        /// Path to the canvas JSON file
        canvas_path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            canvas_path,
            operator,
            json,
        } => run(&canvas_path, operator.as_deref(), json),
        Command::Sql { canvas_path } => sql(&canvas_path),
    }
}

fn load_canvas(path: &str) -> CanvasState {
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read canvas file '{}': {}", path, e)));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse canvas JSON: {}", e)))
}

fn run(canvas_path: &str, operator: Option<&str>, json: bool) {
    let canvas = load_canvas(canvas_path);
    let executor = Executor::default();

    let start = Instant::now();
    let result = match operator {
        Some(id) => executor.evaluate(&canvas, id),
        None => executor.run(&canvas),
    };
    let table =
        result.unwrap_or_else(|e| exit_with_error(&format!("Execution failed: {}", e)));
    let duration = start.elapsed();

    if json {
        let rendered = serde_json::to_string_pretty(&table)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize result: {}", e)));
        println!("{}", rendered);
    } else {
        print_table(&table);
    }

    println!();
    println!("--- Summary ---");
    println!("Operators: {}", canvas.operators.len());
    println!("Rows:      {}", table.row_count());
    println!("Executed in {:?}", duration);
}

fn sql(canvas_path: &str) {
    let canvas = load_canvas(canvas_path);
    let rendered = generate_sql(&canvas);
    if rendered.is_empty() {
        exit_with_error("Canvas is empty, nothing to render");
    }
    println!("{}", rendered);
}

fn print_table(table: &Table) {
    println!("{}", table.columns.join(" | "));
    for row in &table.rows {
        let line = table
            .columns
            .iter()
            .map(|col| Table::cell(row, col).to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{}", line);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
