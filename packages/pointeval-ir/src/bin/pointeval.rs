//! Pointer-analysis precision evaluation CLI
//!
//! # Usage
//!
//! ```bash
//! # Load analysis logs for one configuration
//! pointeval ingest --root analysis-logs --analysis 1cs
//!
//! # Run the full precision sweep and write reports
//! pointeval precision --analysis 1cs --output results
//!
//! # Print the must-alias partition of one table
//! pointeval must-alias --analysis 1cs --benchmark avrora --ir soot
//! ```

use std::fs::{self, File};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use pointeval_ir::features::reporting::{
    BenchmarkRow, CsvReporter, JsonReporter, TerminalReporter,
};
use pointeval_ir::features::store::ingest::{load_var_points_to, load_virtual_calls};
use pointeval_ir::{
    ClassHierarchyPrecisionResult, ComputePrecision, Ir, IrPrecisionResult, MustAlias, Store,
    TableKey,
};

/// DaCapo benchmarks of the evaluation.
const BENCHMARKS: &[&str] = &[
    "avrora",
    "batik",
    "eclipse",
    "h2",
    "jython",
    "lusearch",
    "luindex",
    "pmd",
    "sunflow",
    "tradebeans",
    "xalan",
];

/// eclipse and jython do not finish under the deeper contexts.
fn benchmarks_for(analysis: &str) -> Vec<&'static str> {
    BENCHMARKS
        .iter()
        .copied()
        .filter(|b| !(matches!(analysis, "2cs" | "2os") && matches!(*b, "eclipse" | "jython")))
        .collect()
}

#[derive(Parser)]
#[command(name = "pointeval")]
#[command(about = "Soot vs Wala pointer-analysis precision evaluation", long_about = None)]
struct Cli {
    /// Evaluation database
    #[arg(long, global = true, default_value = "db/varpointsto.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load points-to and virtual-call logs into the database
    Ingest {
        /// Root directory of the analysis logs
        #[arg(long)]
        root: PathBuf,

        /// Analysis configuration (1cs, 2cs, 1os, 2os)
        #[arg(short, long)]
        analysis: String,

        /// Benchmarks to load (default: full DaCapo list)
        #[arg(short, long)]
        benchmark: Vec<String>,
    },

    /// Compute all precision metrics and write reports
    Precision {
        /// Analysis configuration (1cs, 2cs, 1os, 2os)
        #[arg(short, long)]
        analysis: String,

        /// Restrict to one benchmark
        #[arg(short, long)]
        benchmark: Option<String>,

        /// Output directory for reports and dump artifacts
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Print the must-alias partition of one points-to table
    MustAlias {
        /// Analysis configuration (1cs, 2cs, 1os, 2os)
        #[arg(short, long)]
        analysis: String,

        /// Benchmark name
        #[arg(short, long)]
        benchmark: String,

        /// IR frontend (soot or wala)
        #[arg(long)]
        ir: Ir,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Store::open(&cli.database)?;

    match cli.command {
        Commands::Ingest {
            root,
            analysis,
            benchmark,
        } => {
            let benchmarks = resolve_benchmarks(&analysis, benchmark);
            run_ingest(&store, &root, &analysis, &benchmarks)?;
        }
        Commands::Precision {
            analysis,
            benchmark,
            output,
        } => {
            let benchmarks = resolve_benchmarks(&analysis, benchmark.into_iter().collect());
            run_precision(&store, &analysis, &benchmarks, &output)?;
        }
        Commands::MustAlias {
            analysis,
            benchmark,
            ir,
        } => {
            run_must_alias(&store, &analysis, &benchmark, ir)?;
        }
    }

    Ok(())
}

fn resolve_benchmarks(analysis: &str, selected: Vec<String>) -> Vec<String> {
    if selected.is_empty() {
        benchmarks_for(analysis)
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        selected
    }
}

fn run_ingest(
    store: &Store,
    root: &std::path::Path,
    analysis: &str,
    benchmarks: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    for benchmark in benchmarks {
        for ir in [Ir::Soot, Ir::Wala] {
            let key = TableKey::new(benchmark, analysis, ir)?;
            let points_to = load_var_points_to(store, root, &key)?;
            let calls = load_virtual_calls(store, root, &key)?;
            println!("{key}: {points_to} points-to rows, {calls} virtual-call rows");
        }
    }
    Ok(())
}

fn run_precision(
    store: &Store,
    analysis: &str,
    benchmarks: &[String],
    output: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;

    let mut soot_ir_rows: Vec<BenchmarkRow<IrPrecisionResult>> = Vec::new();
    let mut wala_ir_rows: Vec<BenchmarkRow<IrPrecisionResult>> = Vec::new();
    let mut soot_cha_rows: Vec<BenchmarkRow<ClassHierarchyPrecisionResult>> = Vec::new();
    let mut wala_cha_rows: Vec<BenchmarkRow<ClassHierarchyPrecisionResult>> = Vec::new();

    for benchmark in benchmarks {
        info!(benchmark = %benchmark, analysis, "computing precision");
        let mut engine =
            ComputePrecision::new(store.clone(), benchmark, analysis)?.with_output_dir(output);

        let soot_ir = engine.soot_ir_precision()?;
        println!("\n----- {benchmark} {analysis} Soot IR Precision -----");
        print!("{soot_ir}");
        soot_ir_rows.push(BenchmarkRow::new(benchmark, soot_ir));

        let wala_ir = engine.wala_ir_precision()?;
        println!("----- {benchmark} {analysis} Wala IR Precision -----");
        print!("{wala_ir}");
        wala_ir_rows.push(BenchmarkRow::new(benchmark, wala_ir));

        let soot_cha = engine.soot_class_hierarchy_precision();
        println!("----- {benchmark} {analysis} Soot CHA Precision -----");
        print!("{soot_cha}");
        soot_cha_rows.push(BenchmarkRow::new(benchmark, soot_cha));

        let wala_cha = engine.wala_class_hierarchy_precision();
        println!("----- {benchmark} {analysis} Wala CHA Precision -----");
        print!("{wala_cha}");
        wala_cha_rows.push(BenchmarkRow::new(benchmark, wala_cha));
    }

    let mut summary = File::create(output.join(format!("results_{analysis}.txt")))?;
    TerminalReporter::write_section(&mut summary, "Soot IR Results", &soot_ir_rows)?;
    TerminalReporter::write_section(&mut summary, "Wala IR Results", &wala_ir_rows)?;
    TerminalReporter::write_section(&mut summary, "Soot CHA Results", &soot_cha_rows)?;
    TerminalReporter::write_section(&mut summary, "Wala CHA Results", &wala_cha_rows)?;

    CsvReporter::save(&soot_ir_rows, &output.join(format!("soot-ir-results-{analysis}.csv")))?;
    CsvReporter::save(&wala_ir_rows, &output.join(format!("wala-ir-results-{analysis}.csv")))?;
    CsvReporter::save(&soot_cha_rows, &output.join(format!("soot-cha-results-{analysis}.csv")))?;
    CsvReporter::save(&wala_cha_rows, &output.join(format!("wala-cha-results-{analysis}.csv")))?;

    JsonReporter::save(&soot_ir_rows, &output.join(format!("soot-ir-results-{analysis}.json")))?;
    JsonReporter::save(&wala_ir_rows, &output.join(format!("wala-ir-results-{analysis}.json")))?;
    JsonReporter::save(&soot_cha_rows, &output.join(format!("soot-cha-results-{analysis}.json")))?;
    JsonReporter::save(&wala_cha_rows, &output.join(format!("wala-cha-results-{analysis}.json")))?;

    println!("\nReports written to {}", output.display());
    Ok(())
}

fn run_must_alias(
    store: &Store,
    analysis: &str,
    benchmark: &str,
    ir: Ir,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = TableKey::new(benchmark, analysis, ir)?;
    let classes = MustAlias::new(store.clone(), key).compute_must_alias();

    println!("#alias sets = {}", classes.len());
    for class in classes.iter().filter(|c| c.len() > 1) {
        let names: Vec<String> = class
            .iter()
            .map(|v| format!("({}, {})", v.var_ctx, v.var))
            .collect();
        println!("{}", names.join(" "));
    }
    Ok(())
}
