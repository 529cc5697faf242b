use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "circular-deque workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the allocator benchmark suite once per global allocator
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Only benchmark these allocators (e.g. `--alloc system --alloc mimalloc`)
        #[arg(long = "alloc")]
        allocators: Vec<String>,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
    /// Summarize existing criterion output into a markdown table
    Report {
        /// Where to write the report
        #[arg(long, default_value = "benchmark_results/report.md")]
        out: PathBuf,
    },
}

const ALLOCATORS: &[&str] = &["system", "mimalloc", "snmalloc", "jemalloc"];

const REPORT_PATH: &str = "benchmark_results/report.md";

/// Subset of criterion's `estimates.json`.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// Subset of criterion's `benchmark.json`.
#[derive(Deserialize)]
struct BenchmarkInfo {
    full_id: String,
    throughput: Option<Throughput>,
}

#[derive(Deserialize)]
enum Throughput {
    Elements(u64),
    Bytes(u64),
    BytesDecimal(u64),
}

/// benchmark id -> allocator -> iterations (or throughput units) per second
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            allocators,
            report_only,
        } => {
            let selected = select_allocators(&allocators)?;
            if !report_only {
                run_benchmarks(&selected, quick)?;
            }
            generate_report(Path::new(REPORT_PATH))?;
        }
        Commands::Report { out } => generate_report(&out)?,
    }

    Ok(())
}

fn select_allocators(requested: &[String]) -> Result<Vec<&'static str>> {
    if requested.is_empty() {
        return Ok(ALLOCATORS.to_vec());
    }
    requested
        .iter()
        .map(|name| {
            let name = name.trim_start_matches("alloc-");
            ALLOCATORS
                .iter()
                .copied()
                .find(|known| *known == name)
                .with_context(|| format!("unknown allocator `{name}` (known: {})", ALLOCATORS.join(", ")))
        })
        .collect()
}

fn run_benchmarks(allocators: &[&str], quick: bool) -> Result<()> {
    println!("Running allocator benchmarks...");

    // Build first to avoid measuring build time
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", "suite", "--release"])
        .status()?;
    if !status.success() {
        bail!("Failed to compile benchmarks");
    }

    for &alloc in allocators {
        let feature = format!("alloc-{alloc}");
        println!("\n>>> Benchmarking with feature: {feature}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.env("CARGO_INCREMENTAL", "0")
            .env("RUSTFLAGS", "-C opt-level=3 -C codegen-units=1");

        cmd.args(["bench", "--bench", "suite", "--no-default-features", "--features"])
            .arg(&feature);

        // Criterion args go after --
        cmd.arg("--").arg("--save-baseline").arg(alloc);

        if quick {
            cmd.args(["--measurement-time", "0.1", "--sample-size", "10", "--noplot"]);
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench for {feature}"))?;

        if status.success() {
            println!("Finished {feature} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: Benchmark failed for {feature}");
        }
    }

    Ok(())
}

fn generate_report(report_path: &Path) -> Result<()> {
    println!("\n>>> Generating Report...");

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;

    writeln!(file, "# circular-deque Allocator Benchmark Report")?;
    writeln!(file)?;

    write!(file, "| Benchmark |")?;
    for alloc in ALLOCATORS {
        write!(file, " {alloc} (ops/s) | vs system |")?;
    }
    writeln!(file)?;

    write!(file, "|---|")?;
    for _ in ALLOCATORS {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    for (bench, by_alloc) in &results {
        write!(file, "| {bench} |")?;
        let system = by_alloc.get("system").copied().unwrap_or(0.0);

        for alloc in ALLOCATORS {
            match by_alloc.get(*alloc) {
                Some(&ops) => {
                    let rel = if system > 0.0 { ops / system } else { 0.0 };
                    write!(file, " {} | **{rel:.2}x** |", format_rate(ops))?;
                }
                None => write!(file, " N/A | - |")?,
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_rate(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks `<bench>/<baseline>/estimates.json` files. Only baselines named after
/// an allocator are collected, so the comparison benchmark's `base`/`new`
/// directories are skipped.
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else { continue };
        let Some(baseline) = baseline_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !ALLOCATORS.contains(&baseline) {
            continue;
        }

        let info_path = baseline_dir.join("benchmark.json");
        let Ok(info) = fs::read_to_string(&info_path) else { continue };
        let info: BenchmarkInfo = serde_json::from_str(&info)
            .with_context(|| format!("parsing {}", info_path.display()))?;
        let estimates: Estimates = serde_json::from_str(&fs::read_to_string(&path)?)
            .with_context(|| format!("parsing {}", path.display()))?;

        let time_ns = estimates.mean.point_estimate;
        if time_ns <= 0.0 {
            continue;
        }
        let per_iter = match info.throughput {
            Some(Throughput::Elements(n) | Throughput::Bytes(n) | Throughput::BytesDecimal(n)) => {
                n as f64
            }
            None => 1.0,
        };

        results
            .entry(info.full_id)
            .or_default()
            .insert(baseline.to_string(), per_iter * 1e9 / time_ns);
    }
    Ok(())
}
