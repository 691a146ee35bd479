use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

/// Harness-less benchmarks, as `(package, bench)` pairs.
const BENCHES: &[(&str, &str)] = &[
    ("cityloop-kernel", "bench_collider_query"),
    ("cityloop-citygen", "bench_city_generate"),
    ("cityloop-stream", "bench_world_wrap"),
    ("cityloop-sim", "bench_sim_tick"),
];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for cityloop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy, tests and docs
    Check,
    /// Run cargo fmt --check
    Fmt,
    /// Run clippy with warnings denied
    Clippy,
    /// Run every unit test
    Test,
    /// Run the micro-benchmarks in release mode
    Bench,
    /// Build rustdoc for the workspace
    Doc,
    /// Headless smoke run of each CLI script
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => bench()?,
        Commands::Doc => doc()?,
        Commands::Smoke => smoke()?,
    }

    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("tests", &["test", "--workspace"])
}

fn doc() -> Result<()> {
    cargo("rustdoc", &["doc", "--workspace", "--no-deps"])
}

fn bench() -> Result<()> {
    for (package, name) in BENCHES {
        cargo(name, &["bench", "-p", package, "--bench", name])?;
    }
    Ok(())
}

fn smoke() -> Result<()> {
    for script in ["idle", "walk", "drive"] {
        cargo(
            &format!("{script} smoke run"),
            &[
                "run", "-q", "-p", "cityloop-cli", "--", "--seed", "1", "run", "--ticks", "120",
                "--script", script,
            ],
        )?;
    }
    Ok(())
}
