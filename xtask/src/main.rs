//! Development tasks for workload-env-compiler
//!
//! Usage: cargo xtask <command>
//!
//! - ci: fmt check, clippy and the full test suite
//! - test: unit or integration tests
//! - compile: run `env-compiler compile` on a recipe file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for workload-env-compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check CI runs
    Ci,
    /// Run tests
    Test {
        /// Only the recipe pipeline tests under tests/
        #[arg(long)]
        integration: bool,
    },
    /// Compile a recipe with the debug binary
    Compile {
        /// Recipe file path
        recipe: PathBuf,
        /// Output format passed to the binary (table, yaml, json)
        #[arg(long, default_value = "table")]
        output: String,
        /// Machine configs TOML
        #[arg(long)]
        machines: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(workspace_root()?);

    match cli.command {
        Commands::Ci => ci(&sh),
        Commands::Test { integration } => test(&sh, integration),
        Commands::Compile {
            recipe,
            output,
            machines,
        } => compile(&sh, &recipe, &output, machines.as_deref()),
    }
}

fn ci(sh: &Shell) -> Result<()> {
    let steps: [(&str, fn(&Shell) -> Result<()>); 3] = [
        ("fmt", |sh| Ok(cmd!(sh, "cargo fmt --all -- --check").run()?)),
        ("clippy", |sh| {
            Ok(cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?)
        }),
        ("test", |sh| test(sh, false)),
    ];

    for (name, step) in steps {
        println!("▶ {}", name);
        step(sh).with_context(|| format!("ci step '{}' failed", name))?;
    }
    println!("✅ ci passed");
    Ok(())
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    if integration {
        cmd!(sh, "cargo test --test integration_test --test retrieval_test").run()?;
    } else {
        cmd!(sh, "cargo test --workspace").run()?;
    }
    Ok(())
}

fn compile(sh: &Shell, recipe: &Path, output: &str, machines: Option<&Path>) -> Result<()> {
    let recipe = std::fs::canonicalize(recipe)
        .with_context(|| format!("recipe not found: {}", recipe.display()))?;

    let mut args = vec![
        "compile".to_string(),
        "--recipe".to_string(),
        recipe.display().to_string(),
        "--output".to_string(),
        output.to_string(),
    ];
    if let Some(machines) = machines {
        let machines = std::fs::canonicalize(machines)
            .with_context(|| format!("machine configs not found: {}", machines.display()))?;
        args.push("--machines".to_string());
        args.push(machines.display().to_string());
    }

    cmd!(sh, "cargo run --quiet --bin env-compiler -- {args...}").run()?;
    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
