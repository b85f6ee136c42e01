use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

mod manifest;

use manifest::StackManifest;

#[derive(Parser)]
#[command(name = "cirrus")]
#[command(about = "Synthesize CloudFormation templates for auto scaling stacks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the manifest parses and synthesizes
    Validate {
        /// Path to the stack manifest
        #[arg(default_value = "stack.json")]
        file: PathBuf,
    },
    /// Synthesize the template
    Synth {
        /// Path to the stack manifest
        #[arg(default_value = "stack.json")]
        file: PathBuf,

        /// Write the template here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show what the synthesized template changes against an existing one
    Diff {
        /// Path to the stack manifest
        #[arg(default_value = "stack.json")]
        file: PathBuf,

        /// Template file to compare against
        template: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Synth { file, output } => run_synth(&file, output.as_deref()),
        Commands::Diff { file, template } => run_diff(&file, &template),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cirrus", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_manifest(file: &Path) -> anyhow::Result<StackManifest> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("failed to read manifest {}", file.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest {}", file.display()))
}

fn synthesize_json(file: &Path) -> anyhow::Result<String> {
    let manifest = load_manifest(file)?;
    let template = manifest::synthesize(&manifest)
        .with_context(|| format!("failed to synthesize {}", file.display()))?;
    Ok(template.to_json()?)
}

fn run_validate(file: &Path) -> anyhow::Result<()> {
    let manifest = load_manifest(file)?;
    let template = manifest::synthesize(&manifest)?;
    println!(
        "{} {} ({} resources)",
        "OK".green().bold(),
        file.display(),
        template.len()
    );
    Ok(())
}

fn run_synth(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let json = synthesize_json(file)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_diff(file: &Path, template_path: &Path) -> anyhow::Result<()> {
    let synthesized = synthesize_json(file)?;
    let existing = fs::read_to_string(template_path)
        .with_context(|| format!("failed to read template {}", template_path.display()))?;

    if existing.trim_end() == synthesized.trim_end() {
        println!("{} no changes", "OK".green().bold());
        return Ok(());
    }

    print_diff(template_path, existing.trim_end(), synthesized.trim_end());
    Ok(())
}

fn print_diff(file: &Path, existing: &str, synthesized: &str) {
    println!("{} {}:", "Diff for".cyan().bold(), file.display());

    let diff = TextDiff::from_lines(existing, synthesized);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-".red(),
            ChangeTag::Insert => "+".green(),
            ChangeTag::Equal => " ".normal(),
        };
        print!("{}{}", sign, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "groups": [
            {
                "name": "web",
                "image_id": "ami-12345678",
                "instance_type": "t3.micro",
                "min_capacity": 2,
                "max_capacity": 4
            }
        ]
    }"#;

    #[test]
    fn synth_writes_a_parseable_template() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("stack.json");
        let output_path = dir.path().join("template.json");
        fs::write(&manifest_path, MANIFEST).unwrap();

        run_synth(&manifest_path, Some(&output_path)).unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(
            parsed["Resources"]["Web"]["Type"],
            "AWS::AutoScaling::AutoScalingGroup"
        );
    }

    #[test]
    fn validate_accepts_a_good_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("stack.json");
        fs::write(&manifest_path, MANIFEST).unwrap();
        assert!(run_validate(&manifest_path).is_ok());
    }

    #[test]
    fn validate_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("stack.json");
        fs::write(&manifest_path, "{not json").unwrap();
        assert!(run_validate(&manifest_path).is_err());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        assert!(run_validate(Path::new("/nonexistent/stack.json")).is_err());
    }

    #[test]
    fn diff_against_identical_template_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("stack.json");
        fs::write(&manifest_path, MANIFEST).unwrap();

        let json = synthesize_json(&manifest_path).unwrap();
        let template_path = dir.path().join("template.json");
        fs::write(&template_path, json).unwrap();

        assert!(run_diff(&manifest_path, &template_path).is_ok());
    }
}
