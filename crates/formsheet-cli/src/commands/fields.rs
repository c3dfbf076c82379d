//! Fields command - list the active field registry.

use clap::Args;
use console::style;

use formsheet_core::registry::ValueKind;

use super::load_config;

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Show every rule pattern
    #[arg(short, long)]
    rules: bool,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = config.build_registry()?;

    println!("{}", style("Registered fields:").bold());
    println!();

    let width = registry.iter().map(|f| f.name().len()).max().unwrap_or(0);
    for spec in registry.iter() {
        println!(
            "  {:<width$}  {:<10}  {} rule(s)",
            spec.name(),
            spec.kind().name(),
            spec.rules().len(),
            width = width
        );

        if let ValueKind::Enumerated(choices) = spec.kind() {
            let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
            println!("  {:<width$}  {}", "", style(labels.join(" | ")).dim(), width = width);
        }

        if args.rules {
            for (i, rule) in spec.rules().iter().enumerate() {
                let flag = if rule.is_multiline() { " [multiline]" } else { "" };
                println!("      {}. {}{}", i + 1, style(rule.pattern()).cyan(), flag);
            }
        }
    }

    println!();
    println!("{} fields", registry.len());

    Ok(())
}
