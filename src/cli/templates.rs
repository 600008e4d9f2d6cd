//! Templates command - list the built-in essay templates

use anyhow::Result;
use console::style;

use crate::submission::TEMPLATES;

pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(TEMPLATES)?);
        return Ok(());
    }

    println!("\n{}", style("Essay Templates").bold());
    println!("{}", style("Get started with these proven essay structures").dim());
    println!();
    for t in TEMPLATES {
        println!(
            "{}  {}  {}",
            style(format!("[{}]", t.id)).cyan(),
            style(t.title).bold(),
            style(t.category).dim()
        );
        println!("     {}", t.description);
        println!("     {}\n", style(t.prompt).italic().dim());
    }
    println!(
        "Use one with {}",
        style("essayspark tui  (Templates view, Enter)").cyan()
    );
    Ok(())
}
