use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use egresados::backup::list_backups;

const SHOWN: usize = 5;

pub fn execute(dir: &Path) -> Result<()> {
    let files = list_backups(dir)?;

    if files.is_empty() {
        println!("{}", format!("No backups in {}", dir.display()).yellow());
        return Ok(());
    }

    println!("{}", format!("Backups in {}", dir.display()).green().bold());
    println!();

    for file in files.iter().take(SHOWN) {
        println!(
            "  {}  {:>8.2} MB  {}",
            file.name.cyan(),
            file.size_mb(),
            file.modified.format("%Y-%m-%d %H:%M")
        );
    }

    if files.len() > SHOWN {
        println!("  ... and {} more", files.len() - SHOWN);
    }

    Ok(())
}
