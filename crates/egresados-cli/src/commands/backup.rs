use anyhow::Result;
use colored::Colorize;
use egresados::backup::{prune_backups, run_backup};
use egresados::{AppConfig, Database};

/// `keep_days` of `None` skips pruning
pub async fn execute(db: &Database, config: &AppConfig, keep_days: Option<u64>) -> Result<()> {
    println!("{}", "Creating backup...".green().bold());

    let file = run_backup(db, &config.database.url, &config.backup).await?;
    println!("  {} {} ({:.2} MB)", "✓".green(), file.name.cyan(), file.size_mb());
    println!("  Location: {}", file.path.display());

    if let Some(days) = keep_days {
        let removed = prune_backups(&config.backup.dir, days)?;
        if removed.is_empty() {
            println!("  {} No backups older than {} days", "•".dimmed(), days);
        } else {
            for old in &removed {
                println!("  {} Removed {}", "✗".red(), old.name);
            }
        }
    }

    Ok(())
}
