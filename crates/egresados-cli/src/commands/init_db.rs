use anyhow::Result;
use colored::Colorize;
use egresados::auth::{ensure_admin, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER};
use egresados::Database;

pub async fn execute(db: &Database) -> Result<()> {
    println!("{}", "Initializing database...".green().bold());

    db.create_schema().await?;
    println!("  {} Tables ready ({:?})", "✓".green(), db.kind());

    if ensure_admin(db).await? {
        println!("  {} Created user {}", "✓".green(), DEFAULT_ADMIN_USER.cyan());
        println!();
        println!("Password: {}", DEFAULT_ADMIN_PASSWORD.yellow());
        println!("{}", "Change it with `egresados create-user admin --password ...`".dimmed());
    } else {
        println!("  {} User {} already exists", "•".yellow(), DEFAULT_ADMIN_USER.cyan());
    }

    Ok(())
}
