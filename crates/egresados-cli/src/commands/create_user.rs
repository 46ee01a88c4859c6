use anyhow::{bail, Result};
use colored::Colorize;
use egresados::auth::hash_password;
use egresados::Database;

pub async fn execute(db: &Database, name: &str, password: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("User name cannot be empty");
    }
    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    db.create_schema().await?;
    let hash = hash_password(password)?;

    if db.find_user(name).await?.is_some() {
        db.set_password_hash(name, &hash).await?;
        println!("{} Password updated for {}", "✓".green(), name.cyan());
    } else {
        db.create_user(name, &hash).await?;
        println!("{} Created user {}", "✓".green(), name.cyan());
    }

    Ok(())
}
