use colored::Colorize;
use di_core::config::models::AppConfig;
use di_core::store::{AnalysisStore, SqliteStore};

pub async fn sessions(config: &AppConfig, limit: u32) -> color_eyre::Result<()> {
    let store = SqliteStore::open(&config.database_path()).await?;
    let sessions = store.recent_sessions(limit).await?;
    store.close().await;

    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<36}  {:<24}  {:<16}  {:>6}  {:>8}  {:>10}  {:>8}",
            "SESSION", "FILE", "TYPE", "STAGES", "TOKENS", "COST USD", "SECONDS"
        )
        .bold()
    );
    for session in sessions {
        println!(
            "{:<36}  {:<24}  {:<16}  {:>6}  {:>8}  {:>10.6}  {:>8.2}",
            session.session_id,
            truncate(&session.filename, 24),
            truncate(session.document_type.as_deref().unwrap_or("-"), 16),
            format!(
                "{}/{}",
                session.successful_stages,
                session.successful_stages + session.failed_stages
            ),
            session.total_tokens,
            session.estimated_cost_usd,
            session.total_duration_seconds
        );
    }
    Ok(())
}

pub async fn summary(config: &AppConfig) -> color_eyre::Result<()> {
    let store = SqliteStore::open(&config.database_path()).await?;
    let summary = store.summary().await?;
    store.close().await;

    println!("{} {}", "Sessions:".bold(), summary.total_sessions);
    println!("{} {}", "Tokens:".bold(), summary.total_tokens);
    println!("{} ${:.6}", "Cost:".bold(), summary.total_cost_usd);
    println!(
        "{} {:.2}s",
        "Average duration:".bold(),
        summary.average_duration_seconds
    );
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
