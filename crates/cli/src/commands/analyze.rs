use crate::progress::print_events;
use colored::Colorize;
use di_core::config::models::AppConfig;
use di_core::extract::{PdfTextExtractor, PlainTextExtractor, TextExtractor};
use di_core::service::AnalysisService;
use di_protocol::api_models::AnalyzeResponse;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn handle(
    config: &AppConfig,
    file: &Path,
    json: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("failed to read {}: {e}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let service = AnalysisService::from_config(config)
        .await?
        .with_extractor(extractor_for(file));

    let (tx, rx) = mpsc::channel(64);
    let printer = if quiet {
        tokio::spawn(async move {
            let mut rx = rx;
            while rx.recv().await.is_some() {}
        })
    } else {
        tokio::spawn(print_events(rx))
    };

    let result = service.analyze(bytes, &filename, &tx).await;
    drop(tx);
    let _ = printer.await;
    let outcome = result?;

    if !outcome.persisted {
        eprintln!(
            "{} result was not saved to {}",
            "warning:".yellow().bold(),
            config.database_path().display()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    } else {
        print_response(&outcome.response);
    }
    Ok(())
}

fn extractor_for(file: &Path) -> Arc<dyn TextExtractor> {
    let is_pdf = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Arc::new(PdfTextExtractor)
    } else {
        Arc::new(PlainTextExtractor)
    }
}

fn print_response(response: &AnalyzeResponse) {
    let result = &response.result;

    println!();
    println!("{} {}", "Document type:".bold(), result.document_type);
    println!();
    println!("{}", "Summary".bold().underline());
    println!("{}", result.summary);

    if !result.key_sections.is_empty() {
        println!();
        println!("{}", "Key sections".bold().underline());
        for (name, value) in &result.key_sections {
            let value = match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            };
            println!("  {} {}", format!("{name}:").cyan(), value);
        }
    }

    if !result.insights.is_empty() {
        println!();
        println!("{}", "Insights".bold().underline());
        for insight in &result.insights {
            println!("  • {insight}");
        }
    }

    let usage = &response.analytics.usage;
    println!();
    println!(
        "{} {} · {} tokens in {} calls · ${:.6} · {:.2}s",
        "Session".dimmed(),
        response.session_id.dimmed(),
        usage.usage.total_tokens,
        usage.usage.api_call_count,
        usage.estimated_cost_usd,
        response.analytics.total_duration_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_choice_by_extension() {
        // Only the PDF extractor rejects non-PDF bytes
        let rt = tokio::runtime::Runtime::new().unwrap();
        let text = b"plain text".to_vec();

        let plain = extractor_for(Path::new("notes.md"));
        assert!(rt.block_on(plain.extract(text.clone())).is_ok());

        let pdf = extractor_for(Path::new("REPORT.PDF"));
        assert!(rt.block_on(pdf.extract(text)).is_err());
    }
}
