//! Terminal rendering of run events.

use colored::Colorize;
use di_protocol::analytics_models::StageStatus;
use di_protocol::events::Event;
use tokio::sync::mpsc::Receiver;

/// Print events to stderr until the sender is dropped.
pub async fn print_events(mut rx: Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        if let Some(line) = render(&event) {
            eprintln!("{line}");
        }
    }
}

fn render(event: &Event) -> Option<String> {
    match event {
        Event::RunStarted {
            filename,
            text_length,
            ..
        } => Some(format!(
            "{} {} ({} chars)",
            "▶".cyan().bold(),
            filename.bold(),
            text_length
        )),
        Event::PhaseChanged { .. } => None,
        Event::RunLogChunk { content, .. } => Some(format!("  {}", content.dimmed())),
        Event::StageFinished {
            stage,
            status,
            duration_seconds,
            ..
        } => {
            let mark = match status {
                StageStatus::Failed => "✗".red().bold(),
                _ => "✓".green().bold(),
            };
            Some(format!("{mark} {stage} {duration_seconds:.2}s"))
        }
        Event::RunCompleted { .. } => Some(format!("{}", "Analysis complete".green())),
    }
}
