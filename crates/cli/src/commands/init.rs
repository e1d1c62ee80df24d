use colored::Colorize;
use di_core::config::loader::CONFIG_DIR;
use di_core::init::{generate_project_structure, InitOptions};
use std::path::Path;

pub async fn handle(root: &Path, force: bool, minimal: bool) -> color_eyre::Result<()> {
    let written = generate_project_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    })
    .await?;

    println!(
        "{} Initialized {}",
        "✓".green().bold(),
        root.join(CONFIG_DIR).display()
    );
    for file in written {
        println!("  {file}");
    }
    Ok(())
}
