use anyhow::Context;
use chrono::Utc;
use std::path::Path;

use crate::api::AppState;

pub async fn cmd_sitemap(state: &AppState, output: Option<&Path>) -> anyhow::Result<()> {
    let xml = state.sitemap.generate(Utc::now()).await?;

    match output {
        Some(path) => {
            std::fs::write(path, xml)
                .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;
            println!("Sitemap written to {}", path.display());
        }
        None => println!("{xml}"),
    }

    Ok(())
}
