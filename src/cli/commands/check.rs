use crate::api::{AppState, ContentSource};

pub async fn cmd_check(state: &AppState) -> anyhow::Result<()> {
    let source = match state.content_source {
        ContentSource::Cms => state.config().cms.base_url.as_str(),
        ContentSource::Snapshot => "offline snapshot",
    };
    println!("Checking content backend: {source}");

    state
        .content()
        .check_connection()
        .await
        .map_err(|failure| anyhow::anyhow!("Content backend check failed: {failure}"))?;

    println!("✓ Content backend reachable");
    Ok(())
}
