use crate::api::AppState;

pub async fn cmd_search(state: &AppState, query: &str, lang: &str) -> anyhow::Result<()> {
    println!("Searching for: {query} ({lang})");

    let results = state.search_service().search(query, lang).await;

    if results.degraded {
        println!("Warning: the content backend did not answer every lookup");
    }

    if results.destinations.is_empty() && results.articles.is_empty() {
        println!("Nothing found matching '{query}'");
        return Ok(());
    }

    if !results.destinations.is_empty() {
        println!();
        println!("Destinations:");
        println!("{:-<60}", "");
        for result in &results.destinations {
            let name = result.entity.name().unwrap_or("?");
            println!("• {} [{}] score {}", name, result.entity.kind, result.score);
            println!("  {}", result.link);
        }
    }

    if !results.articles.is_empty() {
        println!();
        println!("Articles:");
        println!("{:-<60}", "");
        for result in &results.articles {
            let title = result.entity.title().unwrap_or("?");
            println!("• {} score {}", title, result.score);
            println!("  {}", result.link);
        }
    }

    Ok(())
}
