use crate::api::AppState;
use crate::domain::EntityId;
use crate::services::Fetch;

pub async fn cmd_breadcrumb(state: &AppState, id: &str, lang: &str) -> anyhow::Result<()> {
    let id = EntityId::from(id.trim());

    match state.breadcrumbs.resolve(&id, lang).await {
        Fetch::Found(trail) => {
            println!("Region:       {}", trail.region_slug);
            println!("Province:     {}", trail.province_slug);
            println!("Municipality: {}", trail.municipality_slug);
            println!();
            for crumb in &trail.breadcrumb {
                println!("{:<20} {}", crumb.label, crumb.path);
            }
            Ok(())
        }
        Fetch::Empty => {
            println!("Destination {id} not found or not translated in '{lang}'");
            Ok(())
        }
        Fetch::Failed(failure) => Err(anyhow::anyhow!("Breadcrumb lookup failed: {failure}")),
    }
}
