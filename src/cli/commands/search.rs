use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_search(
    config: Config,
    keyword: &str,
    city: &str,
    page: usize,
) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    println!("Searching: {keyword} en {city} (página {page})");

    let result = state.search_service.search(keyword, city, page).await?;

    if result.pizzerias.is_empty() {
        println!("No pizzerias found ({} total results)", result.total_results);
        return Ok(());
    }

    println!(
        "Page {}/{} - {} total results",
        result.page, result.total_pages, result.total_results
    );
    println!("{:-<60}", "");

    for pizzeria in &result.pizzerias {
        let rating = pizzeria
            .rating
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        println!("• {} [{}]", pizzeria.name, rating);
        println!("  {}", pizzeria.address);
        if let Some(url) = &pizzeria.google_maps_url {
            println!("  {url}");
        }
    }

    if result.has_more {
        println!();
        println!(
            "Next page: pizzerias search \"{keyword}\" \"{city}\" --page {}",
            result.page + 1
        );
    }

    Ok(())
}
