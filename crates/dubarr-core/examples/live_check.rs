use std::sync::Arc;

use dubarr_core::{CatalogSearch, DubarrConfig, SearchRequest, SonarrClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DubarrConfig::from_env()?;
    let client = SonarrClient::with_config(config.client)?;
    println!("🔌 Connecting to {}\n", client.base_url());

    let search = CatalogSearch::new(Arc::new(client), config.search);
    let count = search.load_catalog().await?;
    println!("Loaded {} series", count);

    let query = std::env::args().nth(1).unwrap_or_default();
    let wanted: Vec<&str> = config.wanted.iter().map(|l| l.tag()).collect();
    println!("🔍 Searching '{}' for audio in [{}]\n", query, wanted.join(", "));

    let rows = search.search(SearchRequest::new(query, config.wanted)).await??;

    for row in &rows {
        println!("📺 {} ({:?})", row.title, row.verdict);
        for season in &row.seasons {
            println!("  • {} - {:?}", season.display_name, season.verdict);
            for episode in &season.episodes {
                println!("      E{:02} {} [{:?}]", episode.episode_number, episode.title, episode.verdict);
            }
        }
    }

    println!("\n{} series with files.", rows.len());
    Ok(())
}
