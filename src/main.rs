use anyhow::Context;
use dakar_scout::scrapers::ExpatDakarScraper;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🕷️ Dakar Scout - expat-dakar.com listing scraper");
    info!("=================================================");
    info!("");

    // Caller-supplied parameters: category label and page count.
    let mut args = std::env::args().skip(1);
    let category = args
        .next()
        .unwrap_or_else(|| "furnished-apartment".to_string());
    let page_count: u32 = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid page count: {raw}"))?,
        None => 3,
    };

    let scraper = ExpatDakarScraper::new();

    info!("Starting crawl of {page_count} page(s) of {category}...");
    info!("");

    let result = scraper.run(&category, page_count).await?;

    // Display results
    info!("\n✅ Scraped {} listings\n", result.len());

    for (i, listing) in result.records().iter().take(10).enumerate() {
        println!(
            "{}. {}",
            i + 1,
            listing.title.as_deref().unwrap_or("(no title)")
        );
        if let Some(address) = &listing.address {
            println!("   {address}");
        }
        if let (Some(rooms), Some(surface)) = (&listing.room_count, &listing.surface_area) {
            println!("   {rooms}, {surface}");
        }
        if let Some(price) = &listing.price {
            println!("   {price}");
        }
        println!();
    }
    if result.len() > 10 {
        println!("... and {} more", result.len() - 10);
    }

    // Persist the tabular dataset for the dashboard side.
    tokio::fs::create_dir_all("data").await?;

    let csv_path = format!("data/{category}.csv");
    tokio::fs::write(&csv_path, result.to_csv()?).await?;
    info!("💾 Saved CSV to {csv_path}");

    let json_path = format!("data/{category}.json");
    let json = serde_json::to_string_pretty(result.records())?;
    tokio::fs::write(&json_path, json).await?;
    info!("💾 Saved JSON to {json_path}");

    Ok(())
}
