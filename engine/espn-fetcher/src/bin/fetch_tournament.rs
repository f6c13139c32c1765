use espn_fetcher::{EspnFetcher, FetcherConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Probing ESPN golf endpoints");

    let config = FetcherConfig::from_env();
    let fetcher = EspnFetcher::new(config)?;

    match fetcher.current_tournament().await {
        Ok(Some(tournament)) => {
            info!("Current tournament: {}", tournament.name);
            info!("  Dates:  {}", tournament.dates);
            info!("  Course: {}", tournament.course);
            if let Some(purse) = &tournament.purse {
                info!("  Purse:  {}", purse);
            }
        }
        Ok(None) => {
            info!("No current or upcoming tournament on the schedule");
        }
        Err(e) => {
            error!("Failed to fetch tournament: {}", e);
        }
    }

    match fetcher.collect_field_stats().await {
        Ok(Some((tournament, field))) => {
            info!("Collected {} field stats for {}", field.len(), tournament.name);
            for player in field.iter().take(5) {
                info!(
                    "  {} - fedex {:?}, sg {:?}",
                    player.name, player.fedex_rank, player.sg_total
                );
            }
        }
        Ok(None) => info!("No field to collect"),
        Err(e) => error!("Failed to collect field stats: {}", e),
    }

    Ok(())
}
