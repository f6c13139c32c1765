//! HTML fallback for world rankings
//!
//! The statistics JSON sometimes ships without an OWGR category; this
//! parses the rankings page table instead. Selector code is tied to the
//! page's current markup and fails soft, row by row.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::warn;

/// One row of the world-ranking table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldRanking {
    pub rank: u32,
    pub name: String,
}

/// Parse the rankings table out of the page HTML
pub fn parse_rankings_table(html: &str) -> Result<Vec<WorldRanking>> {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("table tbody tr")
        .map_err(|e| anyhow::anyhow!("Failed to create row selector: {}", e))?;
    let cell_selector = Selector::parse("td")
        .map_err(|e| anyhow::anyhow!("Failed to create cell selector: {}", e))?;

    let mut rankings = Vec::new();

    for (row_index, row) in document.select(&row_selector).enumerate() {
        match parse_ranking_row(&row, &cell_selector) {
            Ok(Some(ranking)) => rankings.push(ranking),
            Ok(None) => continue,
            Err(e) => {
                warn!("Failed to parse ranking row {}: {}", row_index, e);
                continue;
            }
        }
    }

    Ok(rankings)
}

/// Parse a single table row: rank in the first cell, player name in the
/// second
fn parse_ranking_row(
    row: &scraper::ElementRef,
    cell_selector: &Selector,
) -> Result<Option<WorldRanking>> {
    let mut cells = row.select(cell_selector);

    let rank_cell = cells.next().context("Row has no rank cell")?;
    let name_cell = cells.next().context("Row has no name cell")?;

    let rank_text = rank_cell.text().collect::<String>();
    let rank_text = rank_text.trim();
    if rank_text.is_empty() {
        // Header or spacer row.
        return Ok(None);
    }

    let rank = rank_text
        .parse::<u32>()
        .with_context(|| format!("Failed to parse rank: '{rank_text}'"))?;

    let name = name_cell.text().collect::<String>().trim().to_string();
    if name.is_empty() {
        return Ok(None);
    }

    Ok(Some(WorldRanking { rank, name }))
}
