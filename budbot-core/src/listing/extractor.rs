// budbot-core/src/listing/extractor.rs

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use budbot_common::models::ServerRecord;
use budbot_common::traits::monitor_traits::RecordExtractor;
use crate::Error;

/// Structural markers the extractor relies on. Everything else in the page is ignored.
#[derive(Debug, Clone)]
pub struct ListingMarkers {
    pub row_selector: String,
    pub cell_selector: String,
    pub name_cell: usize,
    pub map_cell: usize,
    pub players_cell: usize,
    pub players_separator: char,
}

impl Default for ListingMarkers {
    fn default() -> Self {
        Self {
            row_selector: "tr.serverlistrow".to_string(),
            cell_selector: "td".to_string(),
            name_cell: 1,
            map_cell: 5,
            players_cell: 6,
            players_separator: '/',
        }
    }
}

/// Reads server rows out of the listing HTML.
pub struct HtmlListingExtractor {
    markers: ListingMarkers,
    row_selector: Selector,
    cell_selector: Selector,
}

impl HtmlListingExtractor {
    /// Compiles the marker selectors once; a bad selector is rejected here.
    pub fn new(markers: ListingMarkers) -> Result<Self, Error> {
        let row_selector = parse_selector(&markers.row_selector)?;
        let cell_selector = parse_selector(&markers.cell_selector)?;
        Ok(Self {
            markers,
            row_selector,
            cell_selector,
        })
    }

    fn read_row(&self, row: ElementRef<'_>) -> Result<ServerRecord, Error> {
        let cells: Vec<String> = row
            .select(&self.cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        let cell = |idx: usize, what: &str| {
            cells
                .get(idx)
                .ok_or_else(|| Error::Extraction(format!("missing {what} cell (index {idx}, row has {})", cells.len())))
        };

        let name = cell(self.markers.name_cell, "name")?;
        if name.is_empty() {
            return Err(Error::Extraction("empty server name".into()));
        }
        let map = cell(self.markers.map_cell, "map")?;
        let players = cell(self.markers.players_cell, "players")?;
        let (current_players, capacity) = parse_players(players, self.markers.players_separator)?;

        Ok(ServerRecord {
            name: name.clone(),
            map: map.clone(),
            current_players,
            capacity,
        })
    }
}

impl RecordExtractor for HtmlListingExtractor {
    fn extract(&self, raw: &str) -> Vec<ServerRecord> {
        let document = Html::parse_document(raw);
        let mut records = Vec::new();
        for (idx, row) in document.select(&self.row_selector).enumerate() {
            match self.read_row(row) {
                Ok(record) => {
                    trace!("Row {} => {:?}", idx, record);
                    records.push(record);
                }
                Err(e) => debug!("Skipping listing row {}: {}", idx, e),
            }
        }
        debug!("Extracted {} server records", records.len());
        records
    }
}

fn parse_selector(raw: &str) -> Result<Selector, Error> {
    Selector::parse(raw).map_err(|e| Error::Parse(format!("invalid selector '{raw}': {e:?}")))
}

/// Splits `"12/32"` into `(12, Some(32))`. The left side must be a number; the right side is optional.
fn parse_players(text: &str, separator: char) -> Result<(u32, Option<u32>), Error> {
    let mut parts = text.splitn(2, separator);
    let current = parts.next().unwrap_or_default().trim();
    let current: u32 = current
        .parse()
        .map_err(|_| Error::Extraction(format!("non-numeric player count '{text}'")))?;
    let capacity = parts.next().and_then(|cap| cap.trim().parse::<u32>().ok());
    Ok((current, capacity))
}
