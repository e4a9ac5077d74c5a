use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::model::{PlayerRecord, PlayerStats, StatCategory, StatLine};
use crate::vlr_scraper::{select_attr, select_text_opt};

/// Cell index of each stat in a stats table row.
///
/// Several stat cells share the `mod-stat` class, so they can only be told
/// apart by position. A layout change on the site needs an edit here only.
pub(crate) const STAT_COLUMNS: [(StatCategory, usize); 12] = [
    (StatCategory::Rating, 2),
    (StatCategory::Acs, 3),
    (StatCategory::Kills, 4),
    (StatCategory::Deaths, 5),
    (StatCategory::Assists, 6),
    (StatCategory::KdDiff, 7),
    (StatCategory::Kast, 8),
    (StatCategory::Adr, 9),
    (StatCategory::HsPct, 10),
    (StatCategory::FirstKills, 11),
    (StatCategory::FirstDeaths, 12),
    (StatCategory::FkDiff, 13),
];

const ROW_CELLS: usize = 14;

struct RowSelectors {
    cell: Selector,
    player: Selector,
    name: Selector,
    team_code: Selector,
    flag: Selector,
    agent_img: Selector,
    stats_sq: Selector,
    both: Selector,
    t: Selector,
    ct: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            cell: Selector::parse("td")?,
            player: Selector::parse("td.mod-player")?,
            name: Selector::parse("div.text-of")?,
            team_code: Selector::parse("div.ge-text-light")?,
            flag: Selector::parse("i.flag")?,
            agent_img: Selector::parse("td.mod-agents img")?,
            stats_sq: Selector::parse("span.stats-sq")?,
            both: Selector::parse("span.mod-both")?,
            t: Selector::parse("span.mod-t")?,
            ct: Selector::parse("span.mod-ct")?,
        })
    }
}

/// One [`PlayerRecord`] per body row of a stats table.
pub(crate) fn parse_players(table: &ElementRef) -> Result<Vec<PlayerRecord>> {
    let row_selector = Selector::parse("tbody tr")?;
    let selectors = RowSelectors::new()?;
    Ok(table
        .select(&row_selector)
        .map(|row| parse_player_row(&row, &selectors))
        .collect_vec())
}

fn parse_player_row(row: &ElementRef, sel: &RowSelectors) -> PlayerRecord {
    let player_cell = row.select(&sel.player).next();
    let name = player_cell.and_then(|c| select_text_opt(&c, &sel.name));
    let team_code = player_cell.and_then(|c| select_text_opt(&c, &sel.team_code));
    let country = player_cell.and_then(|c| select_attr(&c, &sel.flag, "title"));
    let agent = select_attr(row, &sel.agent_img, "title");

    let cells = row.select(&sel.cell).collect_vec();
    if cells.len() < ROW_CELLS {
        debug!(
            cells = cells.len(),
            expected = ROW_CELLS,
            "stats row is shorter than the column table"
        );
    }

    let mut stats = PlayerStats::default();
    for (category, index) in STAT_COLUMNS {
        let line = cells.get(index).and_then(|cell| parse_stat_line(cell, sel));
        stats.set(category, line);
    }

    PlayerRecord {
        name,
        team_code,
        country,
        agent,
        stats,
    }
}

fn parse_stat_line(cell: &ElementRef, sel: &RowSelectors) -> Option<StatLine> {
    cell.select(&sel.stats_sq).next().map(|sq| StatLine {
        both: select_text_opt(&sq, &sel.both),
        t: select_text_opt(&sq, &sel.t),
        ct: select_text_opt(&sq, &sel.ct),
    })
}
