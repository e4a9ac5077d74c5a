use chrono::NaiveDateTime;
use itertools::Itertools;
use ::scraper::{CaseSensitivity, ElementRef, Html, Selector};
use tracing::debug;

use crate::error::Result;
use crate::model::MatchRecord;
use crate::vlr_scraper::matches::game::parse_map;
use crate::vlr_scraper::{first_text, full_text};

const UTC_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extract a [`MatchRecord`] from a match page.
///
/// Missing markup never fails the parse; it only leaves the affected fields
/// empty. Errors come from selector construction alone.
pub fn parse_match_page(document: &Html, url: &str) -> Result<MatchRecord> {
    let root = document.root_element();

    let event_labels_selector =
        Selector::parse("div.match-header-super a.match-header-event > div > div")?;
    let event_labels = root
        .select(&event_labels_selector)
        .map(|e| full_text(&e))
        .collect_vec();

    let team_names_selector = Selector::parse("div.match-header-vs div.wf-title-med")?;
    let team_names = root
        .select(&team_names_selector)
        .map(|e| full_text(&e))
        .collect_vec();

    let vs_note_selector = Selector::parse("div.match-header-vs-note")?;
    let vs_notes = root
        .select(&vs_note_selector)
        .map(|e| full_text(&e))
        .collect_vec();

    let date_selector = Selector::parse("div.match-header-date div.moment-tz-convert")?;
    let date_elements = root.select(&date_selector).collect_vec();
    let starts_at = date_elements
        .first()
        .and_then(|e| e.value().attr("data-utc-ts"))
        .and_then(|ts| NaiveDateTime::parse_from_str(ts.trim(), UTC_TS_FORMAT).ok());

    let games_selector = Selector::parse("div.vm-stats-container div.vm-stats-game")?;
    let maps = root
        .select(&games_selector)
        .map(|g| parse_map(&g))
        .filter_map_ok(|m| m)
        .collect::<Result<Vec<_>>>()?;

    let record = MatchRecord {
        url: url.to_string(),
        match_id: match_id_from_url(url),
        team_1: team_names.first().cloned(),
        team_2: team_names.get(1).cloned(),
        event: event_labels.first().cloned(),
        event_series: event_labels.get(1).cloned(),
        score: parse_score(&root)?,
        stage: vs_notes.first().cloned(),
        match_format: vs_notes.get(1).cloned(),
        date: date_elements.first().map(full_text),
        time: date_elements.get(1).map(full_text),
        starts_at,
        maps,
    };
    debug!(url, maps = record.maps.len(), "parsed match page");
    Ok(record)
}

/// Left and right series score from the first revealed spoiler block.
fn parse_score(root: &ElementRef) -> Result<(String, String)> {
    let spoiler_selector = Selector::parse("div.match-header-vs-score div.js-spoiler")?;
    let number_selector = Selector::parse("span:not(.match-header-vs-score-colon)")?;

    let revealed = root.select(&spoiler_selector).find(|e| {
        !e.value()
            .has_class("mod-hidden", CaseSensitivity::CaseSensitive)
    });
    let Some(block) = revealed else {
        return Ok((String::new(), String::new()));
    };

    let numbers = block.select(&number_selector).collect_vec();
    let (left, right) = match numbers.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (first_text(only), String::new()),
        [first, .., last] => (first_text(first), first_text(last)),
    };
    Ok((left, right))
}

/// Numeric id from `https://www.vlr.gg/{id}/{slug}`.
fn match_id_from_url(url: &str) -> Option<u32> {
    let path = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    path.split('/').nth(1).and_then(|id| id.parse().ok())
}
