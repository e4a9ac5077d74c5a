use ::scraper::{CaseSensitivity, ElementRef, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::model::{MapInfo, MapRecord, TeamInMap, TeamOverview};
use crate::vlr_scraper::matches::players::parse_players;
use crate::vlr_scraper::{full_text, select_text_opt};

/// Parse one `div.vm-stats-game` block.
///
/// Blocks without a populated game header (the "all maps" summary, maps that
/// were not played) give `Ok(None)`.
pub(crate) fn parse_map(game: &ElementRef) -> Result<Option<MapRecord>> {
    let header_selector = Selector::parse("div.vm-stats-game-header")?;
    let Some(header) = game
        .select(&header_selector)
        .find(|h| !full_text(h).is_empty())
    else {
        debug!(
            game_id = game.value().attr("data-game-id"),
            "skipping game block without stats header"
        );
        return Ok(None);
    };

    let game_id = game.value().attr("data-game-id").map(str::to_string);

    let team_selector = Selector::parse("div.team")?;
    let teams = header
        .select(&team_selector)
        .map(|t| parse_team_overview(&t))
        .collect::<Result<Vec<_>>>()?;
    let mut teams = teams.into_iter();
    let left = teams.next().unwrap_or_default();
    let right = teams.next().unwrap_or_default();

    let map = parse_map_info(&header)?;

    let table_selector = Selector::parse("table.wf-table-inset")?;
    let tables = game.select(&table_selector).collect_vec();
    let (left_players, right_players) = match tables.as_slice() {
        [first, second, ..] => (Some(parse_players(first)?), Some(parse_players(second)?)),
        _ => {
            debug!(tables = tables.len(), "map block lacks both stats tables");
            (None, None)
        }
    };

    Ok(Some(MapRecord {
        game_id,
        map,
        team_left: TeamInMap {
            overview: left,
            players: left_players,
        },
        team_right: TeamInMap {
            overview: right,
            players: right_players,
        },
    }))
}

fn parse_map_info(header: &ElementRef) -> Result<MapInfo> {
    let map_selector = Selector::parse("div.map")?;
    let Some(map_div) = header.select(&map_selector).next() else {
        return Ok(MapInfo::default());
    };

    let name_selector = Selector::parse("span")?;
    let duration_selector = Selector::parse("div.map-duration")?;
    Ok(MapInfo {
        name: select_text_opt(&map_div, &name_selector),
        duration: select_text_opt(&map_div, &duration_selector),
    })
}

/// Header block of one side. Each field is looked up on its own.
pub(crate) fn parse_team_overview(team: &ElementRef) -> Result<TeamOverview> {
    let score_selector = Selector::parse("div.score")?;
    let name_selector = Selector::parse("div.team-name")?;
    let t_selector = Selector::parse("span.mod-t")?;
    let ct_selector = Selector::parse("span.mod-ct")?;

    let is_winner = team
        .select(&score_selector)
        .next()
        .map(|e| {
            e.value()
                .has_class("mod-win", CaseSensitivity::CaseSensitive)
        })
        .unwrap_or_default();

    Ok(TeamOverview {
        name: select_text_opt(team, &name_selector),
        score: select_text_opt(team, &score_selector),
        t_side_score: select_text_opt(team, &t_selector),
        ct_side_score: select_text_opt(team, &ct_selector),
        is_winner,
    })
}

#[cfg(test)]
mod tests {
    use ::scraper::Html;

    use super::*;

    const HEADER: &str = r#"
      <div class="vm-stats-game-header">
        <div class="team">
          <div class="score mod-win">13</div>
          <div class="team-name">Sentinels</div>
          <div><span class="mod-t">7</span> / <span class="mod-ct">6</span></div>
        </div>
        <div class="map">
          <div><span style="position: relative;">Ascent
            <span class="picked mod-1 color-sq">PICK</span></span></div>
          <div class="map-duration ge-text-light">49:53</div>
        </div>
        <div class="team mod-right">
          <div><span class="mod-ct">5</span> / <span class="mod-t">4</span></div>
          <div class="team-name">LOUD</div>
          <div class="score">9</div>
        </div>
      </div>"#;

    const TABLE: &str = r#"
      <table class="wf-table-inset mod-overview"><tbody>
        <tr><td class="mod-player"><div class="text-of">a</div></td></tr>
        <tr><td class="mod-player"><div class="text-of">b</div></td></tr>
      </tbody></table>"#;

    fn game(inner: &str) -> Html {
        Html::parse_document(&format!(
            r#"<div class="vm-stats-game mod-active" data-game-id="162684">{inner}</div>"#
        ))
    }

    fn parse(html: &Html) -> Option<MapRecord> {
        let selector = Selector::parse("div.vm-stats-game").unwrap();
        parse_map(&html.select(&selector).next().unwrap()).unwrap()
    }

    #[test]
    fn test_full_map_block() {
        let html = game(&format!("{HEADER}<div>{TABLE}</div><div>{TABLE}</div>"));
        let map = parse(&html).unwrap();

        assert_eq!(map.game_id.as_deref(), Some("162684"));
        assert_eq!(map.map.name.as_deref(), Some("Ascent"));
        assert_eq!(map.map.duration.as_deref(), Some("49:53"));

        let left = &map.team_left.overview;
        assert_eq!(left.name.as_deref(), Some("Sentinels"));
        assert_eq!(left.score.as_deref(), Some("13"));
        assert_eq!(left.t_side_score.as_deref(), Some("7"));
        assert_eq!(left.ct_side_score.as_deref(), Some("6"));
        assert!(left.is_winner);

        let right = &map.team_right.overview;
        assert_eq!(right.name.as_deref(), Some("LOUD"));
        assert_eq!(right.t_side_score.as_deref(), Some("4"));
        assert!(!right.is_winner);

        assert_eq!(map.team_left.players.as_ref().map(Vec::len), Some(2));
        assert_eq!(map.team_right.players.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_block_without_header_is_dropped() {
        let html = game(&format!("<div>{TABLE}</div><div>{TABLE}</div>"));
        assert!(parse(&html).is_none());

        let blank_header = game(r#"<div class="vm-stats-game-header">  </div>"#);
        assert!(parse(&blank_header).is_none());
    }

    #[test]
    fn test_single_table_leaves_both_sides_without_players() {
        let html = game(&format!("{HEADER}<div>{TABLE}</div>"));
        let map = parse(&html).unwrap();
        assert!(map.team_left.players.is_none());
        assert!(map.team_right.players.is_none());
        assert_eq!(map.team_left.overview.name.as_deref(), Some("Sentinels"));
    }

    #[test]
    fn test_missing_overview_fields_are_independent() {
        let html = Html::parse_document(
            r#"<div class="team"><div class="team-name">Fnatic</div><span class="mod-ct">8</span></div>"#,
        );
        let selector = Selector::parse("div.team").unwrap();
        let overview = parse_team_overview(&html.select(&selector).next().unwrap()).unwrap();

        assert_eq!(overview.name.as_deref(), Some("Fnatic"));
        assert_eq!(overview.score, None);
        assert_eq!(overview.t_side_score, None);
        assert_eq!(overview.ct_side_score.as_deref(), Some("8"));
        assert!(!overview.is_winner);
    }

    #[test]
    fn test_header_with_one_team_gives_empty_right_overview() {
        let html = game(
            r#"<div class="vm-stats-game-header"><div class="team"><div class="team-name">EG</div></div></div>"#,
        );
        let map = parse(&html).unwrap();
        assert_eq!(map.team_left.overview.name.as_deref(), Some("EG"));
        assert_eq!(map.team_right.overview, TeamOverview::default());
        assert_eq!(map.map, MapInfo::default());
    }
}
