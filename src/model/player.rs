use serde::{Deserialize, Serialize};

/// A row of a map's stats table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: Option<String>,
    pub team_code: Option<String>,
    pub country: Option<String>,
    pub agent: Option<String>,
    pub stats: PlayerStats,
}

/// The twelve stat columns of a player row.
///
/// A category is `None` when its cell has no stats widget at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub rating: Option<StatLine>,
    pub acs: Option<StatLine>,
    pub kills: Option<StatLine>,
    pub deaths: Option<StatLine>,
    pub assists: Option<StatLine>,
    pub kd_diff: Option<StatLine>,
    pub kast: Option<StatLine>,
    pub adr: Option<StatLine>,
    pub hs_pct: Option<StatLine>,
    pub first_kills: Option<StatLine>,
    pub first_deaths: Option<StatLine>,
    pub fk_diff: Option<StatLine>,
}

impl PlayerStats {
    pub fn get(&self, category: StatCategory) -> Option<&StatLine> {
        match category {
            StatCategory::Rating => self.rating.as_ref(),
            StatCategory::Acs => self.acs.as_ref(),
            StatCategory::Kills => self.kills.as_ref(),
            StatCategory::Deaths => self.deaths.as_ref(),
            StatCategory::Assists => self.assists.as_ref(),
            StatCategory::KdDiff => self.kd_diff.as_ref(),
            StatCategory::Kast => self.kast.as_ref(),
            StatCategory::Adr => self.adr.as_ref(),
            StatCategory::HsPct => self.hs_pct.as_ref(),
            StatCategory::FirstKills => self.first_kills.as_ref(),
            StatCategory::FirstDeaths => self.first_deaths.as_ref(),
            StatCategory::FkDiff => self.fk_diff.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, category: StatCategory, line: Option<StatLine>) {
        let slot = match category {
            StatCategory::Rating => &mut self.rating,
            StatCategory::Acs => &mut self.acs,
            StatCategory::Kills => &mut self.kills,
            StatCategory::Deaths => &mut self.deaths,
            StatCategory::Assists => &mut self.assists,
            StatCategory::KdDiff => &mut self.kd_diff,
            StatCategory::Kast => &mut self.kast,
            StatCategory::Adr => &mut self.adr,
            StatCategory::HsPct => &mut self.hs_pct,
            StatCategory::FirstKills => &mut self.first_kills,
            StatCategory::FirstDeaths => &mut self.first_deaths,
            StatCategory::FkDiff => &mut self.fk_diff,
        };
        *slot = line;
    }
}

/// Overall, attack (T) and defense (CT) values of one stat, as shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub both: Option<String>,
    pub t: Option<String>,
    pub ct: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StatCategory {
    /// The `R` column.
    Rating,
    Acs,
    Kills,
    Deaths,
    Assists,
    KdDiff,
    Kast,
    Adr,
    HsPct,
    FirstKills,
    FirstDeaths,
    FkDiff,
}
