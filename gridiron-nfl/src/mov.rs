//! Average scoring margin per team.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GameRecord, Team};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMargin {
    pub team: Team,
    pub scored: u32,
    pub allowed: u32,
    pub games: u32,
}
impl TeamMargin {
    /// Mean points scored minus mean points allowed.
    pub fn margin(&self) -> f64 {
        (self.scored as f64 - self.allowed as f64) / self.games as f64
    }

    fn add(&mut self, scored: u16, allowed: u16) {
        self.scored += scored as u32;
        self.allowed += allowed as u32;
        self.games += 1;
    }
}

/// Tallies the margin of victory of every team that has played at least one of the given games,
/// ordered by team. Games without a final score are skipped.
pub fn margin_of_victory<'a>(games: impl IntoIterator<Item = &'a GameRecord>) -> Vec<TeamMargin> {
    let mut margins: BTreeMap<&Team, TeamMargin> = BTreeMap::new();
    for game in games {
        let Some((home_score, away_score)) = game.scores() else {
            continue;
        };
        for (team, scored, allowed) in [
            (&game.home_team, home_score, away_score),
            (&game.away_team, away_score, home_score),
        ] {
            margins
                .entry(team)
                .or_insert_with(|| TeamMargin {
                    team: team.clone(),
                    scored: 0,
                    allowed: 0,
                    games: 0,
                })
                .add(scored, allowed);
        }
    }
    margins.into_values().collect()
}
