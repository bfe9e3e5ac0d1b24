use thiserror::Error;

use crate::domain::Team;

/// Input that the computation needs but that was not supplied. Never zero-filled.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MissingData {
    #[error("no point breakdown for game {game_id}")]
    PointBreakdown { game_id: String },

    #[error("no rating for team {team}")]
    Rating { team: Team },
}

/// Input for which the computation is undefined.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DegenerateInput {
    #[error("no games were played in the window")]
    EmptyWindow,

    #[error("no games were played at a home venue")]
    NoHomeGames,
}
