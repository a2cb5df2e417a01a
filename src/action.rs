use std::ops::Add;
use thiserror::Error;
use crate::model::condition::Score;

/// Position of a member in the request's member slice.
pub type Index = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub team_index: Index,
    pub member_index: Index,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Swap(Position, Position),
    Add { member: Index, team_index: Index },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Team {0} is full")]
    TeamFull(Index),
    #[error("Cannot swap members of the same team")]
    SameTeam,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Change of the objective (sum of team average fits).
    ScoreDiff(Score),
    Failed(Vec<ActionError>),
}

impl ActionResult {
    pub fn improves_by(&self, epsilon: Score) -> bool {
        matches!(self, ActionResult::ScoreDiff(diff) if *diff > epsilon)
    }
}

impl Add for ActionResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (ActionResult::ScoreDiff(s1), ActionResult::ScoreDiff(s2))
                => ActionResult::ScoreDiff(s1 + s2),
            (ActionResult::Failed(err1), ActionResult::Failed(err2))
                => ActionResult::Failed(err1.into_iter().chain(err2).collect()),
            (failed @ ActionResult::Failed(_), _) | (_, failed @ ActionResult::Failed(_))
                => failed,
        }
    }
}
