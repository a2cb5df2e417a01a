use crate::action::{Action, ActionError, ActionResult, Index, Position};
use crate::fit::FitTable;
use crate::model::condition::Score;

fn pair_count(len: usize) -> usize {
    len * len.saturating_sub(1) / 2
}

fn average(fit_sum: Score, len: usize) -> Score {
    match pair_count(len) {
        0 => 0.0,
        pairs => fit_sum / pairs as Score,
    }
}

struct CachedMember {
    pub member: Index,
    /// Sum of fit against every teammate.
    pub score: Score,
}

impl CachedMember {
    fn from_team(member: Index, team: &[Index], table: &FitTable) -> CachedMember {
        let score = team.iter()
            .filter(|m| **m != member)
            .map(|m| table.get_pair([member, *m]))
            .sum();
        CachedMember { member, score }
    }
    fn broadcast_adding(&self, others: &mut [CachedMember], table: &FitTable) {
        others.iter_mut().for_each(|m| m.score += table.get_pair([self.member, m.member]));
    }
    fn broadcast_removed(&self, others: &mut [CachedMember], table: &FitTable) {
        others.iter_mut().for_each(|m| m.score -= table.get_pair([self.member, m.member]));
    }
}

pub struct TeamCache {
    members: Vec<CachedMember>,
    capacity: usize,
    fit_sum: Score,
}

impl TeamCache {
    pub fn create(members: &[Index], capacity: usize, table: &FitTable) -> TeamCache {
        let cached: Vec<CachedMember> = members.iter()
            .map(|m| CachedMember::from_team(*m, members, table))
            .collect();
        let fit_sum = cached.iter().map(|m| m.score).sum::<Score>() / 2.0;
        TeamCache { members: cached, capacity, fit_sum }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.members.len() < self.capacity
    }

    pub fn ids(&self) -> Vec<Index> {
        self.members.iter().map(|m| m.member).collect()
    }

    pub fn average(&self) -> Score {
        average(self.fit_sum, self.members.len())
    }

    fn fit_with(&self, member: Index, skip: Option<Index>, table: &FitTable) -> Score {
        self.members.iter().enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, m)| table.get_pair([member, m.member]))
            .sum()
    }

    fn simulate_add(&self, member: Index, table: &FitTable) -> ActionResult {
        let new_sum = self.fit_sum + self.fit_with(member, None, table);
        ActionResult::ScoreDiff(average(new_sum, self.len() + 1) - self.average())
    }

    fn simulate_swap(&self, index: Index, member: Index, table: &FitTable) -> ActionResult {
        if let Some(removed) = self.members.get(index) {
            let new_sum = self.fit_sum - removed.score + self.fit_with(member, Some(index), table);
            ActionResult::ScoreDiff(average(new_sum, self.len()) - self.average())
        } else {
            ActionResult::Failed(vec![ActionError::InvalidPosition])
        }
    }

    fn add(&mut self, member: Index, table: &FitTable) -> Result<(), ActionError> {
        let cache = CachedMember {
            member,
            score: self.fit_with(member, None, table),
        };
        cache.broadcast_adding(&mut self.members, table);
        self.fit_sum += cache.score;
        self.members.push(cache);
        Ok(())
    }

    fn swap(&mut self, index: Index, member: Index, table: &FitTable) -> Result<Index, ActionError> {
        if self.members.len() <= index {
            return Err(ActionError::InvalidPosition);
        }
        let removed = self.members.remove(index);
        removed.broadcast_removed(&mut self.members, table);
        self.fit_sum -= removed.score;
        let cache = CachedMember {
            member,
            score: self.members.iter().map(|m| table.get_pair([member, m.member])).sum(),
        };
        cache.broadcast_adding(&mut self.members, table);
        self.fit_sum += cache.score;
        self.members.insert(index, cache);
        Ok(removed.member)
    }
}

/// All teams of one request; the objective is the sum of team average fits.
pub struct TableCache {
    pub teams: Vec<TeamCache>,
}

impl TableCache {
    pub fn create(teams: &[Vec<Index>], capacities: &[usize], table: &FitTable) -> TableCache {
        let teams = teams.iter().zip(capacities.iter())
            .map(|(members, capacity)| TeamCache::create(members, *capacity, table))
            .collect();
        TableCache { teams }
    }

    pub fn objective(&self) -> Score {
        self.teams.iter().map(TeamCache::average).sum()
    }

    fn get_member(&self, position: &Position) -> Option<&CachedMember> {
        self.teams.get(position.team_index)?.members.get(position.member_index)
    }

    pub fn simulate(&self, action: &Action, table: &FitTable) -> ActionResult {
        match action {
            Action::Add { member, team_index } => {
                match self.teams.get(*team_index) {
                    Some(team) if team.is_open() => team.simulate_add(*member, table),
                    Some(_) => ActionResult::Failed(vec![ActionError::TeamFull(*team_index)]),
                    None => ActionResult::Failed(vec![ActionError::InvalidPosition]),
                }
            }
            Action::Swap(position1, position2) => {
                if position1.team_index == position2.team_index {
                    return ActionResult::Failed(vec![ActionError::SameTeam]);
                }
                if let (Some(member1), Some(member2)) = (self.get_member(position1), self.get_member(position2)) {
                    self.teams[position1.team_index].simulate_swap(position1.member_index, member2.member, table)
                        + self.teams[position2.team_index].simulate_swap(position2.member_index, member1.member, table)
                } else {
                    ActionResult::Failed(vec![ActionError::InvalidPosition])
                }
            }
        }
    }

    pub fn act(&mut self, action: Action, table: &FitTable) -> Result<(), ActionError> {
        match action {
            Action::Add { member, team_index } => {
                let team = self.teams.get_mut(team_index).ok_or(ActionError::InvalidPosition)?;
                if !team.is_open() {
                    return Err(ActionError::TeamFull(team_index));
                }
                team.add(member, table)
            }
            Action::Swap(position1, position2) => {
                if position1.team_index == position2.team_index {
                    return Err(ActionError::SameTeam);
                }
                let member1 = self.get_member(&position1).ok_or(ActionError::InvalidPosition)?.member;
                let member2 = self.get_member(&position2).ok_or(ActionError::InvalidPosition)?.member;
                self.teams[position1.team_index].swap(position1.member_index, member2, table)?;
                self.teams[position2.team_index].swap(position2.member_index, member1, table)?;
                Ok(())
            }
        }
    }

    pub fn assignments(&self) -> Vec<Vec<Index>> {
        self.teams.iter().map(TeamCache::ids).collect()
    }
}
