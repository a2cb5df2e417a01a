use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::action::{Action, Index};
use crate::cache::TableCache;
use crate::config::{PartitionConfig, RemainderPolicy};
use crate::error::{AffinityError, Result};
use crate::fit::FitTable;
use crate::model::condition::GroupingCriteria;
use crate::model::entity::Member;
use crate::model::group::{Diversity, Partition, Team};
use crate::search::{self, Params};
use crate::seed::{self, Strategy};

pub struct TeamPartitioner {
    config: PartitionConfig,
}

impl Default for TeamPartitioner {
    fn default() -> Self {
        TeamPartitioner { config: PartitionConfig::default() }
    }
}

/// Team capacities for `n` members. Fewer members than `team_size` yields a
/// single team holding everyone.
fn capacities(n: usize, team_size: usize, policy: RemainderPolicy) -> Vec<usize> {
    if n < team_size {
        return vec![n];
    }
    let mut capacities = vec![team_size; n / team_size];
    if policy == RemainderPolicy::AppendToLast {
        if let Some(last) = capacities.last_mut() {
            *last += n % team_size;
        }
    }
    capacities
}

fn diversity(members: &[Member], team: &[Index]) -> Diversity {
    let departments: HashSet<_> = team.iter().filter_map(|m| members[*m].top_unit()).collect();
    let personality_types: HashSet<_> = team.iter().filter_map(|m| members[*m].personality_type()).collect();
    let locations: HashSet<_> = team.iter().filter_map(|m| members[*m].place()).collect();
    Diversity {
        departments: departments.len(),
        personality_types: personality_types.len(),
        locations: locations.len(),
    }
}

/// Places each member into the open team it fits best on average; members
/// left over once every team is full are returned.
fn greedy_fill(cache: &mut TableCache, table: &FitTable, unassigned: Vec<Index>) -> Result<Vec<Index>> {
    let mut remainder = Vec::new();
    for member in unassigned {
        let best = cache
            .teams
            .iter()
            .enumerate()
            .filter(|(_, team)| team.is_open())
            .map(|(index, team)| (index, table.mean_against(member, &team.ids())))
            .fold(None, |best: Option<(Index, f64)>, (index, fit)| match best {
                Some((_, top)) if top >= fit => best,
                _ => Some((index, fit)),
            });
        match best {
            Some((team_index, _)) => cache.act(Action::Add { member, team_index }, table)?,
            None => remainder.push(member),
        }
    }
    Ok(remainder)
}

impl TeamPartitioner {
    pub fn new(config: PartitionConfig) -> Result<TeamPartitioner> {
        config.validate()?;
        Ok(TeamPartitioner { config })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    pub fn partition<R: Rng + ?Sized>(
        &self,
        members: &[Member],
        team_size: usize,
        criteria: &GroupingCriteria,
        rng: &mut R,
    ) -> Result<Partition> {
        if team_size < 1 || members.is_empty() {
            return Err(AffinityError::InvalidTeamSize { team_size, member_count: members.len() });
        }
        let _span = tracing::debug_span!("partition_teams", members = members.len(), team_size).entered();

        let mut order: Vec<Index> = (0..members.len()).collect();
        order.shuffle(rng);

        let table = FitTable::build(members, criteria);
        let capacities = capacities(members.len(), team_size, self.config.remainder_policy);
        let strategy = Strategy::for_criteria(criteria);
        let seeding = seed::seed(members, &order, &capacities, strategy);
        tracing::debug!(?strategy, teams = capacities.len(), unassigned = seeding.unassigned.len(), "teams seeded");

        let mut cache = TableCache::create(&seeding.teams, &capacities, &table);
        let remainder = greedy_fill(&mut cache, &table, seeding.unassigned)?;

        if self.config.optimize {
            let params = Params {
                max_iterations: self.config.max_swap_iterations,
                time_budget: self.config.time_budget(),
            };
            search::refine(&mut cache, &table, &params)?;
        }

        let teams = cache
            .teams
            .iter()
            .enumerate()
            .map(|(index, team)| {
                let ids = team.ids();
                Team {
                    index,
                    members: ids.iter().map(|m| members[*m].id).collect(),
                    diversity: diversity(members, &ids),
                    average_fit: team.average(),
                }
            })
            .collect();

        Ok(Partition {
            teams,
            remainder: remainder.into_iter().map(|m| members[m].id).collect(),
        })
    }
}

pub fn partition_teams(
    members: &[Member],
    team_size: usize,
    criteria: &GroupingCriteria,
    optimize: bool,
    max_swap_iterations: usize,
) -> Result<Partition> {
    let mut rng = SmallRng::from_entropy();
    partition_teams_with_rng(members, team_size, criteria, optimize, max_swap_iterations, &mut rng)
}

pub fn partition_teams_with_rng<R: Rng + ?Sized>(
    members: &[Member],
    team_size: usize,
    criteria: &GroupingCriteria,
    optimize: bool,
    max_swap_iterations: usize,
    rng: &mut R,
) -> Result<Partition> {
    let config = PartitionConfig { optimize, max_swap_iterations, ..PartitionConfig::default() };
    TeamPartitioner::new(config)?.partition(members, team_size, criteria, rng)
}
