use std::cmp::Reverse;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::action::Index;
use crate::model::condition::GroupingCriteria;
use crate::model::entity::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Whole teams from the largest unit first, leftovers next to their unit.
    UnitBuckets,
    /// Units interleaved so consecutive members come from different units.
    RoundRobin,
    Sequential,
}

impl Strategy {
    pub fn for_criteria(criteria: &GroupingCriteria) -> Strategy {
        if criteria.similar_departments {
            Strategy::UnitBuckets
        } else if criteria.any_diverse() {
            Strategy::RoundRobin
        } else {
            Strategy::Sequential
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Seeding {
    pub teams: Vec<Vec<Index>>,
    pub unassigned: Vec<Index>,
}

/// Groups `order` by top-level unit, keeping first-appearance order. Members
/// without a unit share one bucket.
fn unit_buckets(members: &[Member], order: &[Index]) -> Vec<Vec<Index>> {
    let mut buckets: IndexMap<Option<String>, Vec<Index>> = IndexMap::new();
    for index in order {
        buckets.entry(members[*index].top_unit()).or_default().push(*index);
    }
    buckets.into_values().collect()
}

fn fill_in_order<I: IntoIterator<Item = Index>>(sequence: I, capacities: &[usize]) -> Seeding {
    let mut teams: Vec<Vec<Index>> = capacities.iter().map(|c| Vec::with_capacity(*c)).collect();
    let mut unassigned = Vec::new();
    let mut current = 0;
    for index in sequence {
        while current < teams.len() && teams[current].len() >= capacities[current] {
            current += 1;
        }
        match teams.get_mut(current) {
            Some(team) => team.push(index),
            None => unassigned.push(index),
        }
    }
    Seeding { teams, unassigned }
}

fn round_robin(members: &[Member], order: &[Index], capacities: &[usize]) -> Seeding {
    let buckets = unit_buckets(members, order);
    let rounds = buckets.iter().map(Vec::len).max().unwrap_or(0);
    let interleaved = (0..rounds).flat_map(|round| buckets.iter().filter_map(move |b| b.get(round).copied()));
    fill_in_order(interleaved, capacities)
}

fn unit_bucketed(members: &[Member], order: &[Index], capacities: &[usize]) -> Seeding {
    let buckets: Vec<Vec<Index>> = unit_buckets(members, order)
        .into_iter()
        .sorted_by_key(|bucket| Reverse(bucket.len()))
        .collect();

    let mut teams: Vec<Vec<Index>> = capacities.iter().map(|c| Vec::with_capacity(*c)).collect();
    let mut next_empty = 0;
    let mut leftovers = Vec::new();

    for bucket in buckets {
        let mut rest = bucket.as_slice();
        while next_empty < teams.len() && rest.len() >= capacities[next_empty] {
            let (whole, tail) = rest.split_at(capacities[next_empty]);
            teams[next_empty].extend_from_slice(whole);
            rest = tail;
            next_empty += 1;
        }
        leftovers.extend_from_slice(rest);
    }

    let mut unassigned = Vec::new();
    for index in leftovers {
        let unit = members[index].top_unit();
        let open = |t: &usize| teams[*t].len() < capacities[*t];
        let beside_unit = (0..teams.len())
            .filter(open)
            .filter(|t| unit.is_some() && teams[*t].iter().any(|m| members[*m].top_unit() == unit))
            .min_by_key(|t| teams[*t].len());
        let target = beside_unit.or_else(|| (0..teams.len()).filter(open).min_by_key(|t| teams[*t].len()));
        match target {
            Some(t) => teams[t].push(index),
            None => unassigned.push(index),
        }
    }

    Seeding { teams, unassigned }
}

pub fn seed(members: &[Member], order: &[Index], capacities: &[usize], strategy: Strategy) -> Seeding {
    match strategy {
        Strategy::UnitBuckets => unit_bucketed(members, order, capacities),
        Strategy::RoundRobin => round_robin(members, order, capacities),
        Strategy::Sequential => fill_in_order(order.iter().copied(), capacities),
    }
}
