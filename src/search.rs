use std::time::{Duration, Instant};

use itertools::{iproduct, Itertools};

use crate::action::{Action, ActionError, Index, Position};
use crate::cache::TableCache;
use crate::fit::FitTable;
use crate::model::condition::Score;

/// Gains below this are treated as float noise, not improvement.
pub const IMPROVEMENT_EPSILON: Score = 1e-12;

pub struct Params {
    pub max_iterations: usize,
    pub time_budget: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub passes: usize,
    pub swaps: usize,
    pub converged: bool,
    pub objective: Score,
}

struct SwapGenerator {
    sizes: Vec<Index>,
}

impl SwapGenerator {
    fn candidates(&self) -> impl Iterator<Item = Action> + '_ {
        (0..self.sizes.len())
            .tuple_combinations()
            .flat_map(move |(t1, t2)| {
                iproduct!(0..self.sizes[t1], 0..self.sizes[t2]).map(move |(i, j)| {
                    Action::Swap(
                        Position { team_index: t1, member_index: i },
                        Position { team_index: t2, member_index: j },
                    )
                })
            })
    }
}

/// Applies every strictly improving swap, pass after pass, until a pass finds
/// none or a limit is hit. Team sizes never change.
pub fn refine(cache: &mut TableCache, table: &FitTable, params: &Params) -> Result<Outcome, ActionError> {
    let started = Instant::now();
    let generator = SwapGenerator { sizes: cache.teams.iter().map(|t| t.len()).collect() };
    let mut passes = 0;
    let mut swaps = 0;
    let mut converged = false;

    while passes < params.max_iterations {
        if params.time_budget.is_some_and(|budget| started.elapsed() >= budget) {
            tracing::warn!(passes, "swap search time budget exhausted");
            break;
        }
        passes += 1;
        let mut improved = false;
        for action in generator.candidates() {
            if cache.simulate(&action, table).improves_by(IMPROVEMENT_EPSILON) {
                cache.act(action, table)?;
                swaps += 1;
                improved = true;
            }
        }
        if !improved {
            converged = true;
            break;
        }
    }

    let outcome = Outcome { passes, swaps, converged, objective: cache.objective() };
    tracing::debug!(passes, swaps, converged, objective = outcome.objective, "swap search finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::condition::GroupingCriteria;
    use crate::model::entity::Member;

    fn setup() -> (FitTable, TableCache) {
        let members: Vec<Member> = ["Sales", "Finance", "Sales", "Finance", "Sales", "Finance"]
            .iter()
            .enumerate()
            .map(|(i, d)| Member::new(i as u64, "").with_department(*d))
            .collect();
        let criteria = GroupingCriteria { similar_departments: true, ..GroupingCriteria::default() };
        let table = FitTable::build(&members, &criteria);
        let cache = TableCache::create(&[vec![0, 1, 2], vec![3, 4, 5]], &[3, 3], &table);
        (table, cache)
    }

    #[test]
    fn swaps_until_no_improvement() {
        let (table, mut cache) = setup();
        let before = cache.objective();
        let outcome = refine(&mut cache, &table, &Params { max_iterations: 100, time_budget: None }).unwrap();
        assert!(outcome.converged);
        assert!(outcome.objective > before);
        let mut teams = cache.assignments();
        teams.iter_mut().for_each(|t| t.sort());
        assert!(teams.contains(&vec![0, 2, 4]));
        assert!(teams.contains(&vec![1, 3, 5]));
    }

    #[test]
    fn iteration_cap_is_respected() {
        let (table, mut cache) = setup();
        let outcome = refine(&mut cache, &table, &Params { max_iterations: 0, time_budget: None }).unwrap();
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.swaps, 0);
        assert!(!outcome.converged);
    }

    #[test]
    fn exhausted_time_budget_stops_before_first_pass() {
        let (table, mut cache) = setup();
        let before = cache.objective();
        let outcome = refine(&mut cache, &table, &Params { max_iterations: 100, time_budget: Some(Duration::ZERO) }).unwrap();
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.objective, before);
    }
}
