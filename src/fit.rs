use std::collections::BTreeSet;

use crate::action::Index;
use crate::model::attribute::{JobLevel, Location, OrgPath, PersonalityType};
use crate::model::condition::{Criterion, GroupingCriteria, Score};
use crate::model::entity::{Member, Tag};
use crate::subscore::{self, NEUTRAL};
use crate::tables;

// Any pair from different top-level units, synergy or not. Below every same-unit tier.
const OTHER_UNIT: Score = 0.3;

struct Traits<'a> {
    unit: Option<String>,
    path: Option<OrgPath>,
    personality: Option<PersonalityType>,
    location: Option<Location>,
    job: Option<JobLevel>,
    tags: &'a BTreeSet<Tag>,
}

impl<'a> Traits<'a> {
    fn of(member: &'a Member) -> Traits<'a> {
        Traits {
            unit: member.top_unit(),
            path: member.org_path(),
            personality: member.personality_type(),
            location: member.place(),
            job: member.job(),
            tags: &member.tags,
        }
    }
}

fn contrast<T: PartialEq>(a: &Option<T>, b: &Option<T>, same: Score) -> Score {
    match (a, b) {
        (Some(a), Some(b)) if a == b => same,
        (Some(_), Some(_)) => 1.0,
        _ => NEUTRAL,
    }
}

fn contribution(criterion: Criterion, a: &Traits<'_>, b: &Traits<'_>) -> Score {
    match criterion {
        Criterion::DiverseDepartments => contrast(&a.unit, &b.unit, 0.2),
        Criterion::DiversePersonalities => match (a.personality, b.personality) {
            (Some(x), Some(y)) if x == y => 0.1,
            (Some(x), Some(y)) if x.temperament() == y.temperament() => 0.4,
            (Some(_), Some(_)) => 1.0,
            _ => NEUTRAL,
        },
        Criterion::DiverseLocations => contrast(&a.location, &b.location, 0.3),
        Criterion::SimilarDepartments => match (&a.path, &b.path) {
            (Some(x), Some(y)) if x.shared_prefix(y) == 0 => OTHER_UNIT,
            (Some(x), Some(y)) => subscore::org_path_score(x, y, false),
            _ => NEUTRAL,
        },
        Criterion::SimilarPersonalities => match (a.personality, b.personality) {
            (Some(x), Some(y)) => tables::PERSONALITY_MATRIX[x.index()][y.index()],
            _ => NEUTRAL,
        },
        Criterion::SimilarLocations => match (&a.location, &b.location) {
            (Some(x), Some(y)) => subscore::location_score(x, y),
            _ => NEUTRAL,
        },
        Criterion::MixedLevels => match (&a.job, &b.job) {
            (Some(x), Some(y)) => subscore::job_level_score(x, y),
            _ => NEUTRAL,
        },
        Criterion::SharedInterests => subscore::tag_overlap(a.tags, b.tags),
    }
}

/// Mean contribution over the active criteria; neutral when none is active.
pub fn pair_fit(a: &Member, b: &Member, criteria: &GroupingCriteria) -> Score {
    fit_of(&Traits::of(a), &Traits::of(b), &criteria.active())
}

fn fit_of(a: &Traits<'_>, b: &Traits<'_>, active: &[Criterion]) -> Score {
    if active.is_empty() {
        return NEUTRAL;
    }
    active.iter().map(|c| contribution(*c, a, b)).sum::<Score>() / active.len() as Score
}

/// Dense table of pair fits, indexed by position in the member slice.
pub struct FitTable {
    size: usize,
    scores: Vec<Score>,
}

impl FitTable {
    pub fn build(members: &[Member], criteria: &GroupingCriteria) -> FitTable {
        let active = criteria.active();
        let traits: Vec<Traits<'_>> = members.iter().map(Traits::of).collect();
        let size = members.len();
        let mut scores = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let score = fit_of(&traits[i], &traits[j], &active);
                scores[i * size + j] = score;
                scores[j * size + i] = score;
            }
        }
        FitTable { size, scores }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get_pair(&self, pair: [Index; 2]) -> Score {
        self.scores[pair[0] * self.size + pair[1]]
    }

    /// Mean fit of `member` against `others`; neutral for an empty team.
    pub fn mean_against(&self, member: Index, others: &[Index]) -> Score {
        if others.is_empty() {
            return NEUTRAL;
        }
        others.iter().map(|o| self.get_pair([member, *o])).sum::<Score>() / others.len() as Score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64, department: &str, personality: &str, location: &str) -> Member {
        Member::new(id, format!("m{id}"))
            .with_department(department)
            .with_personality(personality)
            .with_location(location)
    }

    #[test]
    fn no_active_criteria_is_neutral() {
        let a = member(1, "Sales", "INTJ", "Tokyo");
        let b = member(2, "Finance", "ENFP", "Osaka");
        assert_eq!(pair_fit(&a, &b, &GroupingCriteria::default()), NEUTRAL);
    }

    #[test]
    fn diversity_rewards_difference() {
        let criteria = GroupingCriteria { diverse_departments: true, ..GroupingCriteria::default() };
        let a = member(1, "Sales/East", "INTJ", "Tokyo");
        assert_eq!(pair_fit(&a, &member(2, "sales/West", "INTJ", "Tokyo"), &criteria), 0.2);
        assert_eq!(pair_fit(&a, &member(3, "Finance", "INTJ", "Tokyo"), &criteria), 1.0);

        let criteria = GroupingCriteria { diverse_personalities: true, ..GroupingCriteria::default() };
        assert_eq!(pair_fit(&a, &member(4, "x", "intj", "x"), &criteria), 0.1);
        assert_eq!(pair_fit(&a, &member(5, "x", "ENTP", "x"), &criteria), 0.4);
        assert_eq!(pair_fit(&a, &member(6, "x", "ESFP", "x"), &criteria), 1.0);

        let criteria = GroupingCriteria { diverse_locations: true, ..GroupingCriteria::default() };
        assert_eq!(pair_fit(&a, &member(7, "x", "x", "Tokyo"), &criteria), 0.3);
        assert_eq!(pair_fit(&a, &member(8, "x", "x", "Chiba"), &criteria), 1.0);
    }

    #[test]
    fn similar_departments_rank_any_other_unit_below_own_unit() {
        let criteria = GroupingCriteria { similar_departments: true, ..GroupingCriteria::default() };
        let a = member(1, "Engineering/Platform", "x", "x");
        let own = pair_fit(&a, &member(2, "Engineering/Mobile", "x", "x"), &criteria);
        let synergy = pair_fit(&a, &member(3, "Product", "x", "x"), &criteria);
        let plain = pair_fit(&a, &member(4, "Legal", "x", "x"), &criteria);
        assert_eq!(own, 0.6);
        assert_eq!(synergy, 0.3);
        assert_eq!(plain, 0.3);
        assert_eq!(pair_fit(&a, &member(5, "engineering/platform", "x", "x"), &criteria), 0.6);
    }

    #[test]
    fn active_criteria_are_averaged() {
        let criteria = GroupingCriteria {
            diverse_departments: true,
            similar_locations: true,
            ..GroupingCriteria::default()
        };
        let a = member(1, "Sales", "INTJ", "Tokyo");
        let b = member(2, "Finance", "INTJ", "Chiba");
        assert!((pair_fit(&a, &b, &criteria) - (1.0 + 0.7) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn table_is_symmetric() {
        let members = vec![
            member(1, "Sales", "INTJ", "Tokyo"),
            member(2, "Finance", "ENFP", "Osaka"),
            member(3, "Sales", "ISTJ", "Tokyo"),
        ];
        let criteria = GroupingCriteria { similar_personalities: true, ..GroupingCriteria::default() };
        let table = FitTable::build(&members, &criteria);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get_pair([0, 1]), table.get_pair([1, 0]));
        assert_eq!(table.get_pair([0, 1]), 0.95);
        assert_eq!(table.mean_against(0, &[]), NEUTRAL);
        assert!((table.mean_against(0, &[1, 2]) - (0.95 + 0.45) / 2.0).abs() < 1e-12);
    }
}
