use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::affinity::{AffinityScore, Dimension};
use crate::config::SubScoreWeights;
use crate::model::condition::Score;
use crate::model::entity::Member;
use crate::subscore;

pub const MAX_HIGHLIGHTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub dimension: Dimension,
    pub score: Score,
    pub weight: f64,
    pub contribution: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub highlights: Vec<String>,
    pub breakdown: Vec<BreakdownRow>,
}

fn threshold(dimension: Dimension) -> Score {
    match dimension {
        Dimension::Embedding => 0.75,
        Dimension::Tags => 0.3,
        Dimension::Personality => 0.75,
        Dimension::JobLevel => 0.8,
        Dimension::Organization => 0.8,
        Dimension::Location => 0.7,
        Dimension::Preference => 0.75,
    }
}

fn highlight(dimension: Dimension, a: &Member, b: &Member) -> String {
    match dimension {
        Dimension::Embedding => format!("{} has a profile very similar to yours", b.display_name()),
        Dimension::Tags => {
            let common = subscore::common_tags(&a.tags, &b.tags);
            if common.is_empty() {
                "You share several interests".to_string()
            } else {
                format!("You share interests in {}", common.iter().join(", "))
            }
        }
        Dimension::Personality => match (a.personality_type(), b.personality_type()) {
            (Some(x), Some(y)) => format!("{} and {} personalities work well together", x.code(), y.code()),
            _ => "Your personalities look compatible".to_string(),
        },
        Dimension::JobLevel => match (a.job(), b.job()) {
            (Some(x), Some(y)) if subscore::job_level_score(&x, &y) >= 1.0 => {
                format!("A natural mentoring pair ({} and {})", x.label(), y.label())
            }
            _ => "Your roles complement each other".to_string(),
        },
        Dimension::Organization => match b.org_path() {
            Some(path) => format!("{} works in {}, a unit that works closely with yours", b.display_name(), path.top()),
            None => "Your organizations work closely together".to_string(),
        },
        Dimension::Location => match &b.location {
            Some(place) => format!("Based near you ({place})"),
            None => "Based near you".to_string(),
        },
        Dimension::Preference => format!("{} matches what you are looking for", b.display_name()),
    }
}

/// Picks the strongest dimensions that clear their thresholds (at most three,
/// at least one) and lays out the full weighted breakdown.
pub fn explain(score: &AffinityScore, weights: &SubScoreWeights, a: &Member, b: &Member) -> Explanation {
    let mut picked: Vec<Dimension> = Dimension::ALL
        .iter()
        .copied()
        .filter(|d| score.sub_scores.get(*d) >= threshold(*d))
        .sorted_by(|x, y| score.sub_scores.get(*y).total_cmp(&score.sub_scores.get(*x)))
        .take(MAX_HIGHLIGHTS)
        .collect();

    if picked.is_empty() {
        if let Some(best) = Dimension::ALL
            .iter()
            .copied()
            .max_by(|x, y| score.sub_scores.get(*x).total_cmp(&score.sub_scores.get(*y)))
        {
            picked.push(best);
        }
    }

    let breakdown = Dimension::ALL
        .iter()
        .map(|d| {
            let value = score.sub_scores.get(*d);
            let weight = weights.get(*d);
            BreakdownRow { dimension: *d, score: value, weight, contribution: value * weight }
        })
        .collect();

    Explanation {
        highlights: picked.into_iter().map(|d| highlight(d, a, b)).collect(),
        breakdown,
    }
}
