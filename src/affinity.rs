use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, SubScoreWeights};
use crate::error::Result;
use crate::model::condition::{Preferences, Score};
use crate::model::entity::Member;
use crate::subscore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Embedding,
    Tags,
    Personality,
    JobLevel,
    Organization,
    Location,
    Preference,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Embedding,
        Dimension::Tags,
        Dimension::Personality,
        Dimension::JobLevel,
        Dimension::Organization,
        Dimension::Location,
        Dimension::Preference,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Embedding => "embedding",
            Dimension::Tags => "tags",
            Dimension::Personality => "personality",
            Dimension::JobLevel => "job_level",
            Dimension::Organization => "organization",
            Dimension::Location => "location",
            Dimension::Preference => "preference",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub embedding: Score,
    pub tags: Score,
    pub personality: Score,
    pub job_level: Score,
    pub organization: Score,
    pub location: Score,
    pub preference: Score,
}

impl SubScores {
    pub fn get(&self, dimension: Dimension) -> Score {
        match dimension {
            Dimension::Embedding => self.embedding,
            Dimension::Tags => self.tags,
            Dimension::Personality => self.personality,
            Dimension::JobLevel => self.job_level,
            Dimension::Organization => self.organization,
            Dimension::Location => self.location,
            Dimension::Preference => self.preference,
        }
    }

    pub fn weighted_total(&self, weights: &SubScoreWeights) -> Score {
        Dimension::ALL
            .iter()
            .map(|d| self.get(*d) * weights.get(*d))
            .sum::<Score>()
            .clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityScore {
    pub total: Score,
    pub sub_scores: SubScores,
}

#[derive(Debug, Clone)]
pub struct AffinityScorer {
    config: ScoringConfig,
}

impl Default for AffinityScorer {
    fn default() -> Self {
        Self { config: ScoringConfig::default() }
    }
}

impl AffinityScorer {
    pub fn new(config: ScoringConfig) -> Result<AffinityScorer> {
        config.weights.validate()?;
        Ok(AffinityScorer { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn weights(&self) -> &SubScoreWeights {
        &self.config.weights
    }

    pub fn sub_scores(&self, a: &Member, b: &Member, preferences: Option<&Preferences>) -> SubScores {
        let embedding = match subscore::embedding_similarity(
            a.embeddings.profile.as_deref(),
            b.embeddings.profile.as_deref(),
        ) {
            Some(score) => score,
            None => {
                tracing::trace!(a = a.id, b = b.id, "missing or unusable profile embedding, scoring 0");
                0.0
            }
        };

        SubScores {
            embedding,
            tags: subscore::tag_overlap(&a.tags, &b.tags),
            personality: subscore::personality_compatibility(a.personality.as_deref(), b.personality.as_deref()),
            job_level: subscore::job_level_relationship(a.job_level.as_deref(), b.job_level.as_deref()),
            organization: subscore::org_proximity(
                a.department.as_deref(),
                b.department.as_deref(),
                self.config.prefer_cross_unit,
            ),
            location: subscore::location_proximity(a.location.as_deref(), b.location.as_deref()),
            preference: subscore::preference_match(preferences, b),
        }
    }

    pub fn score(&self, a: &Member, b: &Member, preferences: Option<&Preferences>) -> AffinityScore {
        let sub_scores = self.sub_scores(a, b, preferences);
        AffinityScore {
            total: sub_scores.weighted_total(&self.config.weights),
            sub_scores,
        }
    }
}

/// Scores one pair. `weights` defaults to `SubScoreWeights::default()`; a
/// weight set that does not sum to 1.0 is rejected.
pub fn score_affinity(
    a: &Member,
    b: &Member,
    preferences: Option<&Preferences>,
    weights: Option<&SubScoreWeights>,
) -> Result<AffinityScore> {
    let config = ScoringConfig {
        weights: weights.copied().unwrap_or_default(),
        ..ScoringConfig::default()
    };
    let scorer = AffinityScorer::new(config)?;
    Ok(scorer.score(a, b, preferences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AffinityError;

    fn alice() -> Member {
        Member::new(1, "Alice")
            .with_department("Engineering/Platform/SRE")
            .with_job_level("Senior")
            .with_location("Tokyo")
            .with_personality("INTJ")
            .with_tags(["rust", "kubernetes", "observability"])
            .with_profile_embedding(vec![0.9, 0.1, 0.0])
    }

    fn bob() -> Member {
        Member::new(2, "Bob")
            .with_department("Product/Growth")
            .with_job_level("Staff")
            .with_location("Chiba")
            .with_personality("ENFP")
            .with_tags(["rust", "experimentation"])
            .with_profile_embedding(vec![0.8, 0.3, 0.1])
    }

    #[test]
    fn sub_scores_match_dimension_rules() {
        let score = AffinityScorer::default().score(&alice(), &bob(), None);
        let s = score.sub_scores;
        assert_eq!(s.personality, 0.95);
        assert_eq!(s.job_level, 1.0);
        assert_eq!(s.organization, 1.0);
        assert_eq!(s.location, 0.7);
        assert!((s.tags - 0.25).abs() < 1e-12);
        assert_eq!(s.preference, 0.5);
        assert!(s.embedding > 0.9 && s.embedding <= 1.0);
        assert!((0.0..=1.0).contains(&score.total));
    }

    #[test]
    fn total_is_weighted_sum() {
        let scorer = AffinityScorer::default();
        let score = scorer.score(&alice(), &bob(), None);
        let expected: f64 = Dimension::ALL
            .iter()
            .map(|d| score.sub_scores.get(*d) * scorer.weights().get(*d))
            .sum();
        assert!((score.total - expected).abs() < 1e-12);
    }

    #[test]
    fn missing_embedding_scores_zero() {
        let mut b = bob();
        b.embeddings.profile = None;
        let score = score_affinity(&alice(), &b, None, None).unwrap();
        assert_eq!(score.sub_scores.embedding, 0.0);
    }

    #[test]
    fn identical_attributes_hit_identical_constants() {
        let a = Member::new(1, "a").with_department("Sales/Enterprise/East");
        let b = Member::new(2, "b").with_department("Sales/Enterprise/East");
        let scorer = AffinityScorer::new(ScoringConfig { prefer_cross_unit: false, ..ScoringConfig::default() }).unwrap();
        assert_eq!(scorer.score(&a, &b, None).sub_scores.organization, 0.6);
    }

    #[test]
    fn weight_sum_tolerance() {
        let near = SubScoreWeights { embedding: 0.299999, ..SubScoreWeights::default() };
        assert!(score_affinity(&alice(), &bob(), None, Some(&near)).is_ok());

        let short = SubScoreWeights { embedding: 0.2, ..SubScoreWeights::default() };
        let result = score_affinity(&alice(), &bob(), None, Some(&short));
        assert!(matches!(result, Err(AffinityError::InvalidWeights { .. })));
    }
}
