use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::affinity::Dimension;
use crate::error::{AffinityError, Result};
use crate::layout::Canvas;
use crate::model::condition::Score;

pub const WEIGHT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub embedding: f64,
    pub tags: f64,
    pub personality: f64,
    pub job_level: f64,
    pub organization: f64,
    pub location: f64,
    pub preference: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            embedding: 0.30,
            tags: 0.15,
            personality: 0.15,
            job_level: 0.10,
            organization: 0.10,
            location: 0.10,
            preference: 0.10,
        }
    }
}

impl SubScoreWeights {
    pub fn get(&self, dimension: Dimension) -> f64 {
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

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dimension) = Dimension::ALL
            .iter()
            .find(|d| !self.get(**d).is_finite() || self.get(**d) < 0.0)
        {
            return Err(AffinityError::InvalidWeights {
                reason: format!("{} weight must be a non-negative number", dimension.name()),
            });
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AffinityError::InvalidWeights {
                reason: format!("weights sum to {sum}, expected 1.0"),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SubScoreWeights,
    /// Recommendation favours colleagues from other units.
    pub prefer_cross_unit: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SubScoreWeights::default(),
            prefer_cross_unit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub min_similarity: Score,
    pub max_members_per_cluster: usize,
    pub canvas: Canvas,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.3,
            max_members_per_cluster: 12,
            canvas: Canvas::default(),
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(AffinityError::InvalidConfig("graph.min_similarity must be within [0, 1]".into()));
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(AffinityError::InvalidConfig("graph.canvas must have a positive size".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub iterations: usize,
    pub repulsion: f64,
    pub spring_constant: f64,
    pub gravity: f64,
    /// Largest displacement per iteration at full temperature.
    pub max_step: f64,
    pub margin: f64,
    pub epsilon: f64,
    pub time_budget_ms: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 120,
            repulsion: 8000.0,
            spring_constant: 200.0,
            gravity: 0.01,
            max_step: 40.0,
            margin: 40.0,
            epsilon: 0.01,
            time_budget_ms: None,
        }
    }
}

impl LayoutConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        let constants = [
            ("repulsion", self.repulsion),
            ("spring_constant", self.spring_constant),
            ("gravity", self.gravity),
            ("max_step", self.max_step),
            ("margin", self.margin),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(AffinityError::InvalidConfig(format!("layout.{name} must be non-negative")));
            }
        }
        if self.spring_constant == 0.0 {
            return Err(AffinityError::InvalidConfig("layout.spring_constant must be positive".into()));
        }
        if !(self.epsilon > 0.0) {
            return Err(AffinityError::InvalidConfig("layout.epsilon must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Leftover members join the last team, which then exceeds the team size.
    #[default]
    AppendToLast,
    /// Leftover members are returned as a separate ungrouped list.
    Separate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub optimize: bool,
    pub max_swap_iterations: usize,
    pub remainder_policy: RemainderPolicy,
    pub time_budget_ms: Option<u64>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            max_swap_iterations: 100,
            remainder_policy: RemainderPolicy::default(),
            time_budget_ms: None,
        }
    }
}

impl PartitionConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.optimize && self.max_swap_iterations == 0 {
            return Err(AffinityError::InvalidConfig("partition.max_swap_iterations must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub graph: GraphConfig,
    pub layout: LayoutConfig,
    pub partition: PartitionConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<EngineConfig> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weights.validate()?;
        self.graph.validate()?;
        self.layout.validate()?;
        if self.layout.iterations == 0 {
            return Err(AffinityError::InvalidConfig("layout.iterations must be positive".into()));
        }
        self.partition.validate()
    }
}
