//! Colleague affinity engine: pairwise affinity scoring, an affinity graph
//! with clusters and a force-directed layout, and team partitioning.

pub mod action;
pub mod affinity;
pub mod cache;
pub mod config;
pub mod error;
pub mod explain;
pub mod fit;
pub mod graph;
pub mod layout;
pub mod model;
pub mod partition;
pub mod search;
pub mod seed;
pub mod subscore;
pub mod tables;

pub use affinity::{score_affinity, AffinityScore, AffinityScorer, Dimension, SubScores};
pub use config::{
    EngineConfig, GraphConfig, LayoutConfig, PartitionConfig, RemainderPolicy, ScoringConfig, SubScoreWeights,
};
pub use error::{AffinityError, Result};
pub use explain::{explain, Explanation};
pub use graph::{build_graph, ColleagueGraph, GraphBuilder, GraphEdge, GraphNode};
pub use layout::{layout, Canvas, ForceLayout, Point};
pub use model::condition::{GroupingCriteria, Preferences, Score};
pub use model::entity::{Embeddings, Id, Member};
pub use model::group::{Partition, Team};
pub use partition::{partition_teams, partition_teams_with_rng, TeamPartitioner};

/// Logs that the engine is ready; call once after installing a subscriber.
pub fn init() {
    tracing::info!("Colleague affinity engine initialized");
}
