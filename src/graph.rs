use std::collections::HashSet;
use std::f64::consts::PI;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::affinity::AffinityScorer;
use crate::config::GraphConfig;
use crate::error::Result;
use crate::layout::{Canvas, Point};
use crate::model::condition::{Preferences, Score};
use crate::model::entity::{Id, Member};
use crate::subscore;
use crate::tables;

pub const OTHER_PAIR_FACTOR: f64 = 1.5;
pub const PERSONALITY_COMPATIBLE: Score = 0.75;
pub const UNASSIGNED_LABEL: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    Weak,
    Moderate,
    Strong,
}

impl StrengthTier {
    pub fn from_similarity(similarity: Score) -> StrengthTier {
        if similarity >= 0.6 {
            StrengthTier::Strong
        } else if similarity >= 0.4 {
            StrengthTier::Moderate
        } else {
            StrengthTier::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    SameUnit,
    CrossUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub index: usize,
    pub label: String,
    pub members: Vec<Id>,
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: Id,
    pub name: String,
    pub cluster: usize,
    pub is_self: bool,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: Id,
    pub target: Id,
    pub similarity: Score,
    pub common_tags: Vec<String>,
    pub kind: EdgeKind,
    pub strength: StrengthTier,
    pub personality_compatible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub cluster_count: usize,
    pub self_edges: usize,
    pub strong_edges: usize,
    pub moderate_edges: usize,
    pub weak_edges: usize,
    pub same_unit_edges: usize,
    pub cross_unit_edges: usize,
    pub synergy_edges: usize,
    pub mean_similarity: Score,
    pub truncated_members: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColleagueGraph {
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}

struct Bucket<'a> {
    label: String,
    unit: Option<String>,
    members: Vec<&'a Member>,
}

pub struct GraphBuilder {
    scorer: AffinityScorer,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(scorer: AffinityScorer, config: GraphConfig) -> Result<GraphBuilder> {
        config.validate()?;
        Ok(GraphBuilder { scorer, config })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn build(&self, me: &Member, others: &[Member], preferences: Option<&Preferences>) -> ColleagueGraph {
        let _span = tracing::debug_span!("build_graph", me = me.id, others = others.len()).entered();

        let (buckets, truncated) = self.group(me, others);
        let clusters = place_clusters(&buckets, &self.config.canvas);
        let nodes = seed_nodes(me, &buckets, &clusters);

        let mut edges = Vec::new();
        let mut synergy_edges = 0;
        let kept: Vec<(usize, &Member)> = buckets
            .iter()
            .enumerate()
            .flat_map(|(index, bucket)| bucket.members.iter().map(move |m| (index, *m)))
            .filter(|(_, m)| m.id != me.id)
            .collect();
        let my_cluster = buckets.iter().position(|b| b.members.iter().any(|m| m.id == me.id)).unwrap_or(0);

        let threshold = self.config.min_similarity;
        for (cluster, other) in kept.iter() {
            let score = self.scorer.score(me, other, preferences);
            if score.total >= threshold {
                edges.push(self.edge(me, other, score.total, score.sub_scores.personality, my_cluster == *cluster));
            }
        }

        for ((cluster_a, a), (cluster_b, b)) in kept.iter().tuple_combinations() {
            let score = self.scorer.score(a, b, None);
            let same_unit = cluster_a == cluster_b;
            let synergy = !same_unit
                && match (&buckets[*cluster_a].unit, &buckets[*cluster_b].unit) {
                    (Some(x), Some(y)) => tables::has_unit_synergy(x, y),
                    _ => false,
                };
            if score.total >= threshold * OTHER_PAIR_FACTOR || synergy {
                if synergy && score.total < threshold * OTHER_PAIR_FACTOR {
                    synergy_edges += 1;
                }
                edges.push(self.edge(a, b, score.total, score.sub_scores.personality, same_unit));
            }
        }

        let stats = summarize(&nodes, &edges, clusters.len(), me.id, synergy_edges, truncated);
        tracing::debug!(nodes = stats.node_count, edges = stats.edge_count, clusters = stats.cluster_count, "graph built");
        ColleagueGraph { clusters, nodes, edges, stats }
    }

    fn edge(&self, a: &Member, b: &Member, similarity: Score, personality: Score, same_unit: bool) -> GraphEdge {
        GraphEdge {
            source: a.id,
            target: b.id,
            similarity,
            common_tags: subscore::common_tags(&a.tags, &b.tags),
            kind: if same_unit { EdgeKind::SameUnit } else { EdgeKind::CrossUnit },
            strength: StrengthTier::from_similarity(similarity),
            personality_compatible: personality >= PERSONALITY_COMPATIBLE,
        }
    }

    /// Buckets members by top-level unit in input order (self first) and keeps
    /// at most `max_members_per_cluster` per bucket.
    fn group<'a>(&self, me: &'a Member, others: &'a [Member]) -> (Vec<Bucket<'a>>, usize) {
        let limit = self.config.max_members_per_cluster.max(1);
        let mut seen = HashSet::new();
        let mut buckets: IndexMap<String, Bucket<'a>> = IndexMap::new();
        let mut truncated = 0;

        for member in std::iter::once(me).chain(others.iter()) {
            if !seen.insert(member.id) {
                continue;
            }
            let unit = member.top_unit();
            let label = member
                .org_path()
                .map(|path| path.top().to_string())
                .unwrap_or_else(|| UNASSIGNED_LABEL.to_string());
            let bucket = buckets.entry(unit.clone().unwrap_or_default()).or_insert_with(|| Bucket {
                label,
                unit,
                members: Vec::new(),
            });
            if bucket.members.len() < limit {
                bucket.members.push(member);
            } else {
                truncated += 1;
            }
        }

        if truncated > 0 {
            tracing::debug!(truncated, limit, "cluster size limit dropped members");
        }
        (buckets.into_values().collect(), truncated)
    }
}

fn cluster_radius(member_count: usize, cluster_count: usize, canvas: &Canvas) -> f64 {
    let ring = canvas.min_side() * 0.4;
    let room = if cluster_count > 1 { ring * (PI / cluster_count as f64).sin() } else { ring };
    (20.0 + 15.0 * (member_count as f64).sqrt()).min(room * 0.9)
}

fn place_clusters(buckets: &[Bucket<'_>], canvas: &Canvas) -> Vec<Cluster> {
    let center = canvas.center();
    let ring = canvas.min_side() * 0.4;
    let count = buckets.len();

    buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            let position = if count == 1 {
                center
            } else {
                let angle = 2.0 * PI * index as f64 / count as f64 - PI / 2.0;
                Point::new(center.x + ring * angle.cos(), center.y + ring * angle.sin())
            };
            Cluster {
                index,
                label: bucket.label.clone(),
                members: bucket.members.iter().map(|m| m.id).collect(),
                center: position,
                radius: cluster_radius(bucket.members.len(), count, canvas),
            }
        })
        .collect()
}

fn seed_nodes(me: &Member, buckets: &[Bucket<'_>], clusters: &[Cluster]) -> Vec<GraphNode> {
    let mut nodes = Vec::new();
    for (bucket, cluster) in buckets.iter().zip(clusters.iter()) {
        let ring = cluster.radius * 0.8;
        let others = bucket.members.iter().filter(|m| m.id != me.id).count().max(1);
        let mut slot = 0;
        for member in bucket.members.iter() {
            let is_self = member.id == me.id;
            let position = if is_self {
                cluster.center
            } else {
                let angle = 2.0 * PI * slot as f64 / others as f64;
                slot += 1;
                Point::new(cluster.center.x + ring * angle.cos(), cluster.center.y + ring * angle.sin())
            };
            nodes.push(GraphNode {
                id: member.id,
                name: member.display_name(),
                cluster: cluster.index,
                is_self,
                position,
            });
        }
    }
    nodes
}

fn summarize(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    cluster_count: usize,
    me: Id,
    synergy_edges: usize,
    truncated_members: usize,
) -> GraphStats {
    let count = |f: &dyn Fn(&GraphEdge) -> bool| edges.iter().filter(|&e| f(e)).count();
    let mean_similarity = if edges.is_empty() {
        0.0
    } else {
        edges.iter().map(|e| e.similarity).sum::<Score>() / edges.len() as Score
    };
    GraphStats {
        node_count: nodes.len(),
        edge_count: edges.len(),
        cluster_count,
        self_edges: count(&|e| e.source == me || e.target == me),
        strong_edges: count(&|e| e.strength == StrengthTier::Strong),
        moderate_edges: count(&|e| e.strength == StrengthTier::Moderate),
        weak_edges: count(&|e| e.strength == StrengthTier::Weak),
        same_unit_edges: count(&|e| e.kind == EdgeKind::SameUnit),
        cross_unit_edges: count(&|e| e.kind == EdgeKind::CrossUnit),
        synergy_edges,
        mean_similarity,
        truncated_members,
    }
}

pub fn build_graph(
    me: &Member,
    others: &[Member],
    min_similarity: Score,
    max_members_per_cluster: usize,
    canvas: Canvas,
) -> Result<ColleagueGraph> {
    let config = GraphConfig { min_similarity, max_members_per_cluster, canvas };
    Ok(GraphBuilder::new(AffinityScorer::default(), config)?.build(me, others, None))
}
