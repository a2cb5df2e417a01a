use std::collections::HashMap;
use std::time::Instant;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::{GraphEdge, GraphNode};
use crate::model::entity::Id;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas { width: 1200.0, height: 800.0 }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Canvas {
        Canvas { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    fn clamp(&self, value: f64, extent: f64, margin: f64) -> f64 {
        if margin * 2.0 >= extent {
            extent / 2.0
        } else {
            value.clamp(margin, extent - margin)
        }
    }

    fn clamp_point(&self, point: Point, margin: f64) -> Point {
        Point::new(self.clamp(point.x, self.width, margin), self.clamp(point.y, self.height, margin))
    }
}

/// Simulation-only node state; velocity never leaves this module.
struct LayoutNode {
    id: Id,
    position: Point,
    vx: f64,
    vy: f64,
}

struct Spring {
    source: usize,
    target: usize,
    weight: f64,
}

pub struct ForceLayout {
    config: LayoutConfig,
}

impl Default for ForceLayout {
    fn default() -> Self {
        ForceLayout { config: LayoutConfig::default() }
    }
}

impl ForceLayout {
    pub fn new(config: LayoutConfig) -> Result<ForceLayout> {
        config.validate()?;
        Ok(ForceLayout { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn run(&self, nodes: &[GraphNode], edges: &[GraphEdge], canvas: &Canvas) -> IndexMap<Id, Point> {
        let _span = tracing::debug_span!("layout", nodes = nodes.len(), edges = edges.len(), iterations = self.config.iterations).entered();

        let mut state: Vec<LayoutNode> = Vec::with_capacity(nodes.len());
        let mut index: HashMap<Id, usize> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node.id) {
                continue;
            }
            index.insert(node.id, state.len());
            state.push(LayoutNode {
                id: node.id,
                position: canvas.clamp_point(node.position, self.config.margin),
                vx: 0.0,
                vy: 0.0,
            });
        }

        let springs: Vec<Spring> = edges
            .iter()
            .filter_map(|edge| {
                let source = *index.get(&edge.source)?;
                let target = *index.get(&edge.target)?;
                (source != target).then_some(Spring { source, target, weight: edge.similarity })
            })
            .collect();

        let started = Instant::now();
        let iterations = self.config.iterations;
        for step in 0..iterations {
            if let Some(budget) = self.config.time_budget() {
                if started.elapsed() >= budget {
                    tracing::warn!(step, iterations, "layout time budget exhausted");
                    break;
                }
            }
            self.step(&mut state, &springs, canvas, temperature(step, iterations));
        }

        state.into_iter().map(|node| (node.id, node.position)).collect()
    }

    fn step(&self, state: &mut [LayoutNode], springs: &[Spring], canvas: &Canvas, temperature: f64) {
        let config = &self.config;
        for node in state.iter_mut() {
            node.vx = 0.0;
            node.vy = 0.0;
        }

        let n = state.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = state[i].position.x - state[j].position.x;
                let dy = state[i].position.y - state[j].position.y;
                let distance = (dx * dx + dy * dy).sqrt();
                let (ux, uy) = if distance > 0.0 {
                    (dx / distance, dy / distance)
                } else {
                    let angle = GOLDEN_ANGLE * (i * n + j) as f64;
                    (angle.cos(), angle.sin())
                };
                let d = distance + config.epsilon;
                let force = config.repulsion / (d * d);
                state[i].vx += ux * force;
                state[i].vy += uy * force;
                state[j].vx -= ux * force;
                state[j].vy -= uy * force;
            }
        }

        for spring in springs {
            let (s, t) = (spring.source, spring.target);
            let dx = state[s].position.x - state[t].position.x;
            let dy = state[s].position.y - state[t].position.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance == 0.0 {
                continue;
            }
            let force = distance * distance / config.spring_constant * spring.weight;
            let (fx, fy) = (dx / distance * force, dy / distance * force);
            state[s].vx -= fx;
            state[s].vy -= fy;
            state[t].vx += fx;
            state[t].vy += fy;
        }

        let center = canvas.center();
        let limit = config.max_step * temperature;
        for node in state.iter_mut() {
            node.vx += (center.x - node.position.x) * config.gravity;
            node.vy += (center.y - node.position.y) * config.gravity;

            let speed = (node.vx * node.vx + node.vy * node.vy).sqrt();
            if speed > limit && speed > 0.0 {
                let scale = limit / speed;
                node.vx *= scale;
                node.vy *= scale;
            }
            let moved = Point::new(node.position.x + node.vx, node.position.y + node.vy);
            node.position = canvas.clamp_point(moved, config.margin);
        }
    }
}

/// Linear cooling from 1.0 at the first step to 0.0 at the last.
fn temperature(step: usize, iterations: usize) -> f64 {
    1.0 - step as f64 / iterations.saturating_sub(1).max(1) as f64
}

/// Lays out `nodes` with the default physical constants and the given iteration count.
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], canvas: &Canvas, iterations: usize) -> IndexMap<Id, Point> {
    let config = LayoutConfig { iterations, ..LayoutConfig::default() };
    ForceLayout { config }.run(nodes, edges, canvas)
}
