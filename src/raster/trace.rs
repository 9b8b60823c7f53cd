//! Alpha-boundary detection and greedy outline chaining.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{PixelBuffer, PixelPoint};

/// Tunables for [`trace_edges`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Pixels with alpha above this are foreground, below it are background.
    pub alpha_threshold: u8,
    /// A chain only extends to points strictly closer than this.
    pub link_radius: f32,
    /// Maximum number of extensions of one chain. A boundary longer than
    /// this splits into several open polylines; the rest of the perimeter
    /// starts a new chain at the next unvisited edge pixel.
    pub max_steps: usize,
    /// Chains with fewer points are dropped as noise.
    pub min_chain_points: usize,
    /// A chain whose ends are strictly closer than this is closed.
    pub close_distance: f32,
    /// Fewer edge pixels than this means there is no boundary at all.
    pub min_edge_pixels: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 10,
            link_radius: 5.0,
            max_steps: 1000,
            min_chain_points: 21,
            close_distance: 10.0,
            min_edge_pixels: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<PixelPoint>,
    pub closed: bool,
}

impl Polyline {
    /// Segments in drawing order, including the closing one when closed.
    pub fn segments(&self) -> impl Iterator<Item = (PixelPoint, PixelPoint)> + '_ {
        let closing = if self.closed && self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Ordered outline polylines derived from one buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeTrace {
    pub polylines: Vec<Polyline>,
    pub edge_pixels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    /// Too few boundary pixels to draw anything meaningful.
    NoBoundary { edge_pixels: usize },
    Traced(EdgeTrace),
}

impl TraceOutcome {
    pub fn trace(&self) -> Option<&EdgeTrace> {
        match self {
            TraceOutcome::Traced(trace) => Some(trace),
            TraceOutcome::NoBoundary { .. } => None,
        }
    }

    pub fn polylines(&self) -> &[Polyline] {
        self.trace().map(|t| t.polylines.as_slice()).unwrap_or(&[])
    }
}

/// Foreground pixels with at least one background 8-neighbour, in row-major order.
/// The outermost rows and columns are never classified.
pub fn find_edge_pixels(buffer: &PixelBuffer, alpha_threshold: u8) -> Vec<PixelPoint> {
    let (w, h) = buffer.dimensions();
    let mut edges = Vec::new();
    if w < 3 || h < 3 {
        return edges;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if buffer.alpha(x, y) <= alpha_threshold {
                continue;
            }
            let touches_background = (-1i32..=1).any(|ny| {
                (-1i32..=1).any(|nx| {
                    (nx, ny) != (0, 0)
                        && buffer.alpha((x as i32 + nx) as u32, (y as i32 + ny) as u32) < alpha_threshold
                })
            });
            if touches_background {
                edges.push(PixelPoint::new(x, y));
            }
        }
    }
    edges
}

/// Bucket grid over the edge pixels so nearest-unvisited lookups only scan
/// the cells around the query point.
struct EdgeIndex<'a> {
    points: &'a [PixelPoint],
    cell: u32,
    buckets: HashMap<(u32, u32), Vec<usize>>,
}

impl<'a> EdgeIndex<'a> {
    fn new(points: &'a [PixelPoint], radius: f32) -> Self {
        let cell = radius.ceil().max(1.0) as u32;
        let mut buckets: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            buckets.entry((p.x / cell, p.y / cell)).or_default().push(i);
        }
        Self {
            points,
            cell,
            buckets,
        }
    }

    /// Closest unvisited point strictly within `radius`. Ties go to the
    /// earliest point in scan order.
    fn nearest_unvisited(&self, from: PixelPoint, radius: f32, visited: &[bool]) -> Option<usize> {
        let cx = from.x / self.cell;
        let cy = from.y / self.cell;
        let mut best: Option<(f32, usize)> = None;
        for by in cy.saturating_sub(1)..=cy + 1 {
            for bx in cx.saturating_sub(1)..=cx + 1 {
                let Some(bucket) = self.buckets.get(&(bx, by)) else {
                    continue;
                };
                for &i in bucket {
                    if visited[i] {
                        continue;
                    }
                    let d = from.distance(self.points[i]);
                    if d >= radius {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((bd, bi)) => d < bd || (d == bd && i < bi),
                    };
                    if better {
                        best = Some((d, i));
                    }
                }
            }
        }
        best.map(|(_, i)| i)
    }
}

/// Run the full tracer against `buffer`.
pub fn trace_edges(buffer: &PixelBuffer, options: &TraceOptions) -> TraceOutcome {
    let edges = find_edge_pixels(buffer, options.alpha_threshold);
    debug!("Found {} edge pixels", edges.len());

    if edges.len() < options.min_edge_pixels {
        info!("No boundary found ({} edge pixels)", edges.len());
        return TraceOutcome::NoBoundary {
            edge_pixels: edges.len(),
        };
    }

    let index = EdgeIndex::new(&edges, options.link_radius);
    let mut visited = vec![false; edges.len()];
    let mut polylines = Vec::new();

    for start in 0..edges.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut chain = vec![edges[start]];
        let mut at = edges[start];

        for _ in 0..options.max_steps {
            let Some(next) = index.nearest_unvisited(at, options.link_radius, &visited) else {
                break;
            };
            visited[next] = true;
            at = edges[next];
            chain.push(at);
        }

        if chain.len() < options.min_chain_points {
            continue;
        }
        let closed = match (chain.first(), chain.last()) {
            (Some(first), Some(last)) => first.distance(*last) < options.close_distance,
            _ => false,
        };
        polylines.push(Polyline {
            points: chain,
            closed,
        });
    }

    info!("Traced {} outline(s)", polylines.len());
    TraceOutcome::Traced(EdgeTrace {
        polylines,
        edge_pixels: edges.len(),
    })
}
