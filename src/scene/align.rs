//! Alignment and distribution of a member set.
//!
//! Both work on unrotated bounds and only produce target positions; the
//! graph applies them.

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use super::ElementId;
use crate::error::SceneError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    /// Centered on the horizontal midpoint of the set.
    CenterH,
    Right,
    Top,
    /// Centered on the vertical midpoint of the set.
    Middle,
    Bottom,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::CenterH => "center",
            Alignment::Right => "right",
            Alignment::Top => "top",
            Alignment::Middle => "middle",
            Alignment::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

pub const MIN_ALIGN_MEMBERS: usize = 2;
pub const MIN_DISTRIBUTE_MEMBERS: usize = 3;

/// New top-left positions that line every member up on the reference line.
pub fn align_positions(
    members: &[(ElementId, Rect)],
    alignment: Alignment,
) -> Result<Vec<(ElementId, Pos2)>, SceneError> {
    if members.len() < MIN_ALIGN_MEMBERS {
        return Err(SceneError::NotEnoughElements {
            needed: MIN_ALIGN_MEMBERS,
            got: members.len(),
        });
    }
    let left = members.iter().map(|(_, r)| r.min.x).fold(f32::INFINITY, f32::min);
    let right = members.iter().map(|(_, r)| r.max.x).fold(f32::NEG_INFINITY, f32::max);
    let top = members.iter().map(|(_, r)| r.min.y).fold(f32::INFINITY, f32::min);
    let bottom = members.iter().map(|(_, r)| r.max.y).fold(f32::NEG_INFINITY, f32::max);

    Ok(members
        .iter()
        .map(|(id, r)| {
            let pos = match alignment {
                Alignment::Left => Pos2::new(left, r.min.y),
                Alignment::Right => Pos2::new(right - r.width(), r.min.y),
                Alignment::CenterH => Pos2::new((left + right) / 2.0 - r.width() / 2.0, r.min.y),
                Alignment::Top => Pos2::new(r.min.x, top),
                Alignment::Bottom => Pos2::new(r.min.x, bottom - r.height()),
                Alignment::Middle => Pos2::new(r.min.x, (top + bottom) / 2.0 - r.height() / 2.0),
            };
            (*id, pos)
        })
        .collect())
}

/// Evenly space the leading edges of the interior members between the first
/// and last member along `axis`. The outer two keep their positions and are
/// not part of the result.
pub fn distribute_positions(
    members: &[(ElementId, Rect)],
    axis: DistributeAxis,
) -> Result<Vec<(ElementId, Pos2)>, SceneError> {
    if members.len() < MIN_DISTRIBUTE_MEMBERS {
        return Err(SceneError::NotEnoughElements {
            needed: MIN_DISTRIBUTE_MEMBERS,
            got: members.len(),
        });
    }
    let key = |r: &Rect| match axis {
        DistributeAxis::Horizontal => r.min.x,
        DistributeAxis::Vertical => r.min.y,
    };
    let mut sorted: Vec<&(ElementId, Rect)> = members.iter().collect();
    sorted.sort_by(|a, b| key(&a.1).total_cmp(&key(&b.1)));

    let last = sorted.len() - 1;
    let start = key(&sorted[0].1);
    let end = key(&sorted[last].1);
    let gap = (end - start) / last as f32;

    Ok(sorted[1..last]
        .iter()
        .enumerate()
        .map(|(i, (id, r))| {
            let at = start + gap * (i + 1) as f32;
            let pos = match axis {
                DistributeAxis::Horizontal => Pos2::new(at, r.min.y),
                DistributeAxis::Vertical => Pos2::new(r.min.x, at),
            };
            (*id, pos)
        })
        .collect())
}
