//! Static obstacle layouts
//!
//! A layout is built once and shared read-only (behind an `Arc`) by every
//! episode of every simulation that uses it.

use serde::{Deserialize, Serialize};

use super::state::Obstacle;
use crate::consts::*;

/// Thickness of the walls framing the world
pub const BORDER_THICKNESS: f64 = 2.0;

/// An immutable set of obstacles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub obstacles: Vec<Obstacle>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::track()
    }
}

impl Layout {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// No obstacles at all (the world bounds still apply)
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The four walls framing the world
    pub fn border() -> Self {
        let t = BORDER_THICKNESS;
        Self::new(vec![
            Obstacle::new(0.0, 0.0, WORLD_WIDTH, t),
            Obstacle::new(0.0, 0.0, t, WORLD_HEIGHT),
            Obstacle::new(0.0, WORLD_HEIGHT - t, WORLD_WIDTH, t),
            Obstacle::new(WORLD_WIDTH - t, 0.0, t, WORLD_HEIGHT),
        ])
    }

    /// Border plus the given interior walls
    pub fn bordered(interior: impl IntoIterator<Item = Obstacle>) -> Self {
        let mut layout = Self::border();
        layout.obstacles.extend(interior);
        layout
    }

    /// The default driving track: a border and a maze of corridors
    pub fn track() -> Self {
        #[rustfmt::skip]
        let interior = [
            // Lower horizontal row
            (0.0, 320.0, 60.0, 10.0), (120.0, 320.0, 80.0, 10.0), (260.0, 320.0, 140.0, 10.0),
            // Upper horizontal rows
            (0.0, 200.0, 60.0, 10.0), (120.0, 200.0, 80.0, 10.0), (260.0, 200.0, 140.0, 10.0),
            (0.0, 140.0, 200.0, 10.0), (260.0, 140.0, 60.0, 10.0), (370.0, 140.0, 30.0, 10.0),
            // Top horizontal row
            (50.0, 80.0, 100.0, 10.0), (150.0, 50.0, 40.0, 10.0), (260.0, 80.0, 60.0, 10.0),
            (370.0, 80.0, 30.0, 10.0),
            // Verticals between the lower rows
            (50.0, 200.0, 10.0, 120.0), (120.0, 200.0, 10.0, 120.0), (190.0, 200.0, 10.0, 120.0),
            (260.0, 200.0, 10.0, 120.0),
            // Verticals between the upper rows
            (190.0, 50.0, 10.0, 90.0), (260.0, 80.0, 10.0, 60.0), (310.0, 80.0, 10.0, 60.0),
            (370.0, 80.0, 10.0, 60.0), (140.0, 50.0, 10.0, 30.0), (50.0, 0.0, 10.0, 80.0),
        ];
        Self::bordered(
            interior
                .into_iter()
                .map(|(x, y, w, h)| Obstacle::new(x, y, w, h)),
        )
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
