//! Track geometry and rectangle overlap
//!
//! The road is a band of equal-width lanes centered in the viewport:
//! - lane_width = viewport width * track fraction / lane count
//! - road_x: left edge of the road in screen pixels
//!
//! All rectangles are top-left anchored, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::{LaneAlign, SimConfig};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Open-interval overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Lane layout derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneGeometry {
    pub viewport: Vec2,
    pub lane_count: u32,
    pub lane_width: f32,
    pub road_width: f32,
    pub road_x: f32,
}

impl LaneGeometry {
    pub fn new(width: f32, height: f32, config: &SimConfig) -> Self {
        let lane_count = config.lane_count.max(1);
        let lane_width = width * config.track_width_fraction / lane_count as f32;
        let road_width = lane_width * lane_count as f32;
        Self {
            viewport: Vec2::new(width, height),
            lane_count,
            lane_width,
            road_width,
            road_x: (width - road_width) / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.viewport.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.viewport.y
    }

    /// Left edge of the road
    #[inline]
    pub fn left_edge(&self) -> f32 {
        self.road_x
    }

    /// Right edge of the road
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.road_x + self.road_width
    }

    /// x of an entity of the given width placed in `lane`
    pub fn lane_x(&self, lane: u32, entity_width: f32, align: LaneAlign) -> f32 {
        let lane_left = self.road_x + self.lane_width * lane as f32;
        match align {
            LaneAlign::LeftEdge => lane_left,
            LaneAlign::Center => lane_left + self.lane_width / 2.0 - entity_width / 2.0,
        }
    }

    /// True if the rectangle pokes out of the road sideways or fell off the bottom
    pub fn out_of_bounds(&self, rect: &Rect) -> bool {
        rect.left() < self.left_edge()
            || rect.right() > self.right_edge()
            || rect.top() > self.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_lane_geometry_800() {
        let geo = LaneGeometry::new(800.0, 600.0, &SimConfig::default());
        assert!((geo.lane_width - 80.0).abs() < 1e-4);
        assert!((geo.road_width - 320.0).abs() < 1e-4);
        assert!((geo.road_x - 240.0).abs() < 1e-4);
        assert!((geo.right_edge() - 560.0).abs() < 1e-4);
    }

    #[test]
    fn test_lane_x_alignment() {
        let geo = LaneGeometry::new(800.0, 600.0, &SimConfig::default());
        assert_eq!(geo.lane_x(1, 50.0, LaneAlign::LeftEdge), 320.0);
        assert_eq!(geo.lane_x(1, 50.0, LaneAlign::Center), 335.0);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 50.0, 90.0);
        assert!(!a.overlaps(&rect(50.0, 0.0, 50.0, 90.0)));
        assert!(!a.overlaps(&rect(0.0, 90.0, 50.0, 90.0)));
        assert!(!a.overlaps(&rect(-50.0, -90.0, 50.0, 90.0)));
        assert!(a.overlaps(&rect(49.0, 89.0, 50.0, 90.0)));
    }

    #[test]
    fn test_out_of_bounds() {
        let geo = LaneGeometry::new(800.0, 600.0, &SimConfig::default());
        assert!(!geo.out_of_bounds(&rect(240.0, 100.0, 50.0, 90.0)));
        assert!(geo.out_of_bounds(&rect(239.0, 100.0, 50.0, 90.0)));
        assert!(!geo.out_of_bounds(&rect(510.0, 100.0, 50.0, 90.0)));
        assert!(geo.out_of_bounds(&rect(511.0, 100.0, 50.0, 90.0)));
        assert!(!geo.out_of_bounds(&rect(300.0, 600.0, 50.0, 90.0)));
        assert!(geo.out_of_bounds(&rect(300.0, 601.0, 50.0, 90.0)));
        // Driving off the top is allowed
        assert!(!geo.out_of_bounds(&rect(300.0, -5000.0, 50.0, 90.0)));
    }

    proptest! {
        #[test]
        fn prop_shared_edge_never_overlaps(
            x in -1000i32..1000,
            y in -1000i32..1000,
            w in 1i32..200,
            h in 1i32..200,
            ow in 1i32..200,
            oh in 1i32..200,
            shift in -150i32..150,
        ) {
            let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);
            let a = rect(x, y, w, h);
            // Neighbour flush against each side of `a`, slid along that side
            let right = rect(x + w, y + shift as f32, ow as f32, oh as f32);
            let below = rect(x + shift as f32, y + h, ow as f32, oh as f32);
            let left = rect(x - ow as f32, y + shift as f32, ow as f32, oh as f32);
            let above = rect(x + shift as f32, y - oh as f32, ow as f32, oh as f32);
            for other in [right, below, left, above] {
                prop_assert!(!a.overlaps(&other));
                prop_assert!(!other.overlaps(&a));
            }
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
        ) {
            let a = rect(ax, ay, 50.0, 90.0);
            let b = rect(bx, by, 60.0, 100.0);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
