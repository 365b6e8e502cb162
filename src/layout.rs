//! Slot Layout - Fixed Anchor Tables
//!
//! Anchors are canvas-space center points. Slots within a group never overlap,
//! so draw order does not matter.

use serde::{Deserialize, Serialize};

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotGroupId {
    Large,
    Small,
}

/// A named set of anchors sharing one scale rule.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGroup {
    pub id: SlotGroupId,
    pub anchors: &'static [Point],
    /// Height every copy is fitted to.
    pub reference_dimension: f64,
    /// Maximum width before falling back to a width-bound fit.
    pub max_orthogonal_size: f64,
}

const LARGE_ANCHORS: [Point; 12] = [
    Point::new(306, 330),
    Point::new(487, 330),
    Point::new(897, 330),
    Point::new(1077, 330),
    Point::new(1533, 330),
    Point::new(1716, 330),
    Point::new(307, 789),
    Point::new(487, 789),
    Point::new(895, 789),
    Point::new(1077, 789),
    Point::new(1533, 789),
    Point::new(1713, 789),
];

const SMALL_ANCHORS: [Point; 6] = [
    Point::new(154, 367),
    Point::new(738, 367),
    Point::new(1377, 367),
    Point::new(154, 825),
    Point::new(738, 825),
    Point::new(1377, 825),
];

pub const LARGE_SLOTS: SlotGroup = SlotGroup {
    id: SlotGroupId::Large,
    anchors: &LARGE_ANCHORS,
    reference_dimension: 100.0,
    max_orthogonal_size: 163.0,
};

pub const SMALL_SLOTS: SlotGroup = SlotGroup {
    id: SlotGroupId::Small,
    anchors: &SMALL_ANCHORS,
    reference_dimension: 60.0,
    max_orthogonal_size: 64.0,
};

/// The full mockup template: canvas size plus both slot groups.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupLayout {
    pub canvas_size: [u32; 2],
    pub large: SlotGroup,
    pub small: SlotGroup,
}

impl MockupLayout {
    pub const fn standard() -> Self {
        Self {
            canvas_size: [CANVAS_WIDTH, CANVAS_HEIGHT],
            large: LARGE_SLOTS,
            small: SMALL_SLOTS,
        }
    }

    pub fn groups(&self) -> [&SlotGroup; 2] {
        [&self.large, &self.small]
    }

    pub fn group(&self, id: SlotGroupId) -> &SlotGroup {
        match id {
            SlotGroupId::Large => &self.large,
            SlotGroupId::Small => &self.small,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.large.anchors.len() + self.small.anchors.len()
    }
}

impl Default for MockupLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sizes() {
        let layout = MockupLayout::standard();
        assert_eq!(layout.large.anchors.len(), 12);
        assert_eq!(layout.small.anchors.len(), 6);
        assert_eq!(layout.slot_count(), 18);
    }

    #[test]
    fn test_anchors_inside_canvas() {
        let layout = MockupLayout::standard();
        for group in layout.groups() {
            for p in group.anchors {
                assert!(p.x > 0 && (p.x as u32) < CANVAS_WIDTH);
                assert!(p.y > 0 && (p.y as u32) < CANVAS_HEIGHT);
            }
        }
    }

    #[test]
    fn test_large_slots_do_not_overlap_at_max_size() {
        // Worst case footprint is cap x reference on each axis.
        let g = LARGE_SLOTS;
        for (i, a) in g.anchors.iter().enumerate() {
            for b in &g.anchors[i + 1..] {
                let dx = (a.x - b.x).abs() as f64;
                let dy = (a.y - b.y).abs() as f64;
                assert!(dx >= g.max_orthogonal_size || dy >= g.reference_dimension);
            }
        }
    }

    #[test]
    fn test_layout_serializes() {
        let json = serde_json::to_value(MockupLayout::standard()).unwrap();
        assert_eq!(json["canvasSize"], serde_json::json!([1920, 1080]));
        assert_eq!(json["large"]["referenceDimension"], 100.0);
        assert_eq!(json["small"]["id"], "small");
    }
}
