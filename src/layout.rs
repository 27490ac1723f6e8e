//! Deterministic positions for imported entities. Imports have no
//! layout information of their own, so nodes are placed evenly on a
//! circle sized to the entity count.

use crate::model::Point;

const CENTER_X: f32 = 400.0;
const CENTER_Y: f32 = 300.0;
const MIN_RADIUS: f32 = 100.0;
const RADIUS_PER_ENTITY: f32 = 25.0;

/// Position for entity `index` out of `count` imported entities.
pub fn circle_position(index: usize, count: usize) -> Point {
    if count == 0 {
        return Point::new(CENTER_X, CENTER_Y);
    }

    let radius = MIN_RADIUS.max(count as f32 * RADIUS_PER_ENTITY);
    let angle = std::f32::consts::TAU * index as f32 / count as f32;

    Point::new(
        CENTER_X + radius * angle.cos(),
        CENTER_Y + radius * angle.sin(),
    )
}
