//! Grid snapping helpers.

use kurbo::Point;

/// Round a scalar to the nearest multiple of `grid_size`.
pub fn snap_scalar(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Round both coordinates of a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        snap_scalar(point.x, grid_size),
        snap_scalar(point.y, grid_size),
    )
}
