//! # Game Mathematics
//!
//! Grid line tracing and distance helpers.

use crate::game::Position;

/// Cells on the Bresenham line from `from` to `to`, both ends included.
///
/// # Examples
///
/// ```
/// use shamble::{line_between, Position};
///
/// let line = line_between(Position::new(0, 0), Position::new(3, 0));
/// assert_eq!(line.len(), 4);
/// assert_eq!(line[3], Position::new(3, 0));
/// ```
pub fn line_between(from: Position, to: Position) -> Vec<Position> {
    let mut cells = Vec::new();
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };
    let mut error = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        cells.push(Position::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }

    cells
}

/// The cells after `through` on the ray cast from `origin` through `through`.
///
/// Returns at most `count` cells, starting with the one right after `through`.
/// An origin equal to `through` has no direction and yields nothing.
pub fn ray_beyond(origin: Position, through: Position, count: u32) -> Vec<Position> {
    if origin == through || count == 0 {
        return Vec::new();
    }

    let delta = through - origin;
    let span = delta.x.abs().max(delta.y.abs());
    // Scale the direction far enough that the traced line covers `count` extra cells.
    let factor = (span + count as i32 + span - 1) / span;
    let far = origin + Position::new(delta.x * factor, delta.y * factor);

    let line = line_between(origin, far);
    let start = line.iter().position(|&cell| cell == through);
    match start {
        Some(index) => line
            .into_iter()
            .skip(index + 1)
            .take(count as usize)
            .collect(),
        None => Vec::new(),
    }
}

/// Squared Euclidean distance, handy for radius checks without floats.
pub fn distance_squared(a: Position, b: Position) -> i32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// True when `b` lies within `radius` of `a` (Euclidean).
pub fn within_radius(a: Position, b: Position, radius: u32) -> bool {
    let radius = radius as i32;
    distance_squared(a, b) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_contiguous() {
        let line = line_between(Position::new(1, 1), Position::new(6, 3));
        assert_eq!(line.first(), Some(&Position::new(1, 1)));
        assert_eq!(line.last(), Some(&Position::new(6, 3)));
        for pair in line.windows(2) {
            let step = pair[1] - pair[0];
            assert!(step.x.abs() <= 1 && step.y.abs() <= 1);
        }
    }

    #[test]
    fn test_line_single_cell() {
        let line = line_between(Position::new(4, 4), Position::new(4, 4));
        assert_eq!(line, vec![Position::new(4, 4)]);
    }

    #[test]
    fn test_ray_beyond_straight() {
        let ray = ray_beyond(Position::new(5, 5), Position::new(6, 5), 3);
        assert_eq!(
            ray,
            vec![Position::new(7, 5), Position::new(8, 5), Position::new(9, 5)]
        );

        let ray = ray_beyond(Position::new(5, 5), Position::new(5, 3), 2);
        assert_eq!(ray, vec![Position::new(5, 2), Position::new(5, 1)]);
    }

    #[test]
    fn test_ray_beyond_without_direction() {
        assert!(ray_beyond(Position::new(2, 2), Position::new(2, 2), 3).is_empty());
        assert!(ray_beyond(Position::new(1, 2), Position::new(2, 2), 0).is_empty());
    }

    #[test]
    fn test_radius() {
        let center = Position::new(0, 0);
        assert!(within_radius(center, Position::new(1, 1), 2));
        assert!(within_radius(center, Position::new(2, 0), 2));
        assert!(!within_radius(center, Position::new(2, 2), 2));
        assert_eq!(distance_squared(center, Position::new(3, 4)), 25);
    }
}
