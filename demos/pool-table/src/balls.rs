//! Rack layout on the table's x/z plane, in meters.

use glam::Vec2;

/// Head spot, where the cue ball starts.
pub const HEAD_SPOT: Vec2 = Vec2::new(-0.635, 0.0);

/// Foot spot, where the rack apex sits.
pub const FOOT_SPOT: Vec2 = Vec2::new(0.635, 0.0);

/// Space left between neighbouring racked balls.
const RACK_CLEARANCE: f32 = 0.0005;

/// Standard 8-ball triangle rack layout.
/// Returns the (x, z) spot of balls 1..=15, indexed by `number - 1`.
/// The apex points toward the cue ball (-x), rows spread toward +x.
///
/// ```text
///  1              <- apex (row 0)
///  9   2          <- row 1
///  3   8  10      <- row 2
/// 11   4   5  12  <- row 3
///  6  13  14   7  15  <- row 4
/// ```
pub fn rack_positions(apex: Vec2, ball_radius: f32) -> [Vec2; 15] {
    let gap = ball_radius * 2.0 + RACK_CLEARANCE;
    let row_offset = gap * 0.866; // sqrt(3)/2 for equilateral triangle

    let mut positions = [Vec2::ZERO; 15];

    // (ball_number, row, offset across the table in ball widths)
    let layout: [(u8, usize, f32); 15] = [
        (1, 0, 0.0),
        (9, 1, -0.5), (2, 1, 0.5),
        (3, 2, -1.0), (8, 2, 0.0), (10, 2, 1.0),
        (11, 3, -1.5), (4, 3, -0.5), (5, 3, 0.5), (12, 3, 1.5),
        (6, 4, -2.0), (13, 4, -1.0), (14, 4, 0.0), (7, 4, 1.0), (15, 4, 2.0),
    ];

    for (number, row, across) in layout {
        let x = apex.x + row as f32 * row_offset;
        let z = apex.y + across * gap;
        positions[(number - 1) as usize] = Vec2::new(x, z);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f32 = 0.05715 / 2.0;

    #[test]
    fn apex_is_ball_one_and_eight_is_centered() {
        let spots = rack_positions(FOOT_SPOT, R);
        assert_eq!(spots[0], FOOT_SPOT);
        assert!((spots[7].y - FOOT_SPOT.y).abs() < 1e-6, "8 ball sits on the center line");
        assert!(spots[7].x > FOOT_SPOT.x);
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let spots = rack_positions(FOOT_SPOT, R);
        for (i, a) in spots.iter().enumerate() {
            for b in &spots[i + 1..] {
                assert!(a.distance(*b) >= 2.0 * R, "balls at {:?} and {:?} overlap", a, b);
            }
        }
    }
}
