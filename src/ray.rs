use crate::map::Grid;
use glam::{IVec2, Vec2};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const THREE_FRAC_PI_2: f32 = 3. * FRAC_PI_2;

/// Which face of a wall cell a ray struck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

/// Result of casting one ray.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HitRecord {
    /// world point where the ray meets the wall
    pub hit: Vec2,
    /// euclidean distance from the origin, infinite if nothing was struck
    pub distance: f32,
    /// true if the struck surface lies on a vertical grid line
    pub is_vertical: bool,
    /// normalized angle the ray was cast at
    pub angle: f32,
}

impl HitRecord {
    /// A ray that left the world without striking anything.
    pub const MISS: Self = Self {
        hit: Vec2::INFINITY,
        distance: f32::INFINITY,
        is_vertical: false,
        angle: 0.,
    };

    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }

    /// The face of the wall cell that was struck.
    pub fn face(&self) -> Cardinal {
        let facing = Facing::of(self.angle);
        match (self.is_vertical, facing.left, facing.up) {
            (true, true, _) => Cardinal::East,
            (true, false, _) => Cardinal::West,
            (false, _, true) => Cardinal::South,
            (false, _, false) => Cardinal::North,
        }
    }
}

/// Map any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let angle = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly TAU
    if angle >= TAU {
        0.
    } else {
        angle
    }
}

/// Direction classes of a normalized angle. Exactly horizontal rays are
/// neither up nor down, exactly vertical rays neither left nor right.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Facing {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Facing {
    fn of(angle: f32) -> Self {
        Self {
            up: angle > PI,
            down: angle > 0. && angle < PI,
            left: angle > FRAC_PI_2 && angle < THREE_FRAC_PI_2,
            right: angle < FRAC_PI_2 || angle > THREE_FRAC_PI_2,
        }
    }

    fn horizontal(self) -> bool {
        !self.up && !self.down
    }

    fn vertical(self) -> bool {
        !self.left && !self.right
    }
}

/// Find the nearest wall along a ray by stepping from one grid line crossing
/// to the next, separately for horizontal and vertical grid lines, and keeping
/// the nearer hit. Equal distances resolve to the horizontal hit.
pub fn cast_ray(grid: &Grid, origin: Vec2, angle: f32) -> HitRecord {
    let angle = normalize_angle(angle);
    let facing = Facing::of(angle);
    let tan = angle.tan();

    let horizontal = horizontal_hit(grid, origin, tan, facing);
    let vertical = vertical_hit(grid, origin, tan, facing);

    let distance_to = |hit: Option<Vec2>| hit.map_or(f32::INFINITY, |hit| hit.distance(origin));
    let horizontal_distance = distance_to(horizontal);
    let vertical_distance = distance_to(vertical);

    let record = match (horizontal, vertical) {
        (_, Some(hit)) if vertical_distance < horizontal_distance => HitRecord {
            hit,
            distance: vertical_distance,
            is_vertical: true,
            angle,
        },
        (Some(hit), _) => HitRecord {
            hit,
            distance: horizontal_distance,
            is_vertical: false,
            angle,
        },
        _ => {
            log::warn!("ray from {origin} at {angle} left the world without a hit");
            HitRecord {
                angle,
                ..HitRecord::MISS
            }
        }
    };

    log::trace!(
        "ray {angle:.4}: horizontal {horizontal_distance}, vertical {vertical_distance}"
    );
    record
}

/// March along the crossings with `y = k * tile`.
fn horizontal_hit(grid: &Grid, origin: Vec2, tan: f32, facing: Facing) -> Option<Vec2> {
    // parallel to the horizontal grid lines, never crosses one
    if facing.horizontal() {
        return None;
    }

    let tile = grid.tile_size();
    let (mut line, dir) = first_line(origin.y, tile, facing.down);

    loop {
        let y = line as f32 * tile;
        // an exactly vertical ray has no horizontal run, leave x alone
        let x = if facing.vertical() {
            origin.x
        } else {
            origin.x + (y - origin.y) / tan
        };
        let crossing = Vec2::new(x, y);
        if !grid.contains(crossing) {
            return None;
        }

        // the cell beyond the line, in the direction of travel
        let row = if facing.down { line } else { line - 1 };
        let cell = IVec2::new((x / tile).floor() as i32, row);
        if grid.is_wall_cell(cell) {
            return Some(crossing);
        }
        line += dir;
    }
}

/// March along the crossings with `x = k * tile`.
fn vertical_hit(grid: &Grid, origin: Vec2, tan: f32, facing: Facing) -> Option<Vec2> {
    if facing.vertical() {
        return None;
    }

    let tile = grid.tile_size();
    let (mut line, dir) = first_line(origin.x, tile, facing.right);

    loop {
        let x = line as f32 * tile;
        let y = if facing.horizontal() {
            origin.y
        } else {
            origin.y + (x - origin.x) * tan
        };
        let crossing = Vec2::new(x, y);
        if !grid.contains(crossing) {
            return None;
        }

        let col = if facing.right { line } else { line - 1 };
        let cell = IVec2::new(col, (y / tile).floor() as i32);
        if grid.is_wall_cell(cell) {
            return Some(crossing);
        }
        line += dir;
    }
}

/// Index of the first grid line met along one axis and the direction lines
/// are walked in. Crossings are always rebuilt from the line index, never
/// accumulated, so they land exactly on `k * tile` and the loop ends once a
/// crossing leaves the world.
fn first_line(coord: f32, tile: f32, forward: bool) -> (i32, i32) {
    let line = (coord / tile).floor() as i32;
    if forward {
        (line + 1, 1)
    } else {
        (line, -1)
    }
}
