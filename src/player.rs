use crate::map::Grid;
use glam::Vec2;

/// Directional intent along one input axis, as held by the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Intent {
    Negative,
    #[default]
    Idle,
    Positive,
}

impl Intent {
    /// Combine the two keys of an axis, holding both cancels out.
    pub fn from_keys(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => Intent::Negative,
            (false, true) => Intent::Positive,
            _ => Intent::Idle,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Intent::Negative => -1.,
            Intent::Idle => 0.,
            Intent::Positive => 1.,
        }
    }
}

/// How a candidate position is tested against the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Collision {
    /// test only the candidate point, accept or reject the whole step
    #[default]
    Point,
    /// test each axis separately, probing `radius` ahead of the player
    Radius,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pose {
    pub pos: Vec2,
    /// radians, never normalized
    pub heading: f32,
    pub radius: f32,
}

impl Pose {
    pub fn new(pos: Vec2, heading: f32, radius: f32) -> Self {
        Self {
            pos,
            heading,
            radius,
        }
    }

    /// Unit vector pointing along the heading.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Turn, then try to walk along the new heading. The heading change always
    /// applies, the position only if the grid allows it.
    pub fn advance(
        &mut self,
        grid: &Grid,
        turn: Intent,
        walk: Intent,
        turn_rate: f32,
        move_rate: f32,
        collision: Collision,
    ) {
        self.heading += turn.sign() * turn_rate;

        let step = self.direction() * (move_rate * walk.sign());
        if step == Vec2::ZERO {
            return;
        }

        match collision {
            Collision::Point => {
                let candidate = self.pos + step;
                if grid.is_wall(candidate) {
                    log::trace!("step to {candidate} blocked");
                } else {
                    self.pos = candidate;
                }
            }
            Collision::Radius => {
                // test the leading edge of the player on each axis so it
                // slides along walls instead of stopping dead
                let reach = Vec2::new(step.x.signum(), step.y.signum()) * self.radius;

                if step.x != 0.
                    && !grid.is_wall(self.pos + Vec2::new(step.x + reach.x, 0.))
                {
                    self.pos.x += step.x;
                }

                if step.y != 0.
                    && !grid.is_wall(self.pos + Vec2::new(0., step.y + reach.y))
                {
                    self.pos.y += step.y;
                }
            }
        }
    }
}

/// The pose plus everything the input side feeds it each tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Player {
    pub pose: Pose,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub collision: Collision,
    pub turn: Intent,
    pub walk: Intent,
}

impl Player {
    pub fn update(&mut self, grid: &Grid) {
        let before = self.pose.pos;
        self.pose.advance(
            grid,
            self.turn,
            self.walk,
            self.turn_speed,
            self.move_speed,
            self.collision,
        );

        if self.walk != Intent::Idle && self.pose.pos == before {
            log::debug!("player blocked at {before}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    // 5x5 room, open 3x3 interior, tile 10
    fn room() -> Grid {
        Grid::new(
            10.,
            &[
                [1u8, 1, 1, 1, 1],
                [1, 0, 0, 0, 1],
                [1, 0, 0, 0, 1],
                [1, 0, 0, 0, 1],
                [1, 1, 1, 1, 1],
            ],
        )
        .unwrap()
    }

    #[test]
    fn intent_from_keys() {
        assert_eq!(Intent::from_keys(false, false), Intent::Idle);
        assert_eq!(Intent::from_keys(true, true), Intent::Idle);
        assert_eq!(Intent::from_keys(true, false), Intent::Negative);
        assert_eq!(Intent::from_keys(false, true), Intent::Positive);
        assert_eq!(Intent::Negative.sign(), -1.);
    }

    #[test]
    fn walks_forward_and_back() {
        let grid = room();
        let mut pose = Pose::new(Vec2::new(25., 25.), 0., 1.);

        pose.advance(&grid, Intent::Idle, Intent::Positive, 0.1, 2., Collision::Point);
        assert!((pose.pos - Vec2::new(27., 25.)).length() < 1e-5);

        pose.advance(&grid, Intent::Idle, Intent::Negative, 0.1, 2., Collision::Point);
        assert!((pose.pos - Vec2::new(25., 25.)).length() < 1e-5);
        assert_eq!(pose.heading, 0.);
    }

    #[test]
    fn turns_before_stepping() {
        let grid = room();
        let mut pose = Pose::new(Vec2::new(25., 25.), 0., 1.);

        pose.advance(&grid, Intent::Positive, Intent::Positive, FRAC_PI_2, 2., Collision::Point);
        assert_eq!(pose.heading, FRAC_PI_2);
        assert!((pose.pos - Vec2::new(25., 27.)).length() < 1e-5);

        pose.advance(&grid, Intent::Negative, Intent::Idle, PI, 2., Collision::Point);
        assert_eq!(pose.heading, FRAC_PI_2 - PI);
    }

    #[test]
    fn blocked_step_keeps_position_but_turns() {
        let grid = room();
        // one unit from the right wall, facing it
        let mut pose = Pose::new(Vec2::new(39., 25.), 0., 1.);

        pose.advance(&grid, Intent::Positive, Intent::Positive, 0.01, 5., Collision::Point);
        assert_eq!(pose.pos, Vec2::new(39., 25.));
        assert_eq!(pose.heading, 0.01);
    }

    #[test]
    fn heading_is_not_normalized() {
        let grid = room();
        let mut pose = Pose::new(Vec2::new(25., 25.), 0., 1.);
        for _ in 0..10 {
            pose.advance(&grid, Intent::Positive, Intent::Idle, 1., 0., Collision::Point);
        }
        assert_eq!(pose.heading, 10.);
    }

    #[test]
    fn point_collision_ignores_radius() {
        let grid = room();
        let mut pose = Pose::new(Vec2::new(37., 25.), 0., 5.);
        pose.advance(&grid, Intent::Idle, Intent::Positive, 0., 2., Collision::Point);
        assert_eq!(pose.pos, Vec2::new(39., 25.));
    }

    #[test]
    fn radius_collision_keeps_distance() {
        let grid = room();
        let mut pose = Pose::new(Vec2::new(32., 25.), 0., 5.);
        pose.advance(&grid, Intent::Idle, Intent::Positive, 0., 2., Collision::Radius);
        assert_eq!(pose.pos, Vec2::new(34., 25.));
        // 34 + 2 + 5 reaches into the wall column
        pose.advance(&grid, Intent::Idle, Intent::Positive, 0., 2., Collision::Radius);
        assert_eq!(pose.pos, Vec2::new(34., 25.));
    }

    #[test]
    fn radius_collision_slides_along_walls() {
        let grid = room();
        // hugging the right wall, walking diagonally into it
        let mut pose = Pose::new(Vec2::new(35., 20.), FRAC_PI_4, 5.);
        pose.advance(&grid, Intent::Idle, Intent::Positive, 0., 2., Collision::Radius);
        assert_eq!(pose.pos.x, 35.);
        assert!(pose.pos.y > 20.);
    }

    #[test]
    fn player_update_uses_its_intents() {
        let grid = room();
        let mut player = Player {
            pose: Pose::new(Vec2::new(25., 25.), 0., 1.),
            move_speed: 3.,
            turn_speed: 0.5,
            collision: Collision::Point,
            turn: Intent::Idle,
            walk: Intent::Positive,
        };
        player.update(&grid);
        assert!((player.pose.pos.x - 28.).abs() < 1e-5);

        player.walk = Intent::Idle;
        player.turn = Intent::Negative;
        player.update(&grid);
        assert_eq!(player.pose.heading, -0.5);
        assert!((player.pose.pos.x - 28.).abs() < 1e-5);
    }
}
