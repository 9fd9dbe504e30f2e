use crate::frame::View;
use crate::map::{Grid, Level};
use crate::player::{Collision, Intent, Player, Pose};
use crate::ray::HitRecord;
use anyhow::Context;
use std::f32::consts::FRAC_PI_2;

/// Tunables of a session. The defaults are the classic 480x352 window with
/// 30 pixel wall strips.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Settings {
    pub tile_size: f32,
    /// radians
    pub fov: f32,
    pub columns: usize,
    pub radius: f32,
    /// world units per tick
    pub move_speed: f32,
    /// radians per tick
    pub turn_speed: f32,
    /// radians
    pub heading: f32,
    pub collision: Collision,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: 32.,
            fov: 60f32.to_radians(),
            columns: (15 * 32) / 30,
            radius: 3.,
            move_speed: 2.,
            turn_speed: 2f32.to_radians(),
            heading: FRAC_PI_2,
            collision: Collision::Point,
        }
    }
}

/// One play session: owns the map and the player and recasts the view on
/// every tick.
pub struct World {
    grid: Grid,
    player: Player,
    view: View,
    slices: Vec<HitRecord>,
}

impl World {
    pub fn new(level: Level) -> anyhow::Result<Self> {
        let Level {
            grid,
            spawn,
            settings,
        } = level;

        let view = View::new(settings.fov, settings.columns).context("invalid view settings")?;

        // one tick must not carry the player, or the edge of its radius,
        // across a whole tile
        let reach = match settings.collision {
            Collision::Point => settings.move_speed,
            Collision::Radius => settings.move_speed + settings.radius,
        };
        if reach >= grid.tile_size() {
            anyhow::bail!(
                "player reaches {reach} per tick, must stay below the tile size {}",
                grid.tile_size()
            );
        }

        let pos = match spawn {
            Some((col, row)) => grid.cell_center(col, row),
            None => grid.world_size() / 2.,
        };
        if grid.is_wall(pos) {
            anyhow::bail!("player would start inside a wall at {pos}");
        }

        log::info!(
            "starting session on a {}x{} grid at {pos}, {} columns",
            grid.cols(),
            grid.rows(),
            view.columns()
        );

        Ok(Self {
            grid,
            player: Player {
                pose: Pose::new(pos, settings.heading, settings.radius),
                move_speed: settings.move_speed,
                turn_speed: settings.turn_speed,
                collision: settings.collision,
                turn: Intent::Idle,
                walk: Intent::Idle,
            },
            slices: Vec::with_capacity(view.columns()),
            view,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Hit records of the last tick, one per column.
    pub fn hits(&self) -> &[HitRecord] {
        &self.slices
    }

    /// Record the input for the next tick.
    pub fn set_intents(&mut self, turn: Intent, walk: Intent) {
        self.player.turn = turn;
        self.player.walk = walk;
    }

    /// Move the player, then recast every column.
    pub fn tick(&mut self) -> &[HitRecord] {
        self.player.update(&self.grid);

        self.slices.clear();
        self.slices
            .extend(self.view.rays(&self.grid, &self.player.pose));

        log::debug!(
            "tick at {} heading {:.3}: {} columns",
            self.player.pose.pos,
            self.player.pose.heading,
            self.slices.len()
        );
        &self.slices
    }
}
