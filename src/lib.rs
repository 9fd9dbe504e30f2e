//! First person view of a tile map by grid ray casting. One ray per screen
//! column is stepped across the grid lines until it strikes a wall, giving the
//! distance a wall strip renderer needs.

pub mod frame;
pub mod game;
pub mod map;
pub mod player;
pub mod ray;

pub use frame::{cast_all, View};
pub use game::{Settings, World};
pub use map::{Grid, Level};
pub use player::{Collision, Intent, Player, Pose};
pub use ray::{cast_ray, normalize_angle, Cardinal, HitRecord};
