use crate::map::Grid;
use crate::player::Pose;
use crate::ray::{cast_ray, HitRecord};
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Field of view and the number of screen columns it is split into.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct View {
    fov: f32,
    columns: usize,
}

impl View {
    pub fn new(fov: f32, columns: usize) -> anyhow::Result<Self> {
        if columns == 0 {
            anyhow::bail!("a view needs at least one column");
        }
        if !(fov > 0. && fov < TAU) {
            anyhow::bail!("field of view must lie in (0, 2pi), got {fov}");
        }
        Ok(Self { fov, columns })
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Angle between neighbouring columns.
    pub fn spacing(&self) -> f32 {
        self.fov / self.columns as f32
    }

    /// Unnormalized angle of a column's ray, column 0 sits on the left edge
    /// of the view.
    pub fn column_angle(&self, heading: f32, column: usize) -> f32 {
        heading - self.fov / 2. + column as f32 * self.spacing()
    }

    /// Lazily cast every column, left to right.
    pub fn rays<'a>(
        &'a self,
        grid: &'a Grid,
        pose: &'a Pose,
    ) -> impl Iterator<Item = HitRecord> + 'a {
        (0..self.columns).map(move |column| {
            cast_ray(grid, pose.pos, self.column_angle(pose.heading, column))
        })
    }

    pub fn cast_all(&self, grid: &Grid, pose: &Pose) -> Vec<HitRecord> {
        self.rays(grid, pose).collect()
    }

    /// Same records as [`View::cast_all`], with columns spread over the rayon
    /// pool. Each column writes only its own slot.
    pub fn cast_all_par(&self, grid: &Grid, pose: &Pose) -> Vec<HitRecord> {
        let mut records = vec![HitRecord::MISS; self.columns];
        records
            .par_iter_mut()
            .enumerate()
            .for_each(|(column, record)| {
                *record = cast_ray(grid, pose.pos, self.column_angle(pose.heading, column));
            });
        records
    }
}

/// Cast one ray per column across `fov`, centred on the pose heading.
pub fn cast_all(
    grid: &Grid,
    pose: &Pose,
    fov: f32,
    columns: usize,
) -> anyhow::Result<Vec<HitRecord>> {
    Ok(View::new(fov, columns)?.cast_all(grid, pose))
}
