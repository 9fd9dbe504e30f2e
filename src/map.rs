use crate::game::Settings;
use crate::player::Collision;
use anyhow::Context;
use glam::{IVec2, Vec2};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

/// Level shipped with the crate, used when no level file is given.
const BUILTIN_LEVEL: &str = include_str!("../levels/default.map");

/// Static, axis-aligned map of open and wall cells with a uniform tile pitch.
#[derive(Clone, PartialEq, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    /// row-major, `true` is a wall
    cells: Vec<bool>,
}

impl Grid {
    /// Build a grid from rows of cell values, any nonzero value is a wall.
    pub fn new<R: AsRef<[u8]>>(tile_size: f32, rows: &[R]) -> anyhow::Result<Self> {
        if !(tile_size.is_finite() && tile_size > 0.) {
            anyhow::bail!("tile size must be positive and finite, got {tile_size}");
        }

        let cols = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            anyhow::bail!("grid must have at least one row and one column");
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                anyhow::bail!(
                    "grid is not rectangular: row {idx} has {} cells, expected {cols}",
                    row.len()
                );
            }
            cells.extend(row.iter().map(|&cell| cell != 0));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            tile_size,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width and height of the world in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.tile_size,
            self.rows as f32 * self.tile_size,
        )
    }

    /// Wall flag of a cell, `None` outside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<bool> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.tile_size
    }

    /// Whether a world point is solid. Anything outside the world rectangle
    /// counts as wall, as does the far edge itself since it indexes one past
    /// the last cell.
    pub fn is_wall(&self, point: Vec2) -> bool {
        let size = self.world_size();
        // negated so that NaN coordinates are solid too
        if !(point.x >= 0. && point.x <= size.x && point.y >= 0. && point.y <= size.y) {
            return true;
        }

        let cell = (point / self.tile_size).floor().as_ivec2();
        self.is_wall_cell(cell)
    }

    /// Whether a cell, given as `(col, row)`, is solid. Cells off the grid
    /// are.
    pub fn is_wall_cell(&self, cell: IVec2) -> bool {
        if cell.x < 0 || cell.y < 0 {
            return true;
        }
        self.cell(cell.x as usize, cell.y as usize).unwrap_or(true)
    }

    /// Whether a point lies inside the world rectangle, edges included.
    pub fn contains(&self, point: Vec2) -> bool {
        let size = self.world_size();
        point.x >= 0. && point.x <= size.x && point.y >= 0. && point.y <= size.y
    }
}

/// A parsed level: the grid, an optional spawn cell and the settings the
/// level file asked for.
#[derive(Clone, PartialEq, Debug)]
pub struct Level {
    pub grid: Grid,
    /// `(col, row)` of the spawn marker
    pub spawn: Option<(usize, usize)>,
    pub settings: Settings,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("loading level at {}", path.display());
        let file = read_to_string(path)
            .with_context(|| format!("could not read level {}", path.display()))?;
        Self::parse(&file).with_context(|| format!("invalid level {}", path.display()))
    }

    /// The 11x15 walled level every session starts with by default.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(BUILTIN_LEVEL).context("invalid builtin level")
    }

    pub fn parse(src: &str) -> anyhow::Result<Self> {
        let mut lines = src.lines();
        let mut settings = Settings::default();
        let mut layout = None;

        while let Some(line) = lines.by_ref().next() {
            match line {
                "" => continue,
                "!!!!META" => parse_meta(&mut settings, &mut lines)?,
                "!!!!MAIN" => {
                    if layout.is_some() {
                        anyhow::bail!("level has more than one main section");
                    }
                    layout = Some(parse_main(&mut lines)?);
                }
                other => anyhow::bail!("unrecognized directive: {other}"),
            }
        }

        let (rows, spawn) = layout.context("level has no main section")?;
        let grid = Grid::new(settings.tile_size, &rows)?;
        log::debug!(
            "parsed level {}x{} (spawn {:?})",
            grid.cols(),
            grid.rows(),
            spawn
        );

        Ok(Self {
            grid,
            spawn,
            settings,
        })
    }
}

fn parse_meta<'lines>(
    settings: &mut Settings,
    lines: impl Iterator<Item = &'lines str>,
) -> anyhow::Result<()> {
    for line in lines {
        if line.is_empty() {
            break;
        }

        let mut chunks = line.split(',');
        let directive = chunks.by_ref().next().unwrap_or_default();
        let mut params = HashMap::new();
        for param in chunks {
            let (key, value) = param
                .split_once('=')
                .context("incorrectly formatted meta")?;
            if params.insert(key, value).is_some() {
                anyhow::bail!("{directive}: duplicate parameter {key:?}");
            }
        }

        match directive {
            "tile" => {
                expect_keys(directive, &params, &["size"])?;
                if let Some(size) = params.get("size") {
                    settings.tile_size = parse_number(directive, "size", size)?;
                }
            }
            "view" => {
                expect_keys(directive, &params, &["fov", "columns"])?;
                if let Some(fov) = params.get("fov") {
                    settings.fov = parse_number(directive, "fov", fov)?.to_radians();
                }
                if let Some(columns) = params.get("columns") {
                    settings.columns = columns
                        .parse()
                        .with_context(|| format!("view: bad columns {columns:?}"))?;
                }
            }
            "player" => {
                expect_keys(
                    directive,
                    &params,
                    &["radius", "speed", "turn", "heading", "collision"],
                )?;
                if let Some(radius) = params.get("radius") {
                    settings.radius = parse_non_negative(directive, "radius", radius)?;
                }
                if let Some(speed) = params.get("speed") {
                    settings.move_speed = parse_non_negative(directive, "speed", speed)?;
                }
                if let Some(turn) = params.get("turn") {
                    settings.turn_speed = parse_number(directive, "turn", turn)?.to_radians();
                }
                if let Some(heading) = params.get("heading") {
                    settings.heading = parse_number(directive, "heading", heading)?.to_radians();
                }
                if let Some(collision) = params.get("collision") {
                    settings.collision = match *collision {
                        "point" => Collision::Point,
                        "radius" => Collision::Radius,
                        other => anyhow::bail!("player: unknown collision mode {other:?}"),
                    };
                }
            }
            other => anyhow::bail!("unrecognized meta directive: {other}"),
        }
    }

    Ok(())
}

fn expect_keys(
    directive: &str,
    params: &HashMap<&str, &str>,
    known: &[&str],
) -> anyhow::Result<()> {
    if let Some(key) = params.keys().find(|key| !known.contains(*key)) {
        anyhow::bail!("{directive}: unknown parameter {key:?}");
    }
    Ok(())
}

fn parse_number(directive: &str, key: &str, value: &str) -> anyhow::Result<f32> {
    let number: f32 = value
        .parse()
        .with_context(|| format!("{directive}: bad {key} {value:?}"))?;
    if !number.is_finite() {
        anyhow::bail!("{directive}: {key} must be finite");
    }
    Ok(number)
}

fn parse_non_negative(directive: &str, key: &str, value: &str) -> anyhow::Result<f32> {
    let number = parse_number(directive, key, value)?;
    if number < 0. {
        anyhow::bail!("{directive}: {key} must not be negative, got {number}");
    }
    Ok(number)
}

type Layout = (Vec<Vec<u8>>, Option<(usize, usize)>);

fn parse_main<'lines>(lines: impl Iterator<Item = &'lines str>) -> anyhow::Result<Layout> {
    let mut rows = vec![];
    let mut spawn = None;

    for (row, line) in lines.enumerate() {
        if line.is_empty() {
            break;
        }

        let mut cells = Vec::with_capacity(line.len());
        for (col, tile) in line.chars().enumerate() {
            cells.push(match tile {
                '#' | '1' => 1,
                '.' | '0' | ' ' => 0,
                '*' => {
                    if spawn.replace((col, row)).is_some() {
                        anyhow::bail!("more than one spawn in level");
                    }
                    0
                }
                other => anyhow::bail!("invalid tile in level: {other:?}"),
            });
        }
        rows.push(cells);
    }

    Ok((rows, spawn))
}
