use serde::Serialize;

/// Everything a visualization needs to draw the world: its size, the robot position and
/// (optionally) the landmarks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub world_size: i64,
    pub robot: [f64; 2],
    pub landmarks: Option<Vec<[i64; 2]>>,
}

/// Grids of larger worlds are downsampled to this many cells per side.
pub const MAX_RENDER_CELLS: usize = 200;

impl WorldSnapshot {
    /// Renders the world as a text grid with one character per unit cell, or per block of cells
    /// for worlds wider than [`MAX_RENDER_CELLS`]. The top row holds the largest y values. The
    /// robot is drawn as `o`, landmarks as `x` and empty cells as `.`.
    pub fn render(&self) -> String {
        if self.world_size <= 0 {
            return String::new();
        }

        let size = (self.world_size as usize).min(MAX_RENDER_CELLS);
        let scale = self.world_size as f64 / size as f64;
        let mut grid = vec![vec!['.'; size]; size];

        // world coordinates to (row, column), the far edge ends up in the last cell
        let cell = |x: f64, y: f64| -> Option<(usize, usize)> {
            if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
                return None;
            }
            let col = ((x / scale).floor() as usize).min(size - 1);
            let row = ((y / scale).floor() as usize).min(size - 1);
            Some((size - 1 - row, col))
        };

        for l in self.landmarks.iter().flatten() {
            if let Some((r, c)) = cell(l[0] as f64, l[1] as f64) {
                grid[r][c] = 'x';
            }
        }

        if let Some((r, c)) = cell(self.robot[0], self.robot[1]) {
            grid[r][c] = 'o';
        }

        let mut out = String::with_capacity(size * (size + 1));
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
