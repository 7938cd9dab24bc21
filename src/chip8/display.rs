pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

pub type Grid = [[bool; WIDTH]; HEIGHT];

pub const fn empty_grid() -> Grid {
    [[false; WIDTH]; HEIGHT]
}

/// Monochrome 64x32 pixel state. Rows are indexed first, so `rows()[y][x]`.
pub struct Framebuffer {
    grid: Grid,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self { grid: empty_grid() }
    }

    pub fn clear(&mut self) {
        self.grid = empty_grid();
    }

    pub const fn width(&self) -> usize {
        WIDTH
    }

    pub const fn height(&self) -> usize {
        HEIGHT
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.grid[y][x]
    }

    pub fn rows(&self) -> &Grid {
        &self.grid
    }

    pub fn lit_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&p| p).count()
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self) {
        self.grid = [[true; WIDTH]; HEIGHT];
    }

    /// XORs the 8 bits of `sprite` onto row `y` starting at column `x`, MSB
    /// first. Bits that would land past the right edge are dropped. Returns
    /// true if any lit pixel was turned off.
    pub fn draw_row(&mut self, x: usize, y: usize, sprite: u8) -> bool {
        let mut collision = false;
        let row = &mut self.grid[y];
        for bit in 0..8 {
            let col = x + bit;
            if col >= WIDTH {
                break;
            }
            if sprite & (0x80 >> bit) != 0 {
                collision |= row[col];
                row[col] = !row[col];
            }
        }
        collision
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
