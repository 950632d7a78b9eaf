use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::GameError;

/// Grid of colored tokens stored row-major (index = y * width + x).
/// Token values are 1..=colors; 0 marks an empty cell and only exists
/// between a clear and the refill at the end of `collapse`.
#[derive(Clone)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub colors: u8,
    pub(crate) cells: Vec<u8>,
    pub(crate) matched: Vec<bool>,
    rng: StdRng,
}

impl Board {
    pub fn new(width: usize, height: usize, colors: u8) -> Self {
        Self::with_rng(width, height, colors, StdRng::from_entropy())
    }

    pub fn with_seed(width: usize, height: usize, colors: u8, seed: u64) -> Self {
        Self::with_rng(width, height, colors, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, colors: u8, rng: StdRng) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            colors,
            cells: vec![0; size],
            matched: vec![false; size],
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn check(&self, index: usize) -> Result<usize, GameError> {
        if index < self.cells.len() {
            Ok(index)
        } else {
            Err(GameError::OutOfBounds {
                index,
                size: self.cells.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<u8, GameError> {
        self.check(index).map(|i| self.cells[i])
    }

    pub fn is_matched(&self, index: usize) -> Result<bool, GameError> {
        self.check(index).map(|i| self.matched[i])
    }

    /// Scan the whole grid once, flagging every run of three in `matched`.
    /// Returns the number of match lines found: a cell central to both a
    /// horizontal and a vertical run contributes to both counts but is
    /// flagged once. Cell values are not touched.
    pub fn detect_matches(&mut self) -> u32 {
        mark_matches(&self.cells, &mut self.matched, self.width)
    }

    /// Empty every flagged cell and drop the flags.
    pub fn clear_matched(&mut self) {
        for i in 0..self.cells.len() {
            if self.matched[i] {
                self.matched[i] = false;
                self.cells[i] = 0;
            }
        }
    }

    /// Gravity pass: tokens fall into empty cells below them until the
    /// column settles (a single sweep is not enough when a column has
    /// several holes), then every remaining empty cell is refilled from
    /// the board's own generator. Leaves no cell empty.
    pub fn collapse(&mut self) {
        let mut falling = true;
        while falling {
            falling = false;
            for i in (self.width..self.cells.len()).rev() {
                if self.cells[i] == 0 && self.cells[i - self.width] != 0 {
                    falling = true;
                    self.cells[i] = self.cells[i - self.width];
                    self.cells[i - self.width] = 0;
                }
            }
        }

        for cell in &mut self.cells {
            if *cell == 0 {
                *cell = self.rng.gen_range(1..=self.colors);
            }
        }
    }

    /// Exchange two cells. Adjacency must have been validated by the
    /// caller; a non-adjacent pair here is a miscomputed index, not a
    /// rejected move, so it fails loudly. Whether the swap produces a
    /// match is not checked.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), GameError> {
        self.check(a)?;
        self.check(b)?;
        if !self.adjacent(a, b) {
            return Err(GameError::IllegalSwap { a, b });
        }
        self.cells.swap(a, b);
        Ok(())
    }

    /// Fill the board and clear every pre-existing match so the first
    /// thing the player sees has no free triples on it.
    pub fn settle(&mut self) {
        self.collapse();
        while self.detect_matches() > 0 {
            self.clear_matched();
            self.collapse();
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(width: usize, height: usize, colors: u8, cells: Vec<u8>) -> Self {
        assert_eq!(cells.len(), width * height);
        let mut board = Self::with_rng(width, height, colors, StdRng::seed_from_u64(0));
        board.cells = cells;
        board
    }
}

/// Match scan over a raw cell slice. Kept free of `Board` so the move
/// validator can run it against a speculative copy without touching the
/// authoritative state.
pub(crate) fn mark_matches(cells: &[u8], matched: &mut [bool], width: usize) -> u32 {
    let size = cells.len();
    let height = size / width;
    let mut found = 0;
    for i in 0..size {
        let v = cells[i];
        if v == 0 {
            continue;
        }
        let x = i % width;
        let y = i / width;
        if x > 0 && x < width - 1 && cells[i - 1] == v && cells[i + 1] == v {
            found += 1;
            matched[i - 1] = true;
            matched[i] = true;
            matched[i + 1] = true;
        }
        if y > 0 && y < height - 1 && cells[i - width] == v && cells[i + width] == v {
            found += 1;
            matched[i - width] = true;
            matched[i] = true;
            matched[i + width] = true;
        }
    }
    found
}
