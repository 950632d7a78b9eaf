use crate::game::{Board, GameError};

/// Where the session is in the swap/cascade cycle. `Resolving` lasts from
/// an accepted swap until a detection pass comes up empty; the caller
/// paces the steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
}

/// What one resolution step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub matches_found: u32,
    pub still_resolving: bool,
}

/// One game session: a settled board, the running score, and the cascade
/// phase. All mutation goes through `request_swap` and `tick`.
pub struct Game {
    board: Board,
    score: u32,
    phase: Phase,
}

impl Game {
    pub fn new(width: usize, height: usize, colors: u8) -> Self {
        Self::from_board(Board::new(width, height, colors))
    }

    pub fn with_seed(width: usize, height: usize, colors: u8, seed: u64) -> Self {
        Self::from_board(Board::with_seed(width, height, colors, seed))
    }

    fn from_board(mut board: Board) -> Self {
        board.settle();
        Self {
            board,
            score: 0,
            phase: Phase::Idle,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player move. Accepted only when idle and the swap would produce a
    /// match; an accepted swap lands on the real board and starts the
    /// cascade. `Ok(false)` covers every rejection with no state change:
    /// mid-cascade requests, non-adjacent pairs, and swaps that line
    /// nothing up.
    pub fn request_swap(&mut self, a: usize, b: usize) -> Result<bool, GameError> {
        self.board.check(a)?;
        self.board.check(b)?;
        if self.phase != Phase::Idle {
            return Ok(false);
        }
        if !self.board.is_legal_swap(a, b)? {
            return Ok(false);
        }
        self.board.swap(a, b)?;
        self.phase = Phase::Resolving;
        Ok(true)
    }

    /// One cascade step: detect, and either finish (no matches) or score,
    /// clear, and collapse. The caller decides how fast to call this;
    /// back-to-back calls resolve the same way as paced ones.
    pub fn tick(&mut self) -> TickReport {
        if self.phase != Phase::Resolving {
            return TickReport {
                matches_found: 0,
                still_resolving: false,
            };
        }
        let found = self.board.detect_matches();
        if found == 0 {
            self.phase = Phase::Idle;
            return TickReport {
                matches_found: 0,
                still_resolving: false,
            };
        }
        self.score += found;
        self.board.clear_matched();
        self.board.collapse();
        TickReport {
            matches_found: found,
            still_resolving: true,
        }
    }

    /// Game-over query: false once no adjacent swap anywhere would match.
    /// Observable only; the session keeps answering queries afterwards.
    pub fn has_moves(&self) -> bool {
        self.board.has_any_legal_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The fixed scenario grid: row 0 is 1,1,2,3,4,5,6,1 and cell 10
    // (row 1, column 2) holds the 1 that completes the run when swapped
    // up. No run exists anywhere before the swap.
    #[rustfmt::skip]
    fn scenario_board() -> Board {
        Board::from_cells(8, 5, 6, vec![
            1, 1, 2, 3, 4, 5, 6, 1,
            3, 4, 1, 5, 6, 2, 3, 4,
            1, 2, 3, 4, 5, 6, 1, 2,
            2, 3, 4, 5, 6, 1, 2, 3,
            3, 4, 5, 6, 1, 2, 3, 4,
        ])
    }

    fn resolve(game: &mut Game) -> (u32, u32) {
        let mut ticks = 0;
        let mut reported = 0;
        loop {
            let report = game.tick();
            reported += report.matches_found;
            if !report.still_resolving {
                return (ticks, reported);
            }
            ticks += 1;
            assert!(ticks <= 40, "cascade did not settle");
        }
    }

    #[test]
    fn fresh_game_starts_idle_with_no_matches() {
        for seed in 0..10 {
            let game = Game::with_seed(8, 5, 6, seed);
            assert_eq!(game.phase(), Phase::Idle);
            assert_eq!(game.score(), 0);
            assert_eq!(game.board().clone().detect_matches(), 0, "seed {seed}");
        }
    }

    #[test]
    fn swap_scenario_resolves_the_run() {
        let mut game = Game::from_board(scenario_board());
        assert_eq!(game.board().get(10), Ok(1));
        assert_eq!(game.board().is_legal_swap(2, 10), Ok(true));

        assert_eq!(game.request_swap(2, 10), Ok(true));
        assert_eq!(game.phase(), Phase::Resolving);

        let first = game.tick();
        assert_eq!(first.matches_found, 1);
        assert!(first.still_resolving);

        let (_, reported) = resolve(&mut game);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.score(), 1 + reported);
        // Settled means settled: the cleared run cannot still be there.
        assert_eq!(game.board().clone().detect_matches(), 0);
        assert!(game.board().cells.iter().all(|&v| v != 0));
    }

    #[test]
    fn rejected_swaps_change_nothing() {
        let mut game = Game::from_board(scenario_board());
        let before = game.board().cells.clone();

        // Adjacent but matchless.
        assert_eq!(game.request_swap(4, 5), Ok(false));
        // Not adjacent at all, including the row-wrap pair.
        assert_eq!(game.request_swap(0, 9), Ok(false));
        assert_eq!(game.request_swap(7, 8), Ok(false));

        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.board().cells, before);
    }

    #[test]
    fn swaps_are_rejected_mid_cascade() {
        let mut game = Game::from_board(scenario_board());
        assert_eq!(game.request_swap(2, 10), Ok(true));
        // A move that would be legal from idle is a no-op while resolving.
        assert_eq!(game.request_swap(2, 10), Ok(false));
        assert_eq!(game.phase(), Phase::Resolving);
    }

    #[test]
    fn bad_indices_error_even_mid_cascade() {
        let mut game = Game::from_board(scenario_board());
        assert_eq!(
            game.request_swap(0, 40),
            Err(GameError::OutOfBounds { index: 40, size: 40 })
        );
        assert_eq!(game.request_swap(2, 10), Ok(true));
        assert_eq!(
            game.request_swap(41, 0),
            Err(GameError::OutOfBounds { index: 41, size: 40 })
        );
    }

    #[test]
    fn tick_when_idle_is_a_no_op() {
        let mut game = Game::from_board(scenario_board());
        let before = game.board().cells.clone();
        let report = game.tick();
        assert_eq!(report.matches_found, 0);
        assert!(!report.still_resolving);
        assert_eq!(game.board().cells, before);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn score_equals_sum_of_reported_matches() {
        for seed in [3, 17, 2024] {
            let mut game = Game::with_seed(8, 5, 6, seed);
            let mut total = 0;
            // Play up to three moves, whatever the board offers.
            for _ in 0..3 {
                let Some((a, b)) = first_legal_move(game.board()) else {
                    break;
                };
                assert_eq!(game.request_swap(a, b), Ok(true));
                let (_, reported) = resolve(&mut game);
                total += reported;
            }
            assert_eq!(game.score(), total, "seed {seed}");
        }
    }

    #[test]
    fn validation_never_moves_the_score() {
        let game = Game::from_board(scenario_board());
        for i in 0..game.board().len() {
            let _ = game.board().is_legal_swap(i, (i + 1) % game.board().len());
        }
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn stripe_session_reports_no_moves() {
        let mut cells = Vec::with_capacity(40);
        for y in 0..5usize {
            for x in 0..8usize {
                cells.push(((x + 2 * y) % 6 + 1) as u8);
            }
        }
        let game = Game::from_board(Board::from_cells(8, 5, 6, cells));
        assert!(!game.has_moves());

        let scenario = Game::from_board(scenario_board());
        assert!(scenario.has_moves());
    }

    fn first_legal_move(board: &Board) -> Option<(usize, usize)> {
        for i in 0..board.len() {
            let x = i % board.width;
            let y = i / board.width;
            if x < board.width - 1 && board.is_legal_swap(i, i + 1) == Ok(true) {
                return Some((i, i + 1));
            }
            if y < board.height - 1 && board.is_legal_swap(i, i + board.width) == Ok(true) {
                return Some((i, i + board.width));
            }
        }
        None
    }
}
