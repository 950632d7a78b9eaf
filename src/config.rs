// Shared board/UI constants.
pub const BOARD_W: usize = 8;
pub const BOARD_H: usize = 5;
pub const COLOR_COUNT: u8 = 6;
pub const CELL_W: usize = 2; // render each token as two characters wide
pub const PLAY_W: usize = BOARD_W * CELL_W + 2; // inner width plus side walls
pub const PLAY_H: usize = BOARD_H + 2; // inner height plus ceiling/floor
// Minimal pane width to fit the info/controls boxes + cabinet border.
pub const MIN_PANE_WIDTH: u16 = 30;
// Delay between cascade steps so the player can watch each clear land.
pub const TICK_MS: u64 = 400;
