use std::error::Error;

mod app;
mod config;
mod game;
mod ui;
pub use game::{Board, Game, GameError, Phase, TickReport};
pub use config::{
    BOARD_H, BOARD_W, CELL_W, COLOR_COUNT, MIN_PANE_WIDTH, PLAY_H, PLAY_W, TICK_MS,
};

fn main() -> Result<(), Box<dyn Error>> {
    app::run()
}
