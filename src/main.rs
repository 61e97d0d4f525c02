// src/main.rs

use anyhow::Result;

use pawnstorm::game::board::zobrist::zobrist;
use pawnstorm::game::moves::magics;
use pawnstorm::search::eval::eval_masks;
use pawnstorm::uci;

fn main() -> Result<()> {
    // Warm the lazily built tables before the first search.
    magics();
    zobrist();
    eval_masks();

    uci::main_loop()
}
