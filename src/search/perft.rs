// src/search/perft.rs

use std::time::Instant;

use crate::game::board::position::{MoveFilter, Position};
use crate::game::moves::{generate_moves, MoveList};

/// Counts the leaves of the move tree to the given depth.
pub fn perft(pos: &mut Position, depth: i32) -> u64 {
    if depth <= 0 {
        return 1;
    }
    let mut list = MoveList::new();
    generate_moves(pos, &mut list);
    let mut nodes = 0;
    for i in 0..list.len {
        if !pos.make_move(list.items[i], MoveFilter::AllMoves) {
            continue;
        }
        nodes += perft(pos, depth - 1);
        pos.unmake_move();
    }
    nodes
}

/// Per-root-move breakdown with totals and timing, for generator
/// debugging from the command line.
pub fn perft_divide(pos: &mut Position, depth: i32) -> u64 {
    let start = Instant::now();
    let mut list = MoveList::new();
    generate_moves(pos, &mut list);
    let mut total = 0;
    println!("move\tnodes");
    for i in 0..list.len {
        let mv = list.items[i];
        if !pos.make_move(mv, MoveFilter::AllMoves) {
            continue;
        }
        let nodes = perft(pos, depth - 1);
        pos.unmake_move();
        println!("{}\t{}", mv, nodes);
        total += nodes;
    }
    println!("depth: {depth}");
    println!("leaf nodes: {total}");
    println!("time: {}ms", start.elapsed().as_millis());
    total
}
