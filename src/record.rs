use tch::Tensor;

use crate::{BOARD_N, NUM_CELLS};

/// Fixed per-record target-vector lengths, in on-disk order. The file format
/// carries no field semantics; which vectors are cell-indexed (36), which is
/// direction-indexed (4) and which are categorical (3/6/6) is convention.
pub const PLACE_POS_LEN: usize = NUM_CELLS;
pub const PLACE_TYPE_LEN: usize = 3;
pub const SLIDE_FROM_LEN: usize = NUM_CELLS;
pub const SLIDE_DIR_LEN: usize = 4;
pub const SLIDE_PICKUP_LEN: usize = 6;
pub const SLIDE_LEN_LEN: usize = 6;

/// One decoded training record: a `(C, 6, 6)` float board tensor, six target
/// distributions and the game outcome from the acting side's perspective.
#[derive(Debug)]
pub struct Record {
    pub board: Tensor,
    pub place_pos: Vec<f32>,
    pub place_type: Vec<f32>,
    pub slide_from: Vec<f32>,
    pub slide_dir: Vec<f32>,
    pub slide_pickup: Vec<f32>,
    pub slide_len: Vec<f32>,
    pub outcome: f32,
}

/// Floats in one board tensor block for a given channel count.
pub fn board_floats(channels: u32) -> usize {
    channels as usize * BOARD_N * BOARD_N
}

/// Total floats in one on-disk record (board, six targets, outcome).
pub fn record_floats(channels: u32) -> usize {
    board_floats(channels)
        + PLACE_POS_LEN
        + PLACE_TYPE_LEN
        + SLIDE_FROM_LEN
        + SLIDE_DIR_LEN
        + SLIDE_PICKUP_LEN
        + SLIDE_LEN_LEN
        + 1
}
