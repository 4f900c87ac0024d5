pub const BOARD_N: usize = 6;
pub const NUM_CELLS: usize = BOARD_N * BOARD_N;

/// One of the 8 symmetries of the square board: a clockwise rotation by
/// `rot * 90` degrees, then a horizontal mirror if `flip`. The order is part
/// of the contract; flipping before rotating names a different element for
/// half of the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symmetry {
    pub rot: u8,
    pub flip: bool,
}

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry {
        rot: 0,
        flip: false,
    };

    /// All 8 elements, rotation outer, flip inner. Augmentation yields
    /// samples in exactly this order.
    pub const ALL: [Symmetry; 8] = {
        let mut all = [Symmetry::IDENTITY; 8];
        let mut rot = 0u8;
        while rot < 4 {
            all[rot as usize * 2] = Symmetry { rot, flip: false };
            all[rot as usize * 2 + 1] = Symmetry { rot, flip: true };
            rot += 1;
        }
        all
    };
}

pub fn index_to_cell(idx: usize) -> (usize, usize) {
    (idx / BOARD_N, idx % BOARD_N)
}

pub fn cell_to_index(row: usize, col: usize) -> usize {
    row * BOARD_N + col
}

/// Maps a cell under `sym`: rotate clockwise, then mirror columns if flipped.
/// Bijective on the grid for every element; the identity element is a no-op.
pub fn transform_cell(row: usize, col: usize, sym: Symmetry) -> (usize, usize) {
    let (rr, cc) = match sym.rot {
        0 => (row, col),
        1 => (col, BOARD_N - 1 - row),
        2 => (BOARD_N - 1 - row, BOARD_N - 1 - col),
        3 => (BOARD_N - 1 - col, row),
        r => panic!("rotation must be 0..4, got {r}"),
    };

    if sym.flip {
        (rr, BOARD_N - 1 - cc)
    } else {
        (rr, cc)
    }
}

pub fn transform_index(idx: usize, sym: Symmetry) -> usize {
    let (row, col) = index_to_cell(idx);
    let (rr, cc) = transform_cell(row, col, sym);
    cell_to_index(rr, cc)
}
