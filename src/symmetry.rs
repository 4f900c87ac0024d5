use tch::Tensor;

use crate::{transform_cell, transform_index, Record, Symmetry, NUM_CELLS, SLIDE_DIR_LEN};

/// Direction encoding: 0=North, 1=East, 2=South, 3=West, as (row, col)
/// unit offsets.
const DIR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Rotates every channel plane of a `(C, H, W)` tensor clockwise by
/// `sym.rot * 90` degrees, then mirrors the column axis if `sym.flip`.
///
/// `Tensor::rot90` is natively counter-clockwise, so a clockwise request is
/// realized with the complementary count. Callers only ever see the
/// clockwise convention.
pub fn transform_board(x: &Tensor, sym: Symmetry) -> Tensor {
    let k_ccw = (4 - i64::from(sym.rot)) % 4;
    let mut out = if k_ccw != 0 {
        x.rot90(k_ccw, &[1, 2])
    } else {
        x.shallow_clone()
    };
    if sym.flip {
        out = out.flip(&[2]);
    }
    out
}

/// Permutes a length-36 cell-indexed distribution: the mass at cell `i`
/// moves to the cell `i` maps to. Every input element appears exactly once
/// in the output.
pub fn permute_cell_vector(p: &[f32], sym: Symmetry) -> Vec<f32> {
    assert_eq!(p.len(), NUM_CELLS, "cell vector must have {NUM_CELLS} entries");
    let mut out = vec![0f32; NUM_CELLS];
    for (i, &v) in p.iter().enumerate() {
        out[transform_index(i, sym)] = v;
    }
    out
}

/// Remaps a 4-way direction distribution under the same board transform.
///
/// Each canonical unit offset is pushed through `transform_cell` at two
/// adjacent cells and the delta looked up back to a direction index. The
/// dihedral group maps axis-aligned unit vectors to axis-aligned unit
/// vectors, so a miss is a contract violation and panics rather than
/// silently dropping mass.
pub fn remap_direction_vector(d: &[f32], sym: Symmetry) -> Vec<f32> {
    assert_eq!(d.len(), SLIDE_DIR_LEN, "direction vector must have {SLIDE_DIR_LEN} entries");
    let mut out = vec![0f32; SLIDE_DIR_LEN];
    for (i, &(dr, dc)) in DIR_OFFSETS.iter().enumerate() {
        // Interior anchor so both cells stay on the board.
        let (r0, c0) = (2usize, 2usize);
        let (r1, c1) = ((r0 as i32 + dr) as usize, (c0 as i32 + dc) as usize);
        let t0 = transform_cell(r0, c0, sym);
        let t1 = transform_cell(r1, c1, sym);
        let delta = (t1.0 as i32 - t0.0 as i32, t1.1 as i32 - t0.1 as i32);
        let j = DIR_OFFSETS
            .iter()
            .position(|&o| o == delta)
            .unwrap_or_else(|| {
                panic!("direction {i} mapped to non-unit offset {delta:?} under {sym:?}")
            });
        out[j] += d[i];
    }
    out
}

/// Applies `sym` to one record: board tensor, the two cell-indexed targets
/// and the direction target are transformed; the categorical targets
/// (place type, pickup, slide length) and the outcome pass through
/// unchanged — they are not spatial and must never be permuted.
pub fn transform_record(rec: &Record, sym: Symmetry) -> Record {
    Record {
        board: transform_board(&rec.board, sym),
        place_pos: permute_cell_vector(&rec.place_pos, sym),
        place_type: rec.place_type.clone(),
        slide_from: permute_cell_vector(&rec.slide_from, sym),
        slide_dir: remap_direction_vector(&rec.slide_dir, sym),
        slide_pickup: rec.slide_pickup.clone(),
        slide_len: rec.slide_len.clone(),
        outcome: rec.outcome,
    }
}

#[cfg(test)]
mod tests {
    use tch::{IndexOp, Kind, Tensor};

    use super::*;
    use crate::BOARD_N;

    fn board_with_ones(cells: &[(usize, usize)]) -> Tensor {
        let mut fld = [[0f32; BOARD_N]; BOARD_N];
        for &(r, c) in cells {
            fld[r][c] = 1.0;
        }
        Tensor::from_slice(fld.as_flattened())
            .view([1, BOARD_N as i64, BOARD_N as i64])
            .to_kind(Kind::Float)
    }

    fn at(t: &Tensor, r: usize, c: usize) -> f32 {
        f32::try_from(t.i((0, r as i64, c as i64))).unwrap()
    }

    #[test]
    fn board_rotation_is_clockwise() {
        // Asymmetric fixture: marks at (0,0) and (0,1). One clockwise turn
        // must land them at (0,5) and (1,5); a counter-clockwise one would
        // put them at (5,0) and (4,0).
        let x = board_with_ones(&[(0, 0), (0, 1)]);
        let out = transform_board(&x, Symmetry { rot: 1, flip: false });
        assert_eq!(out.size(), [1, 6, 6]);
        assert_eq!(at(&out, 0, 5), 1.0);
        assert_eq!(at(&out, 1, 5), 1.0);
        assert_eq!(at(&out, 5, 0), 0.0);
        assert_eq!(at(&out, 4, 0), 0.0);
        assert_eq!(f64::try_from(out.sum(Kind::Float)).unwrap(), 2.0);
    }

    #[test]
    fn board_flip_mirrors_columns() {
        let x = board_with_ones(&[(2, 0)]);
        let out = transform_board(&x, Symmetry { rot: 0, flip: true });
        assert_eq!(at(&out, 2, 5), 1.0);
        assert_eq!(at(&out, 2, 0), 0.0);
    }

    #[test]
    fn board_identity_is_exact() {
        let x = Tensor::arange(72i64, (Kind::Float, tch::Device::Cpu)).view([2, 6, 6]);
        let out = transform_board(&x, Symmetry::IDENTITY);
        assert_eq!(out, x);
    }

    #[test]
    fn board_transform_matches_index_transform() {
        // The tensor path and the index-algebra path must agree cell by cell
        // for every element of the group.
        for sym in Symmetry::ALL {
            for idx in 0..NUM_CELLS {
                let (r, c) = crate::index_to_cell(idx);
                let x = board_with_ones(&[(r, c)]);
                let out = transform_board(&x, sym);
                let (tr, tc) = transform_cell(r, c, sym);
                assert_eq!(at(&out, tr, tc), 1.0, "{sym:?} cell ({r},{c})");
            }
        }
    }

    #[test]
    fn cell_permutation_moves_mass_without_losing_it() {
        let mut p = vec![0f32; NUM_CELLS];
        p[0] = 0.5;
        p[7] = 0.25;
        p[35] = 0.25;

        for sym in Symmetry::ALL {
            let out = permute_cell_vector(&p, sym);
            assert_eq!(out.len(), NUM_CELLS);
            assert_eq!(out.iter().sum::<f32>(), p.iter().sum::<f32>());
            assert_eq!(out[transform_index(0, sym)], 0.5);
            assert_eq!(out[transform_index(7, sym)], 0.25);
            assert_eq!(out[transform_index(35, sym)], 0.25);
        }

        assert_eq!(permute_cell_vector(&p, Symmetry::IDENTITY), p);
    }

    #[test]
    fn direction_remap_known_cases() {
        let north = vec![1.0, 0.0, 0.0, 0.0];

        // One clockwise turn sends North to East.
        let cw = Symmetry { rot: 1, flip: false };
        assert_eq!(remap_direction_vector(&north, cw), [0.0, 1.0, 0.0, 0.0]);

        // A half turn sends North to South.
        let half = Symmetry { rot: 2, flip: false };
        assert_eq!(remap_direction_vector(&north, half), [0.0, 0.0, 1.0, 0.0]);

        // A horizontal mirror leaves North alone but swaps East and West.
        let mirror = Symmetry { rot: 0, flip: true };
        assert_eq!(remap_direction_vector(&north, mirror), north);
        let east = vec![0.0, 1.0, 0.0, 0.0];
        assert_eq!(remap_direction_vector(&east, mirror), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn direction_remap_conserves_mass() {
        let d = vec![0.5, 0.25, 0.125, 0.0625];
        for sym in Symmetry::ALL {
            let out = remap_direction_vector(&d, sym);
            assert_eq!(out.iter().sum::<f32>(), d.iter().sum::<f32>(), "{sym:?}");
            // Each output slot holds exactly one input's mass.
            let mut sorted_in = d.clone();
            let mut sorted_out = out.clone();
            sorted_in.sort_by(f32::total_cmp);
            sorted_out.sort_by(f32::total_cmp);
            assert_eq!(sorted_in, sorted_out, "{sym:?}");
        }
        assert_eq!(remap_direction_vector(&d, Symmetry::IDENTITY), d);
    }

    #[test]
    fn categorical_targets_pass_through_unchanged() {
        let rec = Record {
            board: board_with_ones(&[(1, 1)]),
            place_pos: vec![0.0; NUM_CELLS],
            place_type: vec![0.2, 0.3, 0.5],
            slide_from: vec![0.0; NUM_CELLS],
            slide_dir: vec![0.25; 4],
            slide_pickup: vec![0.1, 0.2, 0.3, 0.4, 0.0, 0.0],
            slide_len: vec![0.0, 0.0, 0.5, 0.5, 0.0, 0.0],
            outcome: -1.0,
        };

        for sym in Symmetry::ALL {
            let out = transform_record(&rec, sym);
            assert_eq!(out.place_type, rec.place_type, "{sym:?}");
            assert_eq!(out.slide_pickup, rec.slide_pickup, "{sym:?}");
            assert_eq!(out.slide_len, rec.slide_len, "{sym:?}");
            assert_eq!(out.outcome, rec.outcome, "{sym:?}");
        }
    }

    #[test]
    fn transform_record_identity_reproduces_input() {
        let mut place_pos = vec![0f32; NUM_CELLS];
        place_pos[13] = 1.0;
        let rec = Record {
            board: board_with_ones(&[(0, 3), (4, 4)]),
            place_pos,
            place_type: vec![1.0, 0.0, 0.0],
            slide_from: vec![1.0 / 36.0; NUM_CELLS],
            slide_dir: vec![0.7, 0.1, 0.1, 0.1],
            slide_pickup: vec![0.0; 6],
            slide_len: vec![0.0; 6],
            outcome: 0.5,
        };

        let out = transform_record(&rec, Symmetry::IDENTITY);
        assert_eq!(out.board, rec.board);
        assert_eq!(out.place_pos, rec.place_pos);
        assert_eq!(out.slide_from, rec.slide_from);
        assert_eq!(out.slide_dir, rec.slide_dir);
    }

    #[test]
    #[should_panic(expected = "cell vector")]
    fn wrong_cell_vector_length_panics() {
        permute_cell_vector(&[0.0; 35], Symmetry::IDENTITY);
    }
}
