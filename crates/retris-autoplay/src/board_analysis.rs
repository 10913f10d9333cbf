use std::{cell::OnceCell, iter};

use retris_engine::Board;

/// Metrics of a board, computed on first access.
///
/// Heights count rows from the floor up to the topmost occupied cell of a column.
/// Full rows are counted, not cleared.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[u8; Board::COLS]>,
    column_occupied_cells: OnceCell<[u8; Board::COLS]>,
    aggregate_height: OnceCell<u32>,
    complete_lines: OnceCell<usize>,
    num_holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            complete_lines: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; Board::COLS] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; Board::COLS];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let top = (0..Board::ROWS).find(|&y| self.board.is_occupied(x, y));
                if let Some(top) = top {
                    *h = height_u8(Board::ROWS - top);
                }
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; Board::COLS] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; Board::COLS];
            for (x, o) in column_occupied_cells.iter_mut().enumerate() {
                let count = (0..Board::ROWS)
                    .filter(|&y| self.board.is_occupied(x, y))
                    .count();
                *o = height_u8(count);
            }
            column_occupied_cells
        })
    }

    /// Sum of all column heights.
    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        *self.aggregate_height.get_or_init(|| {
            self.column_heights().iter().copied().map(u32::from).sum()
        })
    }

    #[must_use]
    pub fn complete_lines(&self) -> usize {
        *self
            .complete_lines
            .get_or_init(|| self.board.count_full_rows())
    }

    /// Empty cells with an occupied cell somewhere above them in the same column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum of height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| {
                    let left = i32::from(w[0]);
                    let right = i32::from(w[1]);
                    (right - left).unsigned_abs()
                })
                .sum()
        })
    }
}

fn height_u8(rows: usize) -> u8 {
    // Board::ROWS fits in u8
    u8::try_from(rows).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod test_boards {
        use super::*;

        pub fn flat() -> Board {
            "\
            IIIIIIIII.\n\
            IIIIIIIII."
                .parse()
                .unwrap()
        }

        pub fn staircase() -> Board {
            "\
            L.........\n\
            LL........\n\
            LLL.......\n\
            LLLL......\n\
            LLLLL....."
                .parse()
                .unwrap()
        }

        pub fn single_hole() -> Board {
            "\
            T.........\n\
            ..........\n\
            T........."
                .parse()
                .unwrap()
        }

        pub fn overhang() -> Board {
            "\
            .SS.......\n\
            SS........\n\
            .........."
                .parse()
                .unwrap()
        }

        pub fn complete() -> Board {
            "\
            J.........\n\
            OOOOOOOOOO\n\
            IIIIIIIIII"
                .parse()
                .unwrap()
        }
    }

    #[test]
    fn test_metrics_on_common_boards() {
        // (name, board, aggregate height, holes, bumpiness, complete lines)
        let cases = [
            ("empty", Board::EMPTY, 0, 0, 0, 0),
            ("flat", test_boards::flat(), 18, 0, 2, 0),
            ("staircase", test_boards::staircase(), 15, 0, 5, 0),
            ("single_hole", test_boards::single_hole(), 3, 1, 3, 0),
            ("overhang", test_boards::overhang(), 8, 4, 4, 0),
            ("complete", test_boards::complete(), 21, 0, 1, 2),
        ];
        for (name, board, height, holes, bumpiness, lines) in cases {
            let analysis = BoardAnalysis::new(board);
            assert_eq!(analysis.aggregate_height(), height, "{name}");
            assert_eq!(analysis.num_holes(), holes, "{name}");
            assert_eq!(analysis.bumpiness(), bumpiness, "{name}");
            assert_eq!(analysis.complete_lines(), lines, "{name}");
        }
    }

    #[test]
    fn test_column_heights() {
        let analysis = BoardAnalysis::new(test_boards::staircase());
        let heights = analysis.column_heights();
        assert_eq!(heights[..6], [5, 4, 3, 2, 1, 0]);
        assert!(heights[6..].iter().all(|&h| h == 0));
    }

    #[test]
    fn test_hole_under_overhang() {
        let analysis = BoardAnalysis::new(test_boards::overhang());
        assert_eq!(analysis.column_heights()[..4], [2, 3, 3, 0]);
        assert_eq!(analysis.column_occupied_cells()[..4], [1, 2, 1, 0]);
    }
}
