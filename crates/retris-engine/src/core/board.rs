use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use super::piece::{Piece, PieceKind};

/// Indices of cleared rows, as they were numbered before the clear.
pub type ClearedRows = ArrayVec<usize, { Board::ROWS }>;

/// Board row: one cell per column, `Some(kind)` when occupied.
pub type BoardRow = [Option<PieceKind>; Board::COLS];

/// Grid of locked cells.
///
/// Row 0 is the top of the board and `ROWS - 1` the bottom. A cell is occupied
/// exactly when it holds `Some(kind)`; the kind records which piece left it there.
///
/// The text form used by [`fmt::Display`] and [`FromStr`] writes one line per
/// row, `.` for empty cells and the piece letter for occupied ones. Parsing
/// accepts fewer than `ROWS` lines and aligns them to the bottom.
///
/// ```
/// use retris_engine::Board;
///
/// let mut board: Board = "\
///     ..........\n\
///     IIIIIIIIII"
///     .parse()
///     .unwrap();
/// assert!(board.is_row_full(19));
/// assert_eq!(board.clear_full_rows().len(), 1);
/// assert_eq!(board, Board::EMPTY);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; Board::ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const ROWS: usize = 20;
    pub const COLS: usize = 10;
    pub const EMPTY_ROW: BoardRow = [None; Board::COLS];
    pub const EMPTY: Self = Self {
        rows: [Self::EMPTY_ROW; Self::ROWS],
    };

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.rows[y][x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y][x].is_some()
    }

    pub fn set_cell(&mut self, x: usize, y: usize, cell: Option<PieceKind>) {
        self.rows[y][x] = cell;
    }

    #[must_use]
    pub fn rows(&self) -> &[BoardRow; Board::ROWS] {
        &self.rows
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(Option::is_some)
    }

    #[must_use]
    pub fn count_full_rows(&self) -> usize {
        (0..Self::ROWS).filter(|&y| self.is_row_full(y)).count()
    }

    /// Checks if the piece overlaps a wall, the floor, or a locked cell.
    ///
    /// Cells above the top edge (negative rows) never collide.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return true;
            };
            if x >= Self::COLS {
                return true;
            }
            match usize::try_from(y) {
                Ok(y) => y >= Self::ROWS || self.rows[y][x].is_some(),
                Err(_) => false,
            }
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// Cells that fall outside the board are skipped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < Self::COLS
                && y < Self::ROWS
            {
                self.rows[y][x] = Some(piece.kind());
            }
        }
    }

    /// Removes every full row, shifting the rows above it down.
    ///
    /// Rows are scanned bottom to top. After a clear the same index is scanned
    /// again, since the row above has moved into it.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = Self::ROWS;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                // Every earlier clear was at or below this index, so the row
                // sitting here started `cleared.len()` rows higher.
                cleared.push(row - cleared.len());
                self.rows.copy_within(0..row, 1);
                self.rows[0] = Self::EMPTY_ROW;
            } else {
                y -= 1;
            }
        }
        cleared
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let c = cell.map_or('.', PieceKind::as_char);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        writeln!(f, "{self}")?;
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has {_0} rows, at most {} allowed", Board::ROWS)]
    TooManyRows(#[error(not(source))] usize),
    #[display("row {row} has {len} cells, expected {}", Board::COLS)]
    RowLength { row: usize, len: usize },
    #[display("invalid cell {cell:?} in row {row}")]
    InvalidCell { row: usize, cell: char },
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > Self::ROWS {
            return Err(ParseBoardError::TooManyRows(lines.len()));
        }

        let mut board = Self::EMPTY;
        let offset = Self::ROWS - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != Self::COLS {
                return Err(ParseBoardError::RowLength { row: i, len });
            }
            for (x, c) in line.chars().enumerate() {
                board.rows[offset + i][x] = match c {
                    '.' => None,
                    _ => Some(
                        PieceKind::from_char(c)
                            .ok_or(ParseBoardError::InvalidCell { row: i, cell: c })?,
                    ),
                };
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_with_walls_and_floor() {
        let board = Board::EMPTY;
        let piece = Piece::new(PieceKind::O);
        assert!(!board.is_colliding(&piece));
        // O occupies mask columns 0..1
        assert!(!board.is_colliding(&piece.with_position(0, 0)));
        assert!(board.is_colliding(&piece.with_position(-1, 0)));
        assert!(!board.is_colliding(&piece.with_position(8, 0)));
        assert!(board.is_colliding(&piece.with_position(9, 0)));
        assert!(!board.is_colliding(&piece.with_position(4, 18)));
        assert!(board.is_colliding(&piece.with_position(4, 19)));
    }

    #[test]
    fn test_cells_above_top_do_not_collide() {
        let board: Board = "OOOOOOOOOO".parse().unwrap();
        let piece = Piece::new(PieceKind::O).with_position(4, -2);
        assert!(!board.is_colliding(&piece));
        // Walls still apply above the top edge
        assert!(board.is_colliding(&piece.with_position(-1, -2)));
    }

    #[test]
    fn test_collision_with_locked_cells() {
        let board: Board = "....T.....".parse().unwrap();
        let piece = Piece::new(PieceKind::O);
        assert!(board.is_colliding(&piece.with_position(4, 18)));
        assert!(board.is_colliding(&piece.with_position(3, 18)));
        assert!(!board.is_colliding(&piece.with_position(5, 18)));
        assert!(!board.is_colliding(&piece.with_position(4, 17)));
    }

    #[test]
    fn test_fill_piece_sets_kind() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::T).with_position(0, 18);
        board.fill_piece(&piece);
        assert_eq!(board.cell(1, 18), Some(PieceKind::T));
        assert_eq!(board.cell(0, 19), Some(PieceKind::T));
        assert_eq!(board.cell(2, 19), Some(PieceKind::T));
        assert_eq!(board.cell(0, 18), None);
        assert_eq!(board.rows().iter().flatten().flatten().count(), 4);
    }

    #[test]
    fn test_fill_piece_skips_out_of_bounds_cells() {
        let mut board = Board::EMPTY;
        // I at x = -2 puts two of its four cells left of the wall
        let piece = Piece::new(PieceKind::I).with_position(-2, -1);
        board.fill_piece(&piece);
        assert_eq!(board.cell(0, 0), Some(PieceKind::I));
        assert_eq!(board.cell(1, 0), Some(PieceKind::I));
        assert_eq!(board.rows().iter().flatten().flatten().count(), 2);
    }

    #[test]
    fn test_clear_single_row_shifts_rows_above() {
        let mut board: Board = "\
            ...J......\n\
            ..LL......\n\
            ZZZZZZZZZZ\n\
            .S........"
            .parse()
            .unwrap();
        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[18]);

        let expected: Board = "\
            ...J......\n\
            ..LL......\n\
            .S........"
            .parse()
            .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_adjacent_rows_rescans_same_index() {
        let mut board: Board = "\
            O.........\n\
            IIIIIIIIII\n\
            IIIIIIIIII\n\
            .T........\n\
            JJJJJJJJJJ"
            .parse()
            .unwrap();
        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[19, 17, 16]);

        let expected: Board = "\
            O.........\n\
            .T........"
            .parse()
            .unwrap();
        assert_eq!(board, expected);
        assert!(board.clear_full_rows().is_empty());
    }

    #[test]
    fn test_clear_keeps_partial_rows() {
        let mut board: Board = "IIIIIIIII.".parse().unwrap();
        let before = board.clone();
        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_display_round_trip() {
        let board: Board = "\
            .......OO.\n\
            SZTIJLO..."
            .parse()
            .unwrap();
        let text = board.to_string();
        assert_eq!(text.lines().count(), Board::ROWS);
        assert_eq!(text.lines().last(), Some("SZTIJLO..."));
        assert_eq!(text.parse::<Board>().unwrap(), board);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "III".parse::<Board>(),
            Err(ParseBoardError::RowLength { row: 0, len: 3 })
        );
        assert_eq!(
            "IIIII#IIII".parse::<Board>(),
            Err(ParseBoardError::InvalidCell { row: 0, cell: '#' })
        );
        let too_tall = "..........\n".repeat(Board::ROWS + 1);
        assert_eq!(
            too_tall.parse::<Board>(),
            Err(ParseBoardError::TooManyRows(Board::ROWS + 1))
        );
    }
}
