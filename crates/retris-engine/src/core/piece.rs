use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::board::Board;

/// Side length of the square mask every piece shape is stored in.
pub const MASK_SIZE: usize = 4;

/// Row every piece spawns on.
pub const SPAWN_Y: i32 = 0;

/// Offsets tried in order when a rotated mask collides in place.
const WALL_KICKS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1)];

/// Extra offsets tried for the I-piece after [`WALL_KICKS`] fail.
const I_PIECE_KICKS: [(i32, i32); 3] = [(-2, 0), (2, 0), (0, -2)];

/// A falling piece: a 4×4 mask placed on the board at `(x, y)`.
///
/// `(x, y)` is the board coordinate of the mask's top-left cell. Either may be
/// negative while the search tries the piece near the walls or the top edge.
///
/// Movement and rotation return new `Piece` values; nothing here mutates the board.
///
/// # Example
///
/// ```
/// use retris_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!(piece.position(), (3, 0));
///
/// let rotated = piece.rotated(&board).unwrap();
/// assert_eq!(rotated.position(), piece.position());
///
/// let landed = rotated.dropped(&board);
/// assert_eq!(landed.y(), rotated.drop_row(&board));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    mask: PieceMask,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece of `kind` in its spawn orientation at its spawn position.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            mask: kind.spawn_mask(),
            x: kind.spawn_x(),
            y: SPAWN_Y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> &PieceMask {
        &self.mask
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns the same piece (same mask) moved to `(x, y)`.
    #[must_use]
    pub fn with_position(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Returns the same piece (same mask) moved back to its spawn position.
    #[must_use]
    pub fn at_spawn(self) -> Self {
        self.with_position(self.kind.spawn_x(), SPAWN_Y)
    }

    #[must_use]
    pub fn moved(self, dx: i32, dy: i32) -> Self {
        self.with_position(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn left(self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(self) -> Self {
        self.moved(0, 1)
    }

    /// Board coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.mask
            .occupied_cells()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Returns the piece with its mask turned 90° clockwise, without kicks.
    ///
    /// The O-piece is returned unchanged.
    #[must_use]
    pub fn rotated_in_place(self) -> Self {
        if self.kind == PieceKind::O {
            return self;
        }
        Self {
            mask: self.mask.rotated_clockwise(),
            ..self
        }
    }

    /// Rotates clockwise, trying the wall-kick offsets in priority order.
    ///
    /// Returns `None` when every offset collides; the caller keeps the original piece.
    /// The O-piece always succeeds and comes back unchanged.
    #[must_use]
    pub fn rotated(self, board: &Board) -> Option<Self> {
        if self.kind == PieceKind::O {
            return Some(self);
        }
        let rotated = self.rotated_in_place();
        let i_kicks: &[(i32, i32)] = if self.kind == PieceKind::I {
            &I_PIECE_KICKS
        } else {
            &[]
        };
        [(0, 0)]
            .iter()
            .chain(&WALL_KICKS)
            .chain(i_kicks)
            .map(|&(dx, dy)| rotated.moved(dx, dy))
            .find(|candidate| !board.is_colliding(candidate))
    }

    /// Returns the lowest collision-free row reachable by moving straight down.
    ///
    /// Starts from the current row, so a piece that already collides gets its own row back.
    #[must_use]
    pub fn drop_row(&self, board: &Board) -> i32 {
        let mut piece = *self;
        loop {
            let below = piece.down();
            if board.is_colliding(&below) {
                return piece.y;
            }
            piece = below;
        }
    }

    /// Returns the piece moved to [`Self::drop_row`] (the hard-drop target).
    #[must_use]
    pub fn dropped(self, board: &Board) -> Self {
        self.with_position(self.x, self.drop_row(board))
    }
}

/// Occupancy mask of a piece in one orientation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceMask([[bool; MASK_SIZE]; MASK_SIZE]);

impl PieceMask {
    const fn from_rows(rows: [&[u8; MASK_SIZE]; 2]) -> Self {
        let mut cells = [[false; MASK_SIZE]; MASK_SIZE];
        let mut y = 0;
        while y < rows.len() {
            let mut x = 0;
            while x < MASK_SIZE {
                cells[y][x] = rows[y][x] == b'#';
                x += 1;
            }
            y += 1;
        }
        Self(cells)
    }

    /// Returns whether the mask cell at column `x`, row `y` is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.0[y][x]
    }

    /// Turns the mask 90° clockwise: `new[i][j] = old[3 - j][i]`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let mut cells = [[false; MASK_SIZE]; MASK_SIZE];
        for (i, row) in cells.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.0[MASK_SIZE - 1 - j][i];
            }
        }
        Self(cells)
    }

    /// Mask-relative `(column, row)` of every occupied cell, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.0.iter().zip(0..).flat_map(|(row, y)| {
            row.iter()
                .zip(0..)
                .filter(|(occupied, _)| **occupied)
                .map(move |(_, x)| (x, y))
        })
    }
}

impl fmt::Debug for PieceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.0.map(|row| row.map(|cell| if cell { '#' } else { '.' }));
        f.debug_list()
            .entries(rows.iter().map(|row| row.iter().collect::<String>()))
            .finish()
    }
}

/// RGB color associated with a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The seven canonical piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Allows generating random `PieceKind` values using the standard random distribution.
///
/// Every kind is equally likely.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    pub const LEN: usize = 7;
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    #[must_use]
    pub const fn spawn_mask(self) -> PieceMask {
        match self {
            PieceKind::I => PieceMask::from_rows([b"....", b"####"]),
            PieceKind::O => PieceMask::from_rows([b"##..", b"##.."]),
            PieceKind::T => PieceMask::from_rows([b".#..", b"###."]),
            PieceKind::S => PieceMask::from_rows([b".##.", b"##.."]),
            PieceKind::Z => PieceMask::from_rows([b"##..", b".##."]),
            PieceKind::J => PieceMask::from_rows([b"#...", b"###."]),
            PieceKind::L => PieceMask::from_rows([b"..#.", b"###."]),
        }
    }

    /// Column the mask's left edge spawns at.
    #[must_use]
    pub const fn spawn_x(self) -> i32 {
        match self {
            PieceKind::O => 4,
            _ => 3,
        }
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::rgb(102, 191, 255),
            PieceKind::O => PieceColor::rgb(253, 249, 0),
            PieceKind::T => PieceColor::rgb(200, 122, 255),
            PieceKind::S => PieceColor::rgb(0, 228, 48),
            PieceKind::Z => PieceColor::rgb(230, 41, 55),
            PieceKind::J => PieceColor::rgb(0, 121, 241),
            PieceKind::L => PieceColor::rgb(255, 161, 0),
        }
    }
}
