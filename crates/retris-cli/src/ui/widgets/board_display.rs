use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use retris_engine::{Board, Piece};

use crate::ui::widgets::{Block, BlockDisplay};

type BlockGrid = [[Block; Board::COLS]; Board::ROWS];

/// The playfield: locked cells, then the ghost, then the falling piece on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn blocks(&self) -> BlockGrid {
        let mut grid = self.board.rows().map(|row| row.map(Block::from));
        if let Some(ghost) = self.ghost {
            fill(&mut grid, &ghost, Block::Ghost(ghost.kind()));
        }
        if let Some(piece) = self.falling_piece {
            fill(&mut grid, &piece, Block::Piece(piece.kind()));
        }
        grid
    }
}

/// Paints the piece's cells that lie inside the grid; cells above the top are skipped.
fn fill(grid: &mut BlockGrid, piece: &Piece, block: Block) {
    for (x, y) in piece.occupied_positions() {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
            && let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x))
        {
            *cell = block;
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..Board::COLS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..Board::ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ Board::ROWS }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Board::COLS }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.blocks()) {
            for (grid_cell, block) in iter::zip(grid_row, row) {
                BlockDisplay::from_block(block, true).render(grid_cell, buf);
            }
        }
    }
}
