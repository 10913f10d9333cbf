use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use retris_engine::{MASK_SIZE, PieceKind};

use crate::ui::widgets::{Block, BlockDisplay};

/// Preview of a piece kind in its spawn orientation (NEXT and HOLD panels).
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            dimmed: false,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    /// Draws the piece as an outline, e.g. while hold is spent.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Occupied mask cells of `kind`, shifted so the bounding box starts at `(0, 0)`,
/// along with the bounding box size in cells.
fn trimmed_cells(kind: PieceKind) -> (Vec<(usize, usize)>, (u16, u16)) {
    let mask = kind.spawn_mask();
    let cells: Vec<(usize, usize)> = (0..MASK_SIZE)
        .flat_map(|y| (0..MASK_SIZE).map(move |x| (x, y)))
        .filter(|&(x, y)| mask.is_occupied(x, y))
        .collect();
    let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
    let max_x = cells.iter().map(|c| c.0).max().unwrap_or(0);
    let max_y = cells.iter().map(|c| c.1).max().unwrap_or(0);
    let cells = cells
        .into_iter()
        .map(|(x, y)| (x - min_x, y - min_y))
        .collect();
    let size = (
        u16::try_from(max_x - min_x + 1).unwrap_or(0),
        u16::try_from(max_y - min_y + 1).unwrap_or(0),
    );
    (cells, size)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::from_block(Block::Empty, false);
        Widget::render(&empty_block, area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (width, height)) = trimmed_cells(piece);
        let piece_area = area.centered(
            Constraint::Length(width * BlockDisplay::width()),
            Constraint::Length(height * BlockDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows: Vec<Vec<Rect>> = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect();

        let occupied_block = if self.dimmed {
            BlockDisplay::from_block(Block::Ghost(piece), false)
        } else {
            BlockDisplay::from_block(Block::Piece(piece), false)
        };
        for (x, y) in cells {
            if let Some(&cell) = grid_rows.get(y).and_then(|row| row.get(x)) {
                Widget::render(&occupied_block, cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_sizes() {
        assert_eq!(trimmed_cells(PieceKind::I).1, (4, 1));
        assert_eq!(trimmed_cells(PieceKind::O).1, (2, 2));
        assert_eq!(trimmed_cells(PieceKind::T).1, (3, 2));
        let (cells, _) = trimmed_cells(PieceKind::I);
        assert_eq!(cells, [(0, 0), (1, 0), (2, 0), (3, 0)]);
    }
}
