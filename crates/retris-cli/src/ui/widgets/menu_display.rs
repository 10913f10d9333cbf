use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Clear, Widget},
};

use crate::ui::widgets::style;

/// A vertical list of entries with one highlighted.
///
/// Entries are `(label, value)` pairs; the value is right-aligned when present.
#[derive(Debug)]
pub struct MenuDisplay<'a> {
    entries: Vec<(String, Option<String>)>,
    selected: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> MenuDisplay<'a> {
    pub fn new<I, S>(labels: I, selected: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            entries: labels
                .into_iter()
                .map(|label| (label.to_string(), None))
                .collect(),
            selected,
            block: None,
        }
    }

    /// Sets the value column, paired with the entries in order.
    pub fn values<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let entries = self
            .entries
            .into_iter()
            .zip(values)
            .map(|((label, _), value)| (label, value))
            .collect();
        Self { entries, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let content = self
            .entries
            .iter()
            .map(|(label, value)| label.len() + value.as_ref().map_or(0, |v| v.len() + 4))
            .max()
            .unwrap_or(0);
        u16::try_from(content + 4).unwrap_or(u16::MAX)
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.entries.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for MenuDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = Layout::vertical(self.entries.iter().map(|_| Constraint::Length(1))).split(area);
        for (i, ((label, value), area)) in self.entries.iter().zip(rows.iter()).enumerate() {
            let (marker, style) = if i == self.selected {
                ("> ", style::SELECTED)
            } else {
                ("  ", style::DEFAULT)
            };
            buf.set_style(*area, style);
            match value {
                Some(value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Length(u16::try_from(value.len() + 3).unwrap_or(u16::MAX)),
                    ]));
                    Line::styled(format!("{marker}{label}"), style).render(label_area, buf);
                    Line::styled(format!("< {value} >"), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
                None => {
                    Line::styled(format!("{marker}{label}"), style).render(*area, buf);
                }
            }
        }
    }
}
