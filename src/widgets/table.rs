use std::{fmt::Display, marker::PhantomData};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Text,
    widgets::{Row, StatefulWidget, Table, Widget},
};

use color_eyre::eyre::bail;
use color_eyre::Result;

use super::misc::COLUMN_SPACING;

pub trait GenericTableState<C>
where
    C: Copy + Display + PartialEq + Sized,
{
    fn nrows(&self) -> usize;

    fn columns(&self) -> &[C];

    /// Returns the text object for a given row and column
    fn text<'a>(&self, row: usize, column: C) -> Text<'a>;
}

/// Table sized to fit its contents, with a header row of column names
#[derive(Debug, Default)]
pub struct GenericTable<C, S>
where
    C: Copy + Display + PartialEq + Sized,
    S: GenericTableState<C>,
{
    c: PhantomData<C>,
    s: PhantomData<S>,
}

impl<C, S> GenericTable<C, S>
where
    C: Copy + Display + PartialEq + Sized,
    S: GenericTableState<C>,
{
    pub fn new() -> Self {
        Self {
            c: PhantomData,
            s: PhantomData,
        }
    }

    /// Width of the widest of the header and every cell in `column`
    fn width(state: &S, column: C) -> usize {
        let mut width = column.to_string().chars().count();
        for row in 0..state.nrows() {
            width = state.text(row, column).width().max(width);
        }

        width
    }

    fn widths(state: &S) -> Vec<u16> {
        state
            .columns()
            .iter()
            .map(|c| Self::width(state, *c).min(u16::MAX as usize) as u16)
            .collect()
    }

    /// Returns the area required to draw the header and every row. Tables
    /// are limited to `u16::MAX` lines and columns of text.
    pub fn area(state: &S) -> Result<Rect> {
        let spacing = state.columns().len().saturating_sub(1) * COLUMN_SPACING as usize;
        let width = state
            .columns()
            .iter()
            .map(|c| Self::width(state, *c))
            .sum::<usize>()
            + spacing;
        let height = state.nrows() + 1;

        match (u16::try_from(width), u16::try_from(height)) {
            (Ok(width), Ok(height)) => Ok(Rect::new(0, 0, width, height)),
            (Err(_), _) => bail!("table is too wide to display ({} columns)", width),
            (_, Err(_)) => bail!("table has too many rows to display ({})", height - 1),
        }
    }
}

impl<C, S> StatefulWidget for GenericTable<C, S>
where
    C: Copy + Display + PartialEq + Sized,
    S: GenericTableState<C>,
{
    type State = S;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let constraints = Self::widths(state)
            .into_iter()
            .map(Constraint::Length)
            .collect::<Vec<_>>();

        let columns = state.columns();
        let rows = (0..state.nrows())
            .map(|idx| Row::new(columns.iter().map(|&c| state.text(idx, c))))
            .collect::<Vec<_>>();

        let header = Row::new(columns.iter().map(|c| c.to_string()));

        Widget::render(
            Table::new(rows, constraints)
                .column_spacing(COLUMN_SPACING)
                .header(header),
            area,
            buf,
        );
    }
}
