//! Paginated nail listing to follow while threading by hand.

use std::fmt::Write;

use crate::{nails, Channel, Sequence};

pub const TITLE: &str = "String Art";
pub const NAILS_PER_ROW: usize = 10;
/// Rows fitting under the title on the first letter page.
pub const FIRST_PAGE_ROWS: usize = 45;
/// Rows fitting on every later page.
pub const ROWS_PER_PAGE: usize = 47;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// Strand colour of the nails in this row.
    pub channel: Option<Channel>,
    /// Whether the row opens a colour group and carries its initial.
    pub marked: bool,
    pub nails: Vec<String>,
}

impl Row {
    pub fn is_spacer(&self) -> bool {
        self.nails.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pages: Vec<Page>,
}

impl Report {
    /// Lays `sequence` out in rows and pages. Every colour group starts on a
    /// new row below a blank one.
    pub fn new(sequence: &Sequence) -> Self {
        let mut report = Self::default();
        let steps = sequence.steps();
        for (channel, range) in sequence.channel_groups() {
            if channel.is_some() {
                report.push_row(Row::default());
            }
            for (chunk_idx, chunk) in steps[range].chunks(NAILS_PER_ROW).enumerate() {
                report.push_row(Row {
                    channel,
                    marked: channel.is_some() && chunk_idx == 0,
                    nails: chunk.iter().map(|step| nails::label(step.nail)).collect(),
                });
            }
        }
        report
    }

    /// Appends `row`, opening a new page when the last one is full. A spacer
    /// never opens a page after the first.
    fn push_row(&mut self, row: Row) {
        let capacity = match self.pages.len() {
            1 => FIRST_PAGE_ROWS,
            _ => ROWS_PER_PAGE,
        };
        let needs_page = self
            .pages
            .last()
            .map_or(true, |page| page.rows.len() >= capacity);
        if needs_page {
            if row.is_spacer() && !self.pages.is_empty() {
                return;
            }
            self.pages.push(Page::default());
        }
        if let Some(page) = self.pages.last_mut() {
            page.rows.push(row);
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{TITLE}");
        let page_count = self.pages.len();
        for (idx, page) in self.pages.iter().enumerate() {
            let _ = writeln!(text, "\n-- page {} of {} --", idx + 1, page_count);
            for row in &page.rows {
                if row.is_spacer() {
                    text.push('\n');
                    continue;
                }
                match (row.channel, row.marked) {
                    (Some(channel), true) => {
                        let _ = write!(text, "{}  ", channel.initial());
                    }
                    (Some(_), false) => text.push_str("   "),
                    (None, _) => {}
                }
                for nail in &row.nails {
                    let _ = write!(text, "{nail:<6}");
                }
                let trimmed = text.trim_end_matches(' ').len();
                text.truncate(trimmed);
                text.push('\n');
            }
        }
        text
    }
}
