//! Side-by-side diff of an actual order against a required order.
//!
//! An LCS-based edit script is computed first. Both columns are then
//! seeded with the actual lines and every delta is laid over them, keeping
//! the columns the same length at every step:
//! - `Insert` opens filler rows in both columns and writes the new lines on
//!   the right.
//! - `Change` marks the old lines on the left and writes the new ones on
//!   the right, opening rows when the replacement is longer and blanking
//!   right rows when it is shorter. A moved line becomes one `Change` over
//!   the lines it moved across.
//! - `Delete` marks the old lines on the left and blanks them on the right.
//!
//! Reading the non-filler rows of a column top to bottom (without their
//! markers) gives back the input sequence for that side.

use tracing::trace;

/// Separator between the two rendered columns.
pub const COLUMN_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    Insert,
    Delete,
    Change,
}

/// A contiguous run of lines in one of the two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub position: usize,
    pub len: usize,
}

impl Span {
    fn range(&self) -> std::ops::Range<usize> {
        self.position..self.position + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub kind: DeltaKind,
    pub original: Span,
    pub revised: Span,
}

/// Edit script turning `original` into `revised`, in position order.
///
/// Adjacent deletions and insertions collapse into one `Change`. A
/// deletion and an insertion separated only by common lines (a moved line)
/// also collapse into one `Change` spanning the whole region.
pub fn edit_script<S: AsRef<str>>(original: &[S], revised: &[S]) -> Vec<Delta> {
    let (n, m) = (original.len(), revised.len());
    // lcs[i][j]: longest common subsequence of original[i..] and revised[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if original[i].as_ref() == revised[j].as_ref() {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut deltas = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut run_i, mut run_j) = (0, 0);
    let flush = |i: usize, j: usize, run_i: usize, run_j: usize, deltas: &mut Vec<Delta>| {
        let original = Span { position: run_i, len: i - run_i };
        let revised = Span { position: run_j, len: j - run_j };
        let kind = match (original.len, revised.len) {
            (0, 0) => return,
            (_, 0) => DeltaKind::Delete,
            (0, _) => DeltaKind::Insert,
            _ => DeltaKind::Change,
        };
        deltas.push(Delta { kind, original, revised });
    };
    while i < n || j < m {
        if i < n && j < m && original[i].as_ref() == revised[j].as_ref() {
            flush(i, j, run_i, run_j, &mut deltas);
            i += 1;
            j += 1;
            run_i = i;
            run_j = j;
        } else if j == m || (i < n && lcs[i + 1][j] >= lcs[i][j + 1]) {
            i += 1;
        } else {
            j += 1;
        }
    }
    flush(i, j, run_i, run_j, &mut deltas);
    merge_moves(deltas)
}

fn merge_moves(deltas: Vec<Delta>) -> Vec<Delta> {
    let mut merged: Vec<Delta> = Vec::with_capacity(deltas.len());
    for delta in deltas {
        match merged.last_mut() {
            Some(prev)
                if matches!(
                    (prev.kind, delta.kind),
                    (DeltaKind::Delete, DeltaKind::Insert) | (DeltaKind::Insert, DeltaKind::Delete)
                ) =>
            {
                let original_end = delta.original.position + delta.original.len;
                let revised_end = delta.revised.position + delta.revised.len;
                *prev = Delta {
                    kind: DeltaKind::Change,
                    original: Span {
                        position: prev.original.position,
                        len: original_end - prev.original.position,
                    },
                    revised: Span {
                        position: prev.revised.position,
                        len: revised_end - prev.revised.position,
                    },
                };
            }
            _ => merged.push(delta),
        }
    }
    merged
}

/// Marker written in front of each column line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Unchanged,
    Deleted,
    Inserted,
}

impl Marker {
    pub fn prefix(self) -> &'static str {
        match self {
            Marker::Unchanged => "  ",
            Marker::Deleted => "- ",
            Marker::Inserted => "+ ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub marker: Marker,
    pub text: String,
}

impl Line {
    fn new(marker: Marker, text: &str) -> Self {
        Self {
            marker,
            text: text.to_string(),
        }
    }

    pub fn rendered(&self) -> String {
        format!("{}{}", self.marker.prefix(), self.text)
    }
}

/// A column row; `None` is filler.
pub type Cell = Option<Line>;

/// Two aligned columns: actual on the left, required on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBySide {
    left: Vec<Cell>,
    right: Vec<Cell>,
}

impl SideBySide {
    pub fn new<S: AsRef<str>>(actual: &[S], required: &[S]) -> Self {
        let deltas = edit_script(actual, required);
        let expansion: usize = deltas
            .iter()
            .filter(|d| d.kind != DeltaKind::Delete)
            .map(|d| d.revised.len.saturating_sub(d.original.len))
            .sum();
        let capacity = actual.len().max(required.len()) + expansion;

        let mut left: Vec<Cell> = Vec::with_capacity(capacity);
        left.extend(
            actual
                .iter()
                .map(|l| Some(Line::new(Marker::Unchanged, l.as_ref()))),
        );
        let mut right: Vec<Cell> = Vec::with_capacity(capacity);
        right.extend(left.iter().cloned());

        let mut offset = 0usize;
        for delta in &deltas {
            let at = delta.original.position + offset;
            let old = &actual[delta.original.range()];
            let new = &required[delta.revised.range()];
            trace!(kind = ?delta.kind, at, old = old.len(), new = new.len(), "apply delta");
            match delta.kind {
                DeltaKind::Insert => {
                    widen(&mut left, &mut right, at, new.len());
                    write(&mut right, at, Marker::Inserted, new);
                    offset += new.len();
                }
                DeltaKind::Change => {
                    write(&mut left, at, Marker::Deleted, old);
                    if new.len() > old.len() {
                        let grow = new.len() - old.len();
                        widen(&mut left, &mut right, at + old.len(), grow);
                        offset += grow;
                    }
                    write(&mut right, at, Marker::Inserted, new);
                    if new.len() < old.len() {
                        blank(&mut right, at + new.len()..at + old.len());
                    }
                }
                DeltaKind::Delete => {
                    write(&mut left, at, Marker::Deleted, old);
                    blank(&mut right, at..at + old.len());
                }
            }
            debug_assert_eq!(left.len(), right.len());
        }
        Self { left, right }
    }

    pub fn left(&self) -> &[Cell] {
        &self.left
    }

    pub fn right(&self) -> &[Cell] {
        &self.right
    }

    pub fn rows(&self) -> usize {
        self.left.len()
    }

    /// True when both columns contain no marked line.
    pub fn is_unchanged(&self) -> bool {
        self.left
            .iter()
            .chain(&self.right)
            .all(|c| matches!(c, Some(line) if line.marker == Marker::Unchanged))
    }

    /// Render both columns, padded to their widest line (or title), joined
    /// by `COLUMN_SEPARATOR`. With titles, a header and a rule line come
    /// first.
    pub fn render(&self, titles: Option<(&str, &str)>) -> String {
        let left = render_column(&self.left);
        let right = render_column(&self.right);
        let width = |lines: &[String], title: Option<&str>| {
            lines
                .iter()
                .map(|l| l.chars().count())
                .chain(title.map(|t| t.chars().count()))
                .max()
                .unwrap_or(0)
        };
        let lw = width(&left, titles.map(|t| t.0));
        let rw = width(&right, titles.map(|t| t.1));

        let mut out: Vec<String> = Vec::with_capacity(self.rows() + 2);
        if let Some((lt, rt)) = titles {
            out.push(format!("{:<lw$}{}{:<rw$}", lt, COLUMN_SEPARATOR, rt));
            out.push(format!(
                "{}{}{}",
                "-".repeat(lw),
                COLUMN_SEPARATOR.replace(' ', "-").replace('|', "+"),
                "-".repeat(rw)
            ));
        }
        for (l, r) in left.iter().zip(&right) {
            out.push(format!("{:<lw$}{}{:<rw$}", l, COLUMN_SEPARATOR, r));
        }
        out.join("\n")
    }
}

fn render_column(cells: &[Cell]) -> Vec<String> {
    cells
        .iter()
        .map(|c| c.as_ref().map(Line::rendered).unwrap_or_default())
        .collect()
}

fn widen(left: &mut Vec<Cell>, right: &mut Vec<Cell>, at: usize, rows: usize) {
    left.splice(at..at, std::iter::repeat(None).take(rows));
    right.splice(at..at, std::iter::repeat(None).take(rows));
}

fn write<S: AsRef<str>>(column: &mut [Cell], at: usize, marker: Marker, lines: &[S]) {
    for (cell, line) in column[at..at + lines.len()].iter_mut().zip(lines) {
        *cell = Some(Line::new(marker, line.as_ref()));
    }
}

fn blank(column: &mut [Cell], rows: std::ops::Range<usize>) {
    for cell in &mut column[rows] {
        *cell = None;
    }
}

/// Render the diff of `actual` against `required` under column titles.
pub fn side_by_side<S: AsRef<str>>(
    actual: &[S],
    required: &[S],
    left_title: &str,
    right_title: &str,
) -> String {
    SideBySide::new(actual, required).render(Some((left_title, right_title)))
}
