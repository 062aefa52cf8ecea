//! Rebuilds the record hierarchy that GEDCOM encodes with level numbers.
//!
//! The builder keeps an explicit stack of open records, one per level, instead of recursing.
//! A record is attached to its parent when it closes, which happens when a later line arrives
//! at the same or a shallower level, or when input ends. Because siblings always close in file
//! order, children end up in file order too.

use serde::Serialize;

use super::{diagnostic::ParseDiagnostic, line::Line};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xref_id: Option<String>,
    pub value: String,
    /// Effective depth in the tree; equals the declared level unless a jump was clamped.
    pub level: usize,
    pub line_number: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Record>,
}

impl Record {
    fn open(line: Line, level: usize) -> Self {
        Record {
            tag: line.tag,
            xref_id: line.xref_id,
            value: line.payload,
            level,
            line_number: line.line_number,
            children: Vec::new(),
        }
    }

    /// First direct child with `tag`.
    pub fn child(&self, tag: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Value of the first direct child with `tag`, if that value is non-empty.
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag)
            .map(|c| c.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Depth-first `(level, tag, value)` sequence of this record and everything below it.
    pub fn flatten(&self) -> Vec<(usize, &str, &str)> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(record) = stack.pop() {
            out.push((record.level, record.tag.as_str(), record.value.as_str()));
            stack.extend(record.children.iter().rev());
        }
        out
    }

    /// Number of levels in this subtree, counting this record.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((record, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(record.children.iter().map(|c| (c, depth + 1)));
        }
        max
    }
}

/// Builds the forest of root records from an ordered sequence of lines.
///
/// Returns the roots plus one [`ParseDiagnostic::LevelJump`] for each line that was more than
/// one level deeper than the currently open record. Such lines are attached to the top of the
/// stack, as if their level were `parent + 1`.
pub fn build_records<I>(lines: I) -> (Vec<Record>, Vec<ParseDiagnostic>)
where
    I: IntoIterator<Item = Line>,
{
    let mut roots: Vec<Record> = Vec::new();
    let mut diagnostics = Vec::new();
    // stack[n] is the open record at depth n
    let mut stack: Vec<Record> = Vec::new();

    for line in lines {
        let effective = line.level.min(stack.len());
        if effective != line.level {
            tracing::warn!(
                "[build_records] line {} jumps to level {} under depth {}; attaching at {}",
                line.line_number,
                line.level,
                stack.len(),
                effective
            );
            diagnostics.push(ParseDiagnostic::LevelJump {
                line_number: line.line_number,
                declared: line.level,
                effective,
            });
        }

        while stack.len() > effective {
            close_top(&mut stack, &mut roots);
        }
        stack.push(Record::open(line, effective));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    (roots, diagnostics)
}

fn close_top(stack: &mut Vec<Record>, roots: &mut Vec<Record>) {
    if let Some(record) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(record),
            None => roots.push(record),
        }
    }
}
