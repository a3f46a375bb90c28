//! Console presentation: titled panels, key/value tables and notices.
//!
//! Everything is written to a generic `io::Write` so the recorder can be
//! pointed at stdout in the binary and at a byte buffer in tests. Colors use
//! crossterm styling and can be switched off entirely.

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Stdout, Write};

use crate::config;
use crate::outcome::{Marker, Outcome};

/// Color for an HTTP status in panel titles
pub fn status_color(status: u16) -> Color {
    match status {
        200..=299 => Color::Green,
        400..=499 => Color::Yellow,
        500..=599 => Color::Red,
        _ => Color::White,
    }
}

/// Pretty-print JSON with four-space indentation.
pub fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

/// One colored piece of a panel title
#[derive(Debug, Clone)]
pub struct Span {
    pub text: String,
    pub color: Option<Color>,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: true,
        }
    }
}

/// A row of a two-column table
#[derive(Debug, Clone)]
pub struct Row {
    pub key: String,
    pub value: String,
    pub color: Option<Color>,
}

impl Row {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Terminal renderer over any writer
#[derive(Debug)]
pub struct Console<W> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Console on stdout, colored unless `NO_COLOR` is set
    pub fn stdout() -> Self {
        Self::new(io::stdout(), config::get().output.color)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Panel for a recorded outcome: `"<description>: <glyph> HTTP <status>"`
    pub fn outcome(&mut self, description: &str, outcome: &Outcome) -> io::Result<()> {
        let title = [
            Span::plain(format!("{}: {} ", description, outcome.marker().glyph())),
            Span::colored(format!("HTTP {}", outcome.status()), status_color(outcome.status())),
        ];

        let lines = match outcome.content() {
            value @ (Value::Object(_) | Value::Array(_)) => numbered(&pretty_json(value)),
            Value::String(text) => text.lines().map(str::to_string).collect(),
            other => vec![other.to_string()],
        };

        self.panel(&title, Color::Blue, &lines)?;
        writeln!(self.out)
    }

    /// Boxed panel with a title in the top border
    pub fn panel(&mut self, title: &[Span], border: Color, lines: &[String]) -> io::Result<()> {
        let title_width: usize = title.iter().map(|s| width(&s.text)).sum();
        let body_width = lines.iter().map(|l| width(l)).max().unwrap_or(0);
        let inner = body_width.max(title_width + 2);

        let painted_title: String = title
            .iter()
            .map(|s| match s.color {
                Some(color) => paint(self.color, &s.text, color, s.bold),
                None => s.text.clone(),
            })
            .collect();

        let rule = "─".repeat(inner - title_width - 1);
        writeln!(
            self.out,
            "{} {} {}",
            paint(self.color, "╭─", border, false),
            painted_title,
            paint(self.color, &format!("{}╮", rule), border, false)
        )?;

        let side = paint(self.color, "│", border, false);
        for line in lines {
            let pad = " ".repeat(inner - width(line));
            writeln!(self.out, "{} {}{} {}", side, line, pad, side)?;
        }

        writeln!(
            self.out,
            "{}",
            paint(self.color, &format!("╰{}╯", "─".repeat(inner + 2)), border, false)
        )
    }

    /// Two-column table inside a titled panel
    pub fn table(&mut self, title: &str, header: (&str, &str), rows: &[Row]) -> io::Result<()> {
        let key_width = rows
            .iter()
            .map(|r| width(&r.key))
            .chain([width(header.0)])
            .max()
            .unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|r| width(&r.value))
            .chain([width(header.1)])
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format!(
            "{}{} │ {}",
            header.0,
            " ".repeat(key_width - width(header.0)),
            header.1
        ));
        lines.push(format!("{}─┼─{}", "─".repeat(key_width), "─".repeat(value_width)));
        for row in rows {
            lines.push(format!(
                "{}{} │ {}",
                row.key,
                " ".repeat(key_width - width(&row.key)),
                row.value
            ));
        }

        let width_all = lines.iter().map(|l| width(l)).max().unwrap_or(0);
        let painted: Vec<String> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let row = i.checked_sub(2).and_then(|r| rows.get(r));
                match row.and_then(|r| r.color.map(|c| (r, c))) {
                    Some((row, color)) => {
                        let prefix = &line[..line.len() - row.value.len()];
                        format!("{}{}", prefix, paint(self.color, &row.value, color, false))
                    }
                    None => line,
                }
            })
            .collect();

        self.boxed(title, &painted, width_all)
    }

    /// Tally line under a summary table
    pub fn tally(&mut self, total: usize, passed: usize, failed: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "Total: {}  {}  {}",
            total,
            paint(self.color, &format!("Passed: {}", passed), Color::Green, true),
            paint(self.color, &format!("Failed: {}", failed), Color::Red, true)
        )?;
        writeln!(self.out)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", paint(self.color, "Warning:", Color::Red, true), message)
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", paint(self.color, message, Color::Yellow, false))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn boxed(&mut self, title: &str, lines: &[String], inner: usize) -> io::Result<()> {
        let border = Color::Green;
        let title_width = width(title);
        let inner = inner.max(title_width + 2);
        let rule = "─".repeat(inner - title_width - 1);

        writeln!(
            self.out,
            "{}",
            paint(self.color, &format!("╭─ {} {}╮", title, rule), border, false)
        )?;
        let side = paint(self.color, "│", border, false);
        for line in lines {
            // Escape sequences take no columns
            let extra = " ".repeat(inner.saturating_sub(table_width(line)));
            writeln!(self.out, "{} {}{} {}", side, line, extra, side)?;
        }
        writeln!(
            self.out,
            "{}",
            paint(self.color, &format!("╰{}╯", "─".repeat(inner + 2)), border, false)
        )
    }
}

fn paint(enabled: bool, text: &str, color: Color, bold: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let styled = text.with(color);
    if bold {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}

fn numbered(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let digits = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>digits$} │ {}", i + 1, line, digits = digits))
        .collect()
}

/// Terminal columns taken by `text`
fn width(text: &str) -> usize {
    text.chars().map(columns).sum()
}

/// Width of a table line ignoring ANSI escape sequences
fn table_width(line: &str) -> usize {
    let mut count = 0;
    let mut in_escape = false;
    for c in line.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, c) => count += columns(c),
        }
    }
    count
}

/// Columns for one character: emoji presentation and East Asian wide
/// ranges take two, combining marks and variation selectors none.
fn columns(c: char) -> usize {
    match c as u32 {
        0x0300..=0x036F | 0x200B..=0x200F | 0xFE00..=0xFE0F => 0,
        0x1100..=0x115F
        | 0x231A..=0x231B
        | 0x23E9..=0x23EC
        | 0x23F0
        | 0x23F3
        | 0x25FD..=0x25FE
        | 0x2614..=0x2615
        | 0x2648..=0x2653
        | 0x267F
        | 0x2693
        | 0x26A1
        | 0x26AA..=0x26AB
        | 0x26BD..=0x26BE
        | 0x26C4..=0x26C5
        | 0x26CE
        | 0x26D4
        | 0x26EA
        | 0x26F2..=0x26F5
        | 0x26FA
        | 0x26FD
        | 0x2705
        | 0x270A..=0x270B
        | 0x2728
        | 0x274C
        | 0x274E
        | 0x2753..=0x2755
        | 0x2757
        | 0x2795..=0x2797
        | 0x27B0
        | 0x27BF
        | 0x2B1B..=0x2B1C
        | 0x2B50
        | 0x2B55
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD => 2,
        _ => 1,
    }
}

/// Text for a JSON value in a table cell; strings are shown bare.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Rows for a key/value info table
pub fn info_rows<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<Row>
where
    K: ToString,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| Row::new(k.to_string(), v.to_string()))
        .collect()
}

/// Row for a summary table
pub fn marker_row(description: &str, marker: Marker) -> Row {
    let color = match marker {
        Marker::Success => Color::Green,
        Marker::Failure => Color::Red,
    };
    Row::new(description, format!("{} {}", marker.glyph(), marker)).color(color)
}
