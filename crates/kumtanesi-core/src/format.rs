//! Lightweight message formatting.
//!
//! Message content is turned into lines of styled segments instead of markup,
//! so untrusted text can never inject elements into the surface. Three rules are
//! applied in order, each one pass left to right over what the previous pass
//! left behind: `**strong**`, `*emphasis*`, `` `code` ``. Matching is lazy and
//! non-overlapping, delimiters are consumed, and a span may cross a line break.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedLine {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedMessage {
    pub lines: Vec<FormattedLine>,
}

type Cell = (char, SpanStyle);

/// Format message content into styled lines
pub fn format_message(text: &str) -> FormattedMessage {
    let cells: Vec<Cell> = text.chars().map(|c| (c, SpanStyle::default())).collect();

    let cells = apply_rule(cells, &['*', '*'], |s| s.strong = true);
    let cells = apply_rule(cells, &['*'], |s| s.emphasis = true);
    let cells = apply_rule(cells, &['`'], |s| s.code = true);

    let mut lines = Vec::new();
    let mut current = FormattedLine::default();

    for (c, style) in cells {
        if c == '\n' {
            lines.push(std::mem::take(&mut current));
            continue;
        }
        match current.segments.last_mut() {
            Some(last) if last.style == style => last.text.push(c),
            _ => current.segments.push(Segment {
                text: c.to_string(),
                style,
            }),
        }
    }
    lines.push(current);

    FormattedMessage { lines }
}

/// Run one delimiter rule over the cells, marking enclosed text with `mark`
fn apply_rule(cells: Vec<Cell>, delim: &[char], mark: impl Fn(&mut SpanStyle)) -> Vec<Cell> {
    let n = delim.len();
    let mut out = Vec::with_capacity(cells.len());
    let mut i = 0;

    while i < cells.len() {
        if !delim_at(&cells, i, delim) {
            out.push(cells[i]);
            i += 1;
            continue;
        }

        let close = (i + n..cells.len()).find(|&j| delim_at(&cells, j, delim));
        match close {
            Some(close) => {
                for &(c, mut style) in &cells[i + n..close] {
                    mark(&mut style);
                    out.push((c, style));
                }
                i = close + n;
            }
            None => {
                // Without a closer here there is none further on either
                out.extend_from_slice(&cells[i..]);
                break;
            }
        }
    }

    out
}

fn delim_at(cells: &[Cell], at: usize, delim: &[char]) -> bool {
    cells.len() >= at + delim.len()
        && cells[at..at + delim.len()]
            .iter()
            .zip(delim)
            .all(|((c, _), d)| c == d)
}

impl FormattedMessage {
    /// Text with all styling dropped, lines joined with `\n`
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.segments.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML rendition with every piece of content escaped
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                html.push_str("<br>");
            }
            for segment in &line.segments {
                let style = segment.style;
                if style.strong {
                    html.push_str("<strong>");
                }
                if style.emphasis {
                    html.push_str("<em>");
                }
                if style.code {
                    html.push_str("<code>");
                }
                html.push_str(&escape_html(&segment.text));
                if style.code {
                    html.push_str("</code>");
                }
                if style.emphasis {
                    html.push_str("</em>");
                }
                if style.strong {
                    html.push_str("</strong>");
                }
            }
        }

        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
