//! Inline markup for narrative text: `[label](url)` links and `$...$` math.

/// A run of inline content.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    Link { label: String, url: String },
}

/// A paragraph is a sequence of spans.
pub type Paragraph = Vec<Span>;

/// Split text into paragraphs on blank lines, then parse each one.
pub fn paragraphs(text: &str) -> Vec<Paragraph> {
    let mut out = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                out.push(parse_inline(&current));
            }
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.trim().is_empty() {
        out.push(parse_inline(&current));
    }
    out
}

/// Parse one paragraph. Line breaks and runs of whitespace collapse to one space.
pub fn parse_inline(text: &str) -> Paragraph {
    let text = collapse_whitespace(&render_math(text));
    let mut spans = Vec::new();
    let mut rest = text.as_str();

    while let Some(open) = rest.find('[') {
        let Some((label, url, consumed)) = parse_link(&rest[open..]) else {
            // Not a link: keep the bracket as text and continue after it
            push_text(&mut spans, &rest[..=open]);
            rest = &rest[open + 1..];
            continue;
        };
        push_text(&mut spans, &rest[..open]);
        spans.push(Span::Link { label, url });
        rest = &rest[open + consumed..];
    }
    push_text(&mut spans, rest);

    // Trim the outer edges only
    if let Some(Span::Text(first)) = spans.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Span::Text(last)) = spans.last_mut() {
        *last = last.trim_end().to_string();
    }
    spans.retain(|s| !matches!(s, Span::Text(t) if t.is_empty()));
    spans
}

/// `[label](url)` at the start of `text`: label, url and bytes consumed.
fn parse_link(text: &str) -> Option<(String, String, usize)> {
    let close = text.find(']')?;
    let after = &text[close + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let end = after.find(')')?;
    let label = text[1..close].trim().to_string();
    let url = after[1..end].trim().to_string();
    if label.is_empty() || url.is_empty() {
        return None;
    }
    Some((label, url, close + 1 + end + 1))
}

/// Replace `$...$` expressions with plain symbols.
fn render_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut parts = text.split('$');
    if let Some(head) = parts.next() {
        out.push_str(head);
    }
    let mut in_math = true;
    for part in parts {
        if in_math {
            out.push_str(&math_symbols(part));
        } else {
            out.push_str(part);
        }
        in_math = !in_math;
    }
    out
}

fn math_symbols(expr: &str) -> String {
    expr.replace("\\degree", "°")
        .replace("\\circ", "°")
        .replace("\\times", "×")
        .replace("\\approx", "≈")
        .replace(['{', '}', '^'], "")
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(Span::Text(prev)) => prev.push_str(text),
        _ => spans.push(Span::Text(text.to_string())),
    }
}
