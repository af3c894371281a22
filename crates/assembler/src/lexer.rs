//! Tokenizer for IPPcode18 source lines.

/// The tokens of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Blank-separated words before any comment.
    pub tokens: Vec<&'a str>,
    /// Whether the line carried a `#` comment.
    pub comment: bool,
}

/// Tokenize a single line of source text.
///
/// Comments start with `#` and extend to end of line. Literals never
/// contain a raw `#` or blank; those are written as `\035` and `\032`.
pub(crate) fn tokenize_line(line: &str) -> Line<'_> {
    let (code, comment) = match line.find('#') {
        Some(pos) => (&line[..pos], true),
        None => (line, false),
    };

    Line {
        tokens: code.split_whitespace().collect(),
        comment,
    }
}
