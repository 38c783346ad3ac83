use thiserror::Error;
use tracing::trace;
use tracing::warn;

use crate::Coord;
use crate::parse_util;
use crate::parse_util::ParseError;
use crate::rules::RuleError;
use crate::rules::RuleSet;

/// Everything an RLE file says about its pattern, besides the cells themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Bounding box from the header line, `(width, height)`
    pub size: Option<(usize, usize)>,

    /// Rule from the header line, or from a `#r` line if the header has none
    pub rule: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Parse the RLE file format, calling `f(x, y)` for every live cell. `(0, 0)` is the top left
/// of the pattern and `y` grows downward.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &[u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(usize, usize),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws(bytes);

        let (Some(line), rest) = read_line_comment(bytes)? else {
            break;
        };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Rule { rule } => {
                file.rule = Some(rule);
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    if let (Some(header), rest) = read_line_header(bytes)? {
        file.size = Some((header.width, header.height));

        if let Some(rule) = header.rule {
            if file.rule.is_some_and(|r| r != rule) {
                warn!(%rule, "RLE header rule overrides the #r line");
            }

            file.rule = Some(rule);
        }

        bytes = rest;
    }

    let live = read_encoding(bytes, f)?;

    trace!(live, "Read RLE pattern");

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Rule { rule: RuleSet },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &[u8],
) -> Result<(Option<RleCommentLine<'_>>, &[u8]), RleCommentLineError> {
    let Ok(rest) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (line, rest) = parse_util::take_line(rest);
    let (Some(kind), line) = parse_util::take_1(line) else {
        return Err(RleCommentLineError::NoType);
    };
    let text = parse_util::take_ws(line).trim_ascii_end();

    let line = match kind {
        b'N' if text.is_empty() => return Err(RleCommentLineError::EmptyName),
        b'N' => RleCommentLine::Name { name: text },

        b'O' if text.is_empty() => return Err(RleCommentLineError::EmptyAuthor),
        b'O' => RleCommentLine::Author { author: text },

        b'r' => RleCommentLine::Rule {
            rule: parse_rule(text)?,
        },

        b'C' | b'c' => RleCommentLine::Comment,

        // Placement hints (#P, #R) only make sense for unbounded universes
        b => {
            trace!(kind = %(b as char), "Skipping RLE comment line");

            RleCommentLine::Comment
        }
    };

    Ok((Some(line), rest))
}

/// Parses a rule in either `B3/S23` form or the older `23/3` (survival/birth) form.
fn parse_rule(text: &[u8]) -> Result<RuleSet, RuleError> {
    let text = String::from_utf8_lossy(text);

    match text.split_once('/') {
        Some((s, b)) if s.bytes().all(|c| c.is_ascii_digit()) => format!("B{b}/S{s}").parse(),
        _ => text.parse(),
    }
}

struct RleHeaderLine {
    width: usize,
    height: usize,
    rule: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid token: expected ',' or end of line, found '{got}'")]
    InvalidToken { got: char },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a header line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if parse_util::expect(b'x', bytes).is_err() {
        return Ok((None, bytes));
    }

    let (line, rest) = parse_util::take_line(bytes);

    let (width, line) = read_assignment(b"x", line)?;
    let line = parse_util::expect(b',', parse_util::take_ws(line))?;
    let (height, line) = read_assignment(b"y", parse_util::take_ws(line))?;
    let line = parse_util::take_ws(line);

    let rule = match parse_util::take_1(line) {
        (None, _) => None,
        (Some(b','), line) => {
            let line = parse_util::expect_slice(b"rule", parse_util::take_ws(line))?;
            let line = parse_util::expect(b'=', parse_util::take_ws(line))?;

            Some(parse_rule(parse_util::take_ws(line).trim_ascii_end())?)
        }
        (Some(b), _) => return Err(RleHeaderLineError::InvalidToken { got: b as char }),
    };

    let header = RleHeaderLine {
        width,
        height,
        rule,
    };

    Ok((Some(header), rest))
}

/// Reads `<name> = <number>`
fn read_assignment<'a>(name: &[u8], bytes: &'a [u8]) -> Result<(usize, &'a [u8]), ParseError> {
    let bytes = parse_util::expect_slice(name, bytes)?;
    let bytes = parse_util::expect(b'=', parse_util::take_ws(bytes))?;
    let bytes = parse_util::take_ws(bytes);

    let (Some(n), bytes) = parse_util::take_while_fn(|b| b.is_ascii_digit(), bytes) else {
        return Err(ParseError::UnexpectedEof { exp: '0' });
    };

    Ok((parse_util::convert(n)?, bytes))
}

/// Patterns may not reach past the largest coordinate a [`Coord`] can hold.
pub const MAX_EXTENT: usize = Coord::MAX as usize + 1;

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF, the pattern must end with '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ParseError),

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Pattern runs past 65536 cells")]
    Overflow,
}

/// End of a run of `rep` cells starting at `pos`, if it stays within [`MAX_EXTENT`].
fn run_end(pos: usize, rep: usize) -> Result<usize, RleEncodingError> {
    pos.checked_add(rep)
        .filter(|&end| end <= MAX_EXTENT)
        .ok_or(RleEncodingError::Overflow)
}

/// Reads the run-length encoded cells. Returns the number of live cells.
fn read_encoding<F>(mut bytes: &[u8], mut f: F) -> Result<usize, RleEncodingError>
where
    F: FnMut(usize, usize),
{
    let mut rep: usize = 1;
    let (mut x, mut y) = (0, 0);
    let mut live = 0;

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            // End of input
            b'!' => break,

            // Digits are only ever followed by a tag, but a line may break in between
            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_while_fn(|b| b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };

                rep = parse_util::convert(n)?;
                bytes = rest;
                continue;
            }

            w if w.is_ascii_whitespace() => {}

            // Dead cells
            b'b' => x = run_end(x, rep)?,

            // Live cells
            b'o' => {
                if y >= MAX_EXTENT {
                    return Err(RleEncodingError::Overflow);
                }

                let end = run_end(x, rep)?;
                for cx in x..end {
                    f(cx, y);
                }

                x = end;
                live += rep;
            }

            // End of line
            b'$' => {
                y = run_end(y, rep)?;
                x = 0;
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }

        if !b.is_ascii_whitespace() {
            rep = 1;
        }

        let (_, rest) = parse_util::take_1(bytes);
        bytes = rest;
    }

    Ok(live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::B3S23;

    fn cells(bytes: &[u8]) -> (RleFile<'_>, Vec<(usize, usize)>) {
        let mut cells = Vec::new();
        let file = read_rle(bytes, |x, y| cells.push((x, y))).unwrap();

        (file, cells)
    }

    #[test]
    fn glider_with_header() {
        let bytes = b"#N Glider\n#O Richard K. Guy\n#C A comment\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";

        let (file, cells) = cells(bytes);

        assert_eq!(file.name, Some(b"Glider".as_slice()));
        assert_eq!(file.author, Some(b"Richard K. Guy".as_slice()));
        assert_eq!(file.size, Some((3, 3)));
        assert_eq!(file.rule, Some(B3S23));
        assert_eq!(cells, vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn bare_encoding() {
        let (file, cells) = cells(b"2o$2o!");

        assert_eq!(file, RleFile::default());
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn runs_of_blank_lines_and_line_breaks() {
        let (_, cells) = cells(b"x = 1, y = 4\no3$\no\r\n!");

        assert_eq!(cells, vec![(0, 0), (0, 3)]);
    }

    #[test]
    fn survival_birth_rule_comment() {
        let (file, _) = cells(b"#r 23/3\no!");

        assert_eq!(file.rule, Some(B3S23));
    }

    #[test]
    fn missing_terminator() {
        let err = read_rle(b"x = 1, y = 1\no", |_, _| {}).unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnexpectedEof)
        ));
    }

    #[test]
    fn unknown_cell_state() {
        let err = read_rle(b"2A!", |_, _| {}).unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnrecognizedByte { got: b'A' })
        ));
    }

    #[test]
    fn runs_may_not_overflow() {
        for bytes in [
            b"18446744073709551615b2o!".as_slice(),
            b"99999999999o!",
            b"18446744073709551615$o!",
            b"65536$o!",
        ] {
            let mut calls = 0;
            let err = read_rle(bytes, |_, _| calls += 1).unwrap_err();

            assert!(
                matches!(err, RleError::Encoding(RleEncodingError::Overflow)),
                "{}: {err}",
                String::from_utf8_lossy(bytes)
            );
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn runs_up_to_the_last_coordinate() {
        let (_, cells) = cells(b"65535bo$65534$o!");

        assert_eq!(cells, vec![(65535, 0), (0, 65535)]);
        assert!(read_rle(b"65535b2o!", |_, _| {}).is_err());
    }

    #[test]
    fn bad_header() {
        let err = read_rle(b"x = 3; y = 3\no!", |_, _| {}).unwrap_err();

        assert!(matches!(err, RleError::HeaderLine(_)));
    }

    #[test]
    fn birth_on_zero_is_rejected() {
        let err = read_rle(b"x = 1, y = 1, rule = B0/S8\no!", |_, _| {}).unwrap_err();

        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::InvalidRule(RuleError::BirthOnZero))
        ));
    }
}
