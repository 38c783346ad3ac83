use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected \"{exp}\", but got \"{got}\"")]
    UnexpectedSlice { exp: String, got: String },

    #[error("Failed to convert \"{str}\"")]
    Convert { str: String },
}

/// Consumes ascii whitespace, stopping at the first other byte.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Takes the next byte from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the byte
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    bytes.first().copied()
}

/// Expects the next byte in `bytes` to be `b`.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Expects `bytes` to start with `bs`.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> ParseResult<&'a [u8]> {
    match bytes.strip_prefix(bs) {
        Some(rest) => Ok(rest),
        None => {
            let n = bs.len().min(bytes.len());

            Err(ParseError::UnexpectedSlice {
                exp: String::from_utf8_lossy(bs).to_string(),
                got: String::from_utf8_lossy(&bytes[..n]).to_string(),
            })
        }
    }
}

/// Advance the slice while `p` holds. Returns `None` if nothing was taken.
pub fn take_while_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| !p(b)).unwrap_or(bytes.len());

    if i == 0 {
        (None, bytes)
    } else {
        let (res, bytes) = bytes.split_at(i);

        (Some(res), bytes)
    }
}

/// Splits off the current line, consuming its line break. A trailing `\r` is dropped from the
/// line.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    (line.strip_suffix(b"\r").unwrap_or(line), rest)
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> ParseResult<T> {
    let str = String::from_utf8_lossy(bytes);

    str.trim().parse::<T>().map_err(|_| ParseError::Convert {
        str: str.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_ws_full_ws() {
        assert_eq!(take_ws(b" \n\t"), b"");
    }

    #[test]
    fn take_line_strips_crlf() {
        let (line, rest) = take_line(b"#N glider\r\nbo$");

        assert_eq!(line, b"#N glider");
        assert_eq!(rest, b"bo$");
    }

    #[test]
    fn take_while_digits() {
        let (n, rest) = take_while_fn(|b| b.is_ascii_digit(), b"12o");

        assert_eq!(n, Some(b"12".as_slice()));
        assert_eq!(rest, b"o");
        assert_eq!(take_while_fn(|b| b.is_ascii_digit(), b"o").0, None);
    }

    #[test]
    fn expect_reports_the_token() {
        assert_eq!(
            expect(b'x', b"y"),
            Err(ParseError::UnexpectedToken { exp: 'x', got: 'y' })
        );
        assert_eq!(
            expect(b'x', b""),
            Err(ParseError::UnexpectedEof { exp: 'x' })
        );
        assert_eq!(expect_slice(b"rule", b"rule = B3/S23"), Ok(b" = B3/S23".as_slice()));
    }

    #[test]
    fn convert_numbers() {
        assert_eq!(convert::<usize>(b" 42 "), Ok(42));
        assert!(convert::<usize>(b"4x").is_err());
    }
}
