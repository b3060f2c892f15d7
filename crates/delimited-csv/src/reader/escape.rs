//! Escape sequence decoding
//!
//! Called with the cursor just past the escape character. Supported forms:
//!
//! | Input | Meaning |
//! |-------|---------|
//! | `a b e f n r t v` | BEL, BS, ESC, FF, LF, CR, TAB, VT |
//! | `uXXXX`, `UXXXX` | up to 4 hex digits |
//! | `0xHH` | up to 2 hex digits |
//! | `0OOO` | `0` followed by up to 3 octal digits |
//! | `0` | NUL |
//! | `DDD` | up to 3 decimal digits, first digit not `0` |
//! | anything else | that character |

use std::io;

use delimited_core::chars::{hex_digit_value, is_decimal_digit, is_hex_digit, is_octal_digit};

use super::buffer::CharBuffer;

/// Result of decoding one escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escape {
    Char(char),
    /// A numeric escape whose value is not a Unicode scalar value
    Invalid(u32),
    /// Nothing followed the escape character
    EndOfStream,
}

pub(crate) fn decode(buf: &mut CharBuffer) -> io::Result<Escape> {
    let Some(c) = buf.current()? else {
        return Ok(Escape::EndOfStream);
    };

    if let Some(named) = named_escape(c) {
        buf.advance()?;
        return Ok(Escape::Char(named));
    }

    match c {
        'u' | 'U' => {
            buf.advance()?;
            let (value, digits) = take_digits(buf, 4, 16, is_hex_digit)?;
            if digits == 0 {
                Ok(Escape::Char(c))
            } else {
                Ok(code_point(value))
            }
        }
        '0' => {
            buf.advance()?;
            match buf.current()? {
                Some('x') => {
                    buf.advance()?;
                    let (value, _) = take_digits(buf, 2, 16, is_hex_digit)?;
                    Ok(code_point(value))
                }
                Some(d) if is_octal_digit(d) => {
                    let (value, _) = take_digits(buf, 3, 8, is_octal_digit)?;
                    Ok(code_point(value))
                }
                _ => Ok(Escape::Char('\0')),
            }
        }
        d if is_decimal_digit(d) => {
            let (value, _) = take_digits(buf, 3, 10, is_decimal_digit)?;
            Ok(code_point(value))
        }
        other => {
            buf.advance()?;
            Ok(Escape::Char(other))
        }
    }
}

fn named_escape(c: char) -> Option<char> {
    let decoded = match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'e' => '\u{1b}',
        'f' => '\u{0c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0b}',
        _ => return None,
    };
    Some(decoded)
}

/// Consume up to `max` digits accepted by `accept`, returning the value and
/// the number of digits consumed
fn take_digits(
    buf: &mut CharBuffer,
    max: usize,
    radix: u32,
    accept: fn(char) -> bool,
) -> io::Result<(u32, usize)> {
    let mut value = 0u32;
    let mut count = 0;
    while count < max {
        match buf.current()? {
            Some(c) if accept(c) => {
                let digit = match radix {
                    16 => hex_digit_value(c),
                    _ => c.to_digit(radix).unwrap_or(0),
                };
                value = value * radix + digit;
                buf.advance()?;
                count += 1;
            }
            _ => break,
        }
    }
    Ok((value, count))
}

fn code_point(value: u32) -> Escape {
    match char::from_u32(value) {
        Some(c) => Escape::Char(c),
        None => Escape::Invalid(value),
    }
}
