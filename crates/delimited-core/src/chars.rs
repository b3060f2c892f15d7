//! Character classifiers used by the escape-sequence decoder.

/// True for `0`..=`7`.
#[inline]
pub fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

/// True for `0`..=`9`, `a`..=`f` and `A`..=`F`.
#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Numeric value of a hex digit; zero for anything else.
#[inline]
pub fn hex_digit_value(c: char) -> u32 {
    c.to_digit(16).unwrap_or(0)
}

/// True for ASCII decimal digits.
#[inline]
pub fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}
