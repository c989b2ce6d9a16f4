//! Canonical lexical forms for numeric literals
//!
//! Decimal output is produced by rounding the shortest round-trip digit
//! string of the value rather than its exact binary expansion, so that
//! `5.000000005` rounds to `5.00000001` as a reader would expect.

/// Digits of a positive finite value: `0.d1d2d3... × 10^point`.
///
/// An empty digit vector represents zero.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits {
    digits: Vec<u8>,
    point: i64,
}

impl Digits {
    /// Shortest round-trip digits of `value.abs()`
    fn shortest(value: f64) -> Self {
        let sci = format!("{:e}", value.abs());
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exponent: i64 = exponent.parse().unwrap_or(0);
        let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
        while digits.last() == Some(&b'0') {
            digits.pop();
        }
        Self {
            digits,
            point: exponent + 1,
        }
    }

    /// Keep at most `keep` leading digits, rounding half away from zero
    fn round_to(mut self, keep: i64) -> Self {
        let len = self.digits.len() as i64;
        if keep >= len {
            return self;
        }
        if keep < 0 {
            self.digits.clear();
            return self;
        }

        let keep = keep as usize;
        let round_up = self.digits[keep] >= b'5';
        self.digits.truncate(keep);
        if round_up {
            let mut i = keep;
            loop {
                if i == 0 {
                    self.digits.insert(0, b'1');
                    self.point += 1;
                    break;
                }
                i -= 1;
                if self.digits[i] == b'9' {
                    self.digits[i] = b'0';
                } else {
                    self.digits[i] += 1;
                    break;
                }
            }
        }
        while self.digits.last() == Some(&b'0') {
            self.digits.pop();
        }
        self
    }

    fn to_decimal(&self, negative: bool) -> String {
        if self.digits.is_empty() {
            return "0.0".to_string();
        }

        let len = self.digits.len() as i64;
        let mut out = String::with_capacity(self.digits.len() + 4);
        if negative {
            out.push('-');
        }

        if self.point <= 0 {
            out.push('0');
        } else {
            let int_len = self.point.min(len) as usize;
            out.extend(self.digits[..int_len].iter().map(|&d| d as char));
            for _ in len..self.point {
                out.push('0');
            }
        }

        out.push('.');
        if self.point < 0 {
            for _ in 0..(-self.point) {
                out.push('0');
            }
            out.extend(self.digits.iter().map(|&d| d as char));
        } else if self.point < len {
            out.extend(self.digits[self.point as usize..].iter().map(|&d| d as char));
        } else {
            out.push('0');
        }
        out
    }
}

/// Canonical `xsd:decimal` lexical form, or `None` for NaN and infinities.
///
/// `max_precision` caps significant digits (0 means no cap) and
/// `max_frac_digits` caps digits after the decimal point.
pub(crate) fn decimal_lexical(value: f64, max_precision: u32, max_frac_digits: u32) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0.0".to_string());
    }

    let digits = Digits::shortest(value);
    let mut keep = digits.point + i64::from(max_frac_digits);
    if max_precision > 0 {
        keep = keep.min(i64::from(max_precision));
    }
    Some(digits.round_to(keep).to_decimal(value < 0.0))
}

/// Insert a `.0` into a mantissa without a fractional part (`1E0` -> `1.0E0`)
fn with_fraction(sci: String) -> String {
    match sci.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => sci,
    }
}

fn special_lexical(nan: bool, infinite: bool, negative: bool) -> Option<String> {
    if nan {
        Some("NaN".to_string())
    } else if infinite {
        Some(if negative { "-INF" } else { "INF" }.to_string())
    } else {
        None
    }
}

/// Canonical `xsd:double` lexical form (`12.34` -> `1.234E1`)
pub(crate) fn double_lexical(value: f64) -> String {
    special_lexical(value.is_nan(), value.is_infinite(), value < 0.0)
        .unwrap_or_else(|| with_fraction(format!("{:E}", value)))
}

/// Canonical `xsd:float` lexical form (`234.5` -> `2.345E2`)
pub(crate) fn float_lexical(value: f32) -> String {
    special_lexical(value.is_nan(), value.is_infinite(), value < 0.0)
        .unwrap_or_else(|| with_fraction(format!("{:E}", value)))
}

/// Parse a leading floating point number from `s`, `strtod`-style.
///
/// Accepts leading whitespace, an optional sign, `NaN`, `INF`, and decimal
/// or scientific notation. Returns the value and the number of bytes
/// consumed; `(0.0, 0)` if no number could be read.
pub fn parse_double(s: &str) -> (f64, usize) {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if let Some(word) = bytes.get(i..i + 3) {
        if word.eq_ignore_ascii_case(b"nan") {
            return (f64::NAN, i + 3);
        }
        if word.eq_ignore_ascii_case(b"inf") {
            let value = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
            return (value, i + 3);
        }
    }

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut n_digits = i - digits_start;
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        n_digits += j - frac_start;
        if n_digits > 0 {
            i = j;
        }
    }
    if n_digits == 0 {
        return (0.0, 0);
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    match s[start..i].parse::<f64>() {
        Ok(value) => (value, i),
        Err(_) => (0.0, 0),
    }
}
