//! Fixed-point decimal for `xs:decimal` values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Largest number of significant digits accepted
const MAX_DIGITS: usize = 28;

/// Exact decimal number: `mantissa * 10^-scale`.
///
/// Always normalised (no trailing fractional zeros) so that numerically equal
/// values compare and hash equal. Serialized as its lexical form so that
/// deserialization goes through [`SifDecimal::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SifDecimal {
    mantissa: i128,
    scale: u32,
}

impl SifDecimal {
    /// `scale` must not exceed 28.
    pub fn new(mantissa: i128, scale: u32) -> Self {
        let mut d = Self { mantissa, scale };
        d.normalize();
        d
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn normalize(&mut self) {
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        if self.mantissa == 0 {
            self.scale = 0;
        }
    }

    /// Integral value, if this decimal has no fractional part.
    pub fn to_integer(&self) -> Option<i128> {
        (self.scale == 0).then_some(self.mantissa)
    }

    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Parse `[-+]digits[.digits]`.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("no digits".to_string());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err("not a decimal number".to_string());
        }
        if frac_part.len() > MAX_DIGITS {
            return Err(format!("more than {} fractional digits", MAX_DIGITS));
        }
        let digits = format!("{}{}", int_part, frac_part);
        let significant = digits.trim_start_matches('0');
        if significant.len() > MAX_DIGITS {
            return Err(format!("more than {} significant digits", MAX_DIGITS));
        }
        let mantissa: i128 = if significant.is_empty() {
            0
        } else {
            significant.parse().map_err(|e| format!("{}", e))?
        };
        Ok(Self::new(
            if negative { -mantissa } else { mantissa },
            frac_part.len() as u32,
        ))
    }

    fn split(&self) -> (i128, i128) {
        let unit = 10i128.pow(self.scale);
        let whole = self.mantissa.div_euclid(unit);
        let frac = self.mantissa.rem_euclid(unit)
            * 10i128.pow((MAX_DIGITS as u32).saturating_sub(self.scale));
        (whole, frac)
    }
}

impl From<i64> for SifDecimal {
    fn from(value: i64) -> Self {
        SifDecimal::new(value as i128, 0)
    }
}

impl Ord for SifDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.split().cmp(&other.split())
    }
}

impl PartialOrd for SifDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SifDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl TryFrom<String> for SifDecimal {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SifDecimal::parse(&value)
    }
}

impl From<SifDecimal> for String {
    fn from(value: SifDecimal) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let a = SifDecimal::parse("12.340").unwrap();
        assert_eq!(a, SifDecimal::new(1234, 2));
        assert_eq!(a.to_string(), "12.34");
        assert_eq!(SifDecimal::parse("-0.05").unwrap().to_string(), "-0.05");
        assert_eq!(SifDecimal::parse("+7").unwrap().to_integer(), Some(7));
        assert_eq!(SifDecimal::parse("0.000").unwrap(), SifDecimal::from(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SifDecimal::parse("").is_err());
        assert!(SifDecimal::parse("1e5").is_err());
        assert!(SifDecimal::parse("1.2.3").is_err());
    }

    #[test]
    fn test_serde_uses_lexical_form() {
        let json = serde_json::to_string(&SifDecimal::new(1250, 3)).unwrap();
        assert_eq!(json, "\"1.25\"");
        let read: SifDecimal = serde_json::from_str("\"1.0\"").unwrap();
        assert_eq!(read, SifDecimal::new(1, 0));
        assert!(serde_json::from_str::<SifDecimal>(r#"{"mantissa":10,"scale":1}"#).is_err());
        let too_precise = format!("\"0.{}\"", "1".repeat(40));
        assert!(serde_json::from_str::<SifDecimal>(&too_precise).is_err());
    }

    #[test]
    fn test_ordering() {
        let a = SifDecimal::parse("-1.5").unwrap();
        let b = SifDecimal::parse("-1.25").unwrap();
        let c = SifDecimal::parse("2").unwrap();
        assert!(a < b);
        assert!(b < c);
        assert_eq!(
            SifDecimal::parse("3.10").unwrap().cmp(&SifDecimal::parse("3.1").unwrap()),
            Ordering::Equal
        );
    }
}
