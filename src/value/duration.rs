//! `xs:duration` values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Duration as its lexical components (`PnYnMnDTnHnMnS`).
///
/// Components are kept as written; `PT60S` and `PT1M` are different values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SifDuration {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl SifDuration {
    pub fn from_parts(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
            ..Self::default()
        }
    }

    fn has_time(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.millis != 0
    }

    fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0 && !self.has_time()
    }

    /// Parse the xs:duration lexical form.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or_else(|| "duration must start with 'P'".to_string())?;
        if rest.is_empty() {
            return Err("duration has no components".to_string());
        }

        let mut duration = SifDuration {
            negative,
            ..Self::default()
        };
        let mut in_time = false;
        let mut number = String::new();
        let mut seen_component = false;
        let mut seen_time_component = false;
        // position of the last designator in Y M D H M S order
        let mut last_rank: Option<u8> = None;

        for c in rest.chars() {
            match c {
                '0'..='9' | '.' => number.push(c),
                'T' if !in_time && number.is_empty() => in_time = true,
                designator => {
                    if number.is_empty() {
                        return Err(format!("missing number before '{}'", designator));
                    }
                    let rank = match (in_time, designator) {
                        (false, 'Y') => 0,
                        (false, 'M') => 1,
                        (false, 'D') => 2,
                        (true, 'H') => 3,
                        (true, 'M') => 4,
                        (true, 'S') => 5,
                        _ => return Err(format!("unexpected designator '{}'", designator)),
                    };
                    if last_rank.map_or(false, |last| rank <= last) {
                        return Err(format!("designator '{}' repeated or out of order", designator));
                    }
                    match rank {
                        0 => duration.years = parse_whole(&number)?,
                        1 => duration.months = parse_whole(&number)?,
                        2 => duration.days = parse_whole(&number)?,
                        3 => duration.hours = parse_whole(&number)?,
                        4 => duration.minutes = parse_whole(&number)?,
                        _ => {
                            let (secs, millis) = parse_seconds(&number)?;
                            duration.seconds = secs;
                            duration.millis = millis;
                        }
                    }
                    last_rank = Some(rank);
                    number.clear();
                    seen_component = true;
                    seen_time_component |= in_time;
                }
            }
        }
        if !number.is_empty() || !seen_component {
            return Err("incomplete duration".to_string());
        }
        if in_time && !seen_time_component {
            return Err("'T' must be followed by a time component".to_string());
        }
        Ok(duration)
    }

    fn sort_key(&self) -> (u32, u32, u32, u32, u32, u32, u32) {
        (
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.millis,
        )
    }
}

fn parse_whole(number: &str) -> Result<u32, String> {
    number
        .parse()
        .map_err(|_| format!("invalid duration component '{}'", number))
}

fn parse_seconds(number: &str) -> Result<(u32, u32), String> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    let secs = parse_whole(whole)?;
    if frac.is_empty() {
        return Ok((secs, 0));
    }
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid seconds '{}'", number));
    }
    // millisecond precision; extra digits are dropped
    let mut millis = frac.chars().take(3).collect::<String>();
    while millis.len() < 3 {
        millis.push('0');
    }
    Ok((secs, parse_whole(&millis)?))
}

/// Component-wise order; months are not converted to days.
impl Ord for SifDuration {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.sort_key().cmp(&other.sort_key()),
            (true, true) => other.sort_key().cmp(&self.sort_key()),
        }
    }
}

impl PartialOrd for SifDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SifDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.is_zero() {
            return f.write_str("T0S");
        }
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.has_time() {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds != 0 || self.millis != 0 {
                if self.millis == 0 {
                    write!(f, "{}S", self.seconds)?;
                } else {
                    let frac = format!("{:03}", self.millis);
                    write!(f, "{}.{}S", self.seconds, frac.trim_end_matches('0'))?;
                }
            }
        }
        Ok(())
    }
}
