//! Japanese counter fields (億 / 万 / 円) and the rules that turn them into yen.

use serde::Serialize;

/// Yen per 億
pub const OKU: u64 = 100_000_000;
/// Yen per 万
pub const MAN: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Oku,
    Man,
    Ichi,
}

impl Counter {
    pub const ALL: [Counter; 3] = [Counter::Oku, Counter::Man, Counter::Ichi];

    /// Label shown after the input box
    pub fn suffix(self) -> &'static str {
        match self {
            Counter::Oku => "億",
            Counter::Man => "万",
            Counter::Ichi => "円",
        }
    }
}

/// The three form fields. Every value is already normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterInputs {
    pub oku: u64,
    pub man: u64,
    pub ichi: u64,
}

impl CounterInputs {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Oku => self.oku,
            Counter::Man => self.man,
            Counter::Ichi => self.ichi,
        }
    }

    pub fn set(&mut self, counter: Counter, value: u64) {
        match counter {
            Counter::Oku => self.oku = value,
            Counter::Man => self.man = value,
            Counter::Ichi => self.ichi = value,
        }
    }

    /// Build inputs straight from raw text, e.g. command line values
    pub fn from_text(oku: &str, man: &str, ichi: &str) -> Self {
        Self {
            oku: parse_field(oku),
            man: parse_field(man),
            ichi: parse_field(ichi),
        }
    }

    pub fn total(&self) -> u128 {
        combine(self.oku, self.man, self.ichi)
    }
}

/// `oku * 100_000_000 + man * 10_000 + ichi`, widened so no u64 input can overflow.
pub fn combine(oku: u64, man: u64, ichi: u64) -> u128 {
    oku as u128 * OKU as u128 + man as u128 * MAN as u128 + ichi as u128
}

/// Text shown inside an input box. Zero and unset both render blank.
pub fn display_field(value: Option<u64>) -> String {
    match value {
        None | Some(0) => String::new(),
        Some(n) => n.to_string(),
    }
}

/// Lenient leading-integer parse. Anything unusable becomes 0.
///
/// Leading whitespace and a `+` are skipped, then the longest run of ASCII
/// digits is taken (`"12abc"` is 12). A `-` sign yields 0 and digit runs
/// beyond `u64` saturate.
pub fn parse_field(text: &str) -> u64 {
    let text = text.trim_start();
    let text = match text.as_bytes().first() {
        Some(b'+') => &text[1..],
        Some(b'-') => return 0,
        _ => text,
    };

    let mut value: u64 = 0;
    for b in text.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(b - b'0'));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        assert_eq!(combine(0, 0, 0), 0);
        assert_eq!(combine(1, 2345, 6789), 123_456_789);
        assert_eq!(combine(0, 0, 100), 100);
        assert_eq!(combine(3, 0, 0), 300_000_000);
        assert_eq!(combine(0, 7, 0), 70_000);
    }

    #[test]
    fn test_combine_does_not_overflow() {
        let expected = u64::MAX as u128 * 100_000_000 + u64::MAX as u128 * 10_000 + u64::MAX as u128;
        assert_eq!(combine(u64::MAX, u64::MAX, u64::MAX), expected);
    }

    #[test]
    fn test_total_uses_each_counter() {
        let inputs = CounterInputs { oku: 12, man: 34, ichi: 56 };
        assert_eq!(inputs.total(), 1_200_340_056);
        assert_eq!(inputs.get(Counter::Oku), 12);
        assert_eq!(inputs.get(Counter::Ichi), 56);
    }

    #[test]
    fn test_display_field_blanks_zero_and_unset() {
        assert_eq!(display_field(None), "");
        assert_eq!(display_field(Some(0)), "");
        assert_eq!(display_field(Some(2345)), "2345");
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field(""), 0);
        assert_eq!(parse_field("abc"), 0);
        assert_eq!(parse_field("100"), 100);
        assert_eq!(parse_field("  7"), 7);
        assert_eq!(parse_field("+3"), 3);
        assert_eq!(parse_field("12abc"), 12);
        assert_eq!(parse_field("1e5"), 1);
        assert_eq!(parse_field("-5"), 0);
        assert_eq!(parse_field("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_normalizer_round_trip() {
        for n in [1, 9, 10, 2345, 6789, 100_000_000, u64::MAX] {
            assert_eq!(parse_field(&display_field(Some(n))), n);
        }
        assert_eq!(parse_field(&display_field(Some(0))), 0);
    }

    #[test]
    fn test_from_text() {
        let inputs = CounterInputs::from_text("1", "2345", "6789");
        assert_eq!(inputs, CounterInputs { oku: 1, man: 2345, ichi: 6789 });
        assert_eq!(CounterInputs::from_text("", "x", " "), CounterInputs::default());
    }

    #[test]
    fn test_set_only_touches_one_field() {
        let mut inputs = CounterInputs { oku: 1, man: 2, ichi: 3 };
        inputs.set(Counter::Man, 50);
        assert_eq!(inputs, CounterInputs { oku: 1, man: 50, ichi: 3 });
    }
}
