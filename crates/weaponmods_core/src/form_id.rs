use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormIdError {
    #[error("form ID is empty")]
    Empty,
    #[error("form ID `{0}` is not hexadecimal")]
    NotHex(String),
}

/// A record's form ID as shown on the wiki.
///
/// The exported value is a hex string of up to eight digits. The low six
/// digits identify the record; anything left over once leading zeros are
/// stripped is the load-order prefix of an add-on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormId {
    add_on: bool,
    id: String,
}

impl FormId {
    pub const DIGITS: usize = 6;

    pub fn parse(raw: &str) -> Result<Self, FormIdError> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if hex.is_empty() {
            return Err(FormIdError::Empty);
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FormIdError::NotHex(raw.to_string()));
        }

        let significant = hex.trim_start_matches('0');
        let low = &significant[significant.len().saturating_sub(Self::DIGITS)..];
        Ok(Self {
            add_on: significant.len() > Self::DIGITS,
            id: format!("{:0>width$}", low.to_ascii_lowercase(), width = Self::DIGITS),
        })
    }

    pub fn is_add_on(&self) -> bool {
        self.add_on
    }

    /// The six lowercase hex digits.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The citation template, `{{ID|...}}` or `{{DLC ID|...}}`.
    pub fn template(&self) -> String {
        if self.add_on {
            format!("{{{{DLC ID|{}}}}}", self.id)
        } else {
            format!("{{{{ID|{}}}}}", self.id)
        }
    }
}

impl FromStr for FormId {
    type Err = FormIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormId, FormIdError};

    #[test]
    fn base_game_id_is_padded_to_six_digits() {
        let id = FormId::parse("0001a2b3").expect("valid hex");
        assert!(!id.is_add_on());
        assert_eq!(id.id(), "01a2b3");
        assert_eq!(id.template(), "{{ID|01a2b3}}");
    }

    #[test]
    fn six_significant_digits_are_not_an_add_on() {
        let id = FormId::parse("0062A1BC").expect("valid hex");
        assert!(!id.is_add_on());
        assert_eq!(id.id(), "62a1bc");
    }

    #[test]
    fn load_order_prefix_marks_add_on() {
        let id = FormId::parse("0162a1bc").expect("valid hex");
        assert!(id.is_add_on());
        assert_eq!(id.id(), "62a1bc");
        assert_eq!(id.template(), "{{DLC ID|62a1bc}}");

        let id = FormId::parse("04000F99").expect("valid hex");
        assert!(id.is_add_on());
        assert_eq!(id.template(), "{{DLC ID|000f99}}");
    }

    #[test]
    fn rejects_non_hex_input() {
        assert_eq!(FormId::parse(""), Err(FormIdError::Empty));
        assert_eq!(
            FormId::parse("00zz0001"),
            Err(FormIdError::NotHex("00zz0001".to_string()))
        );
    }

    #[test]
    fn accepts_prefixed_hex() {
        let id: FormId = "0x0004D00C".parse().expect("valid hex");
        assert_eq!(id.to_string(), "04d00c");
    }
}
