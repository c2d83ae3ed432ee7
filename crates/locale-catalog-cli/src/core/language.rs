use crate::core::InvalidLanguageError;
use std::fmt;
use std::str::FromStr;

/// A gettext language code: two lowercase ASCII letters, optionally followed
/// by `_` and two uppercase ASCII letters (`fr`, `en_GB`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(code: &str) -> bool {
        let bytes = code.as_bytes();
        match bytes {
            [a, b] => a.is_ascii_lowercase() && b.is_ascii_lowercase(),
            [a, b, b'_', c, d] => {
                a.is_ascii_lowercase()
                    && b.is_ascii_lowercase()
                    && c.is_ascii_uppercase()
                    && d.is_ascii_uppercase()
            },
            _ => false,
        }
    }
}

impl FromStr for LanguageCode {
    type Err = InvalidLanguageError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidLanguageError {
                code: code.to_string(),
            })
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse an optional `--lang` value. An empty value counts as absent.
pub fn parse_optional_language(
    raw: Option<&str>,
) -> Result<Option<LanguageCode>, InvalidLanguageError> {
    match raw {
        None | Some("") => Ok(None),
        Some(code) => code.parse().map(Some),
    }
}
