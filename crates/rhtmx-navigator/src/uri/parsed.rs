//! Payload tokenizing
//!
//! Pure functional classification of fragment tokens. A token shaped like
//! `key=value` (exactly one `=`, non-empty key) is named; anything else is
//! positional. Named tokens never consume positional slots.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fragment::SEPARATOR;

static NAMED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^=]+)=([^=]*)$").expect("named token pattern is valid"));

/// One classified token of a payload
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::uri::{classify_token, UriToken};
///
/// assert_eq!(
///     classify_token("ssn=123", 0),
///     UriToken::Named { key: "ssn".into(), value: "123".into() }
/// );
/// assert_eq!(
///     classify_token("John-Rizzo", 0),
///     UriToken::Positional { index: 0, value: "John-Rizzo".into() }
/// );
/// // Two `=` signs: not a named token
/// assert!(matches!(classify_token("a=b=c", 1), UriToken::Positional { index: 1, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriToken {
    Positional { index: usize, value: String },
    Named { key: String, value: String },
}

impl UriToken {
    pub fn value(&self) -> &str {
        match self {
            UriToken::Positional { value, .. } | UriToken::Named { value, .. } => value,
        }
    }
}

/// Classifies one raw token (pure function)
///
/// `next_position` is the index the token gets if it turns out positional.
pub fn classify_token(token: &str, next_position: usize) -> UriToken {
    match NAMED_TOKEN.captures(token) {
        Some(caps) => UriToken::Named {
            key: caps[1].to_string(),
            value: caps[2].to_string(),
        },
        None => UriToken::Positional {
            index: next_position,
            value: token.to_string(),
        },
    }
}

/// Ordered tokens of one payload
///
/// Transient: owned by the navigation that parsed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUri {
    tokens: Vec<UriToken>,
}

impl ParsedUri {
    /// Splits `payload` on the separator and classifies each token
    ///
    /// An empty payload yields no tokens. Trailing separators are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::uri::ParsedUri;
    ///
    /// let parsed = ParsedUri::parse("John/ssn=1/Belgium");
    /// assert_eq!(parsed.positional(0), Some("John"));
    /// assert_eq!(parsed.positional(1), Some("Belgium"));
    /// assert_eq!(parsed.named("ssn"), Some("1"));
    /// ```
    pub fn parse(payload: &str) -> Self {
        let payload = payload.trim_end_matches(SEPARATOR);
        if payload.is_empty() {
            return Self::default();
        }

        let (tokens, _) = payload.split(SEPARATOR).fold(
            (Vec::new(), 0usize),
            |(mut tokens, next_position), raw| {
                let token = classify_token(raw, next_position);
                let next_position = match token {
                    UriToken::Positional { .. } => next_position + 1,
                    UriToken::Named { .. } => next_position,
                };
                tokens.push(token);
                (tokens, next_position)
            },
        );

        Self { tokens }
    }

    pub fn tokens(&self) -> &[UriToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Value of the positional token at `index`
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.tokens.iter().find_map(|token| match token {
            UriToken::Positional { index: i, value } if *i == index => Some(value.as_str()),
            _ => None,
        })
    }

    /// Value of the first named token with exactly this key
    pub fn named(&self, key: &str) -> Option<&str> {
        self.tokens.iter().find_map(|token| match token {
            UriToken::Named { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn positional_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, UriToken::Positional { .. }))
            .count()
    }
}
