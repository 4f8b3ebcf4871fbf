// Holiday directive strings: which countries observe a holiday, and under
// what name.
//
//   "ca,uk,us: New Year's Day"
//   `ca,us: ca:"Family Day" us:"President's Day"`

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("invalid holiday ({0:?}): format must be \"country: holiday name\"")]
    MissingSeparator(String),
}

/// Why a per-country body could not be read as `country:"name"` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// A country identifier was expected.
    Country { offset: usize },
    /// An identifier was not followed by `:`.
    Colon { offset: usize },
    /// `country:` was not followed by a terminated double-quoted string.
    QuotedString { offset: usize },
}

impl Malformed {
    pub fn offset(self) -> usize {
        match self {
            Self::Country { offset } | Self::Colon { offset } | Self::QuotedString { offset } => {
                offset
            }
        }
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country { offset } => write!(f, "expected country at character {offset}"),
            Self::Colon { offset } => write!(f, "expected ':' at character {offset}"),
            Self::QuotedString { offset } => {
                write!(f, "expected quoted holiday name at character {offset}")
            }
        }
    }
}

/// Ordered `(country, name)` pairs, or where the per-country form broke.
pub type CountryNames = Result<Vec<(String, String)>, Malformed>;

/// A raw directive string as it appears in the holiday configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Directive(String);

impl TryFrom<String> for Directive {
    type Error = DirectiveError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<Directive> for String {
    fn from(directive: Directive) -> Self {
        directive.0
    }
}

impl Directive {
    /// Wrap a directive, rejecting strings without a `:` separator.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DirectiveError> {
        let raw = raw.into();
        if !raw.contains(':') {
            return Err(DirectiveError::MissingSeparator(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> Result<(&str, &str), DirectiveError> {
        self.0.split_once(':').ok_or_else(|| DirectiveError::MissingSeparator(self.0.clone()))
    }

    /// Country codes before the first `:`, in order of appearance.
    ///
    /// Any run of letters is a code; everything else separates codes.
    pub fn countries(&self) -> Result<Vec<&str>, DirectiveError> {
        let (countries, _) = self.split()?;
        Ok(letter_runs(countries).collect())
    }

    pub fn observed_by(&self, country: &str) -> Result<bool, DirectiveError> {
        Ok(self.countries()?.contains(&country))
    }

    /// Everything after the first `:`, trimmed.
    pub fn body(&self) -> Result<&str, DirectiveError> {
        Ok(self.split()?.1.trim())
    }

    /// The name `country` uses for this holiday.
    ///
    /// Single-country directives return the body as-is. Multi-country
    /// directives look for `country:"name"` in the body and fall back to the
    /// whole body when the country is absent or the pairs are malformed.
    pub fn holiday_name(&self, country: &str) -> Result<String, DirectiveError> {
        let (countries, body) = self.split()?;
        if letter_runs(countries).count() == 1 {
            return Ok(body.trim().to_string());
        }

        for pair in PerCountryNames::new(body) {
            match pair {
                Ok((candidate, name)) if candidate == country => return Ok(name),
                Ok(_) => {}
                Err(malformed) => {
                    warn!(
                        holiday = %self.0,
                        character = malformed.offset(),
                        msg = %malformed,
                        "error scanning holiday, using the common name"
                    );
                    break;
                }
            }
        }

        Ok(body.trim().to_string())
    }

    /// All `(country, name)` pairs of a per-country body.
    pub fn per_country_names(&self) -> Result<CountryNames, DirectiveError> {
        let (_, body) = self.split()?;
        Ok(PerCountryNames::new(body)
            .map(|pair| pair.map(|(country, name)| (country.to_string(), name)))
            .collect())
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn letter_runs(input: &str) -> impl Iterator<Item = &str> {
    input.split(|ch: char| !ch.is_alphabetic()).filter(|run| !run.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectCountry,
    ExpectColon,
    ExpectQuotedString,
}

/// Tokenizer over a per-country body: `ca:"Family Day" us:"President's Day"`.
///
/// Yields pairs in order. After the first `Err` the iterator is exhausted.
struct PerCountryNames<'a> {
    body: &'a str,
    pos: usize,
    state: State,
    done: bool,
}

impl<'a> PerCountryNames<'a> {
    fn new(body: &'a str) -> Self {
        Self { body, pos: 0, state: State::ExpectCountry, done: false }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.body[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.body[self.pos..].chars().next()
    }

    fn fail(&mut self, malformed: Malformed) -> Option<Result<(&'a str, String), Malformed>> {
        self.done = true;
        Some(Err(malformed))
    }

    fn country(&mut self) -> Option<&'a str> {
        let rest = &self.body[self.pos..];
        let len = rest.find(|ch: char| !ch.is_alphabetic()).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn quoted(&mut self) -> Option<String> {
        let rest = &self.body[self.pos..];
        let mut chars = rest.char_indices();
        if !matches!(chars.next(), Some((_, '"'))) {
            return None;
        }

        let mut name = String::new();
        let mut escaped = false;
        for (index, ch) in chars {
            match ch {
                _ if escaped => {
                    name.push(ch);
                    escaped = false;
                }
                '\\' => escaped = true,
                '"' => {
                    self.pos += index + 1;
                    return Some(name);
                }
                '\n' => return None,
                _ => name.push(ch),
            }
        }
        None
    }
}

impl<'a> Iterator for PerCountryNames<'a> {
    type Item = Result<(&'a str, String), Malformed>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut country = "";
        loop {
            self.skip_whitespace();
            let offset = self.pos;
            match self.state {
                State::ExpectCountry => {
                    if self.peek().is_none() {
                        self.done = true;
                        return None;
                    }
                    match self.country() {
                        Some(found) => {
                            country = found;
                            self.state = State::ExpectColon;
                        }
                        None => return self.fail(Malformed::Country { offset }),
                    }
                }
                State::ExpectColon => {
                    if self.peek() != Some(':') {
                        return self.fail(Malformed::Colon { offset });
                    }
                    self.pos += 1;
                    self.state = State::ExpectQuotedString;
                }
                State::ExpectQuotedString => match self.quoted() {
                    Some(name) => {
                        self.state = State::ExpectCountry;
                        return Some(Ok((country, name)));
                    }
                    None => return self.fail(Malformed::QuotedString { offset }),
                },
            }
        }
    }
}
