use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Write};

use super::rule::HighlightRule;

/// A line-buffered writer that colors configured tokens on their way to
/// `inner`.
///
/// Complete lines are rewritten and forwarded as soon as they arrive; a
/// trailing partial line waits for more input. [`Highlighter::finish`] (or
/// [`Write::flush`]) forwards that last partial line. Dropping a
/// highlighter without finishing it loses any partial line.
///
/// A word is styled by the first rule, in rule order, that matches it.
/// Words are split on ASCII whitespace when a line is not valid UTF-8;
/// only the words that decode are matched.
#[derive(Debug)]
pub struct Highlighter<W: Write> {
    inner: W,
    rules: Vec<HighlightRule>,
    pending: Vec<u8>,
}

impl<W: Write> Highlighter<W> {
    pub fn new(inner: W, rules: Vec<HighlightRule>) -> Self {
        Self { inner, rules, pending: Vec::new() }
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Bytes waiting for a terminating newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Buffer `bytes` and forward every complete line.
    ///
    /// Returns the number of bytes written downstream by this call, after
    /// styling. That is not the length of `bytes`: it is zero while a line
    /// is still incomplete and grows with every escape sequence added.
    pub fn push(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(bytes);
        let Some(last_newline) = self.pending.iter().rposition(|byte| *byte == b'\n') else {
            return Ok(0);
        };

        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        self.emit(&complete)
    }

    /// Forward whatever is buffered, including a final line without a
    /// newline. Returns the bytes written downstream.
    pub fn drain(&mut self) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let rest = std::mem::take(&mut self.pending);
        self.emit(&rest)
    }

    /// Drain, flush, and hand back the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.drain()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn emit(&mut self, chunk: &[u8]) -> io::Result<usize> {
        let mut written = 0;
        for line in chunk.split_inclusive(|byte| *byte == b'\n') {
            let rendered = self.render_bytes(line);
            self.inner.write_all(&rendered)?;
            written += rendered.len();
        }
        Ok(written)
    }

    fn rule_for(&self, word: &str) -> Option<&HighlightRule> {
        let folded = word.to_lowercase();
        self.rules.iter().find(|rule| rule.matches_folded(&folded))
    }

    fn render_bytes<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        if let Ok(text) = std::str::from_utf8(line) {
            return match self.render_line(text) {
                Cow::Borrowed(_) => Cow::Borrowed(line),
                Cow::Owned(styled) => Cow::Owned(styled.into_bytes()),
            };
        }

        let mut out = Vec::with_capacity(line.len());
        let mut changed = false;
        let mut rest = line;
        while !rest.is_empty() {
            let gap =
                rest.iter().position(|byte| !byte.is_ascii_whitespace()).unwrap_or(rest.len());
            out.extend_from_slice(&rest[..gap]);
            rest = &rest[gap..];

            let word_len = rest.iter().position(u8::is_ascii_whitespace).unwrap_or(rest.len());
            let word = &rest[..word_len];
            let styled = std::str::from_utf8(word)
                .ok()
                .and_then(|text| self.rule_for(text).map(|rule| rule.style().paint(text)));
            match styled {
                Some(painted) => {
                    out.extend_from_slice(painted.as_bytes());
                    changed = true;
                }
                None => out.extend_from_slice(word),
            }
            rest = &rest[word_len..];
        }

        if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(line)
        }
    }

    /// Style every matching word of one line. Whitespace is preserved.
    pub fn render_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let mut styled: HashMap<&str, &HighlightRule> = HashMap::new();
        for word in line.split_whitespace() {
            if styled.contains_key(word) {
                continue;
            }
            if let Some(rule) = self.rule_for(word) {
                styled.insert(word, rule);
            }
        }

        if styled.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut out = String::with_capacity(line.len() + 16 * styled.len());
        let mut rest = line;
        while !rest.is_empty() {
            let gap = rest.len() - rest.trim_start().len();
            out.push_str(&rest[..gap]);
            rest = &rest[gap..];

            let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let word = &rest[..word_len];
            match styled.get(word) {
                Some(rule) => out.push_str(&rule.style().paint(word)),
                None => out.push_str(word),
            }
            rest = &rest[word_len..];
        }
        Cow::Owned(out)
    }
}

impl<W: Write> Write for Highlighter<W> {
    /// Reports `buf.len()` as consumed; see [`Highlighter::push`] for the
    /// forwarded byte count.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.inner.flush()
    }
}
