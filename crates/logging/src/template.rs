//! crates/logging/src/template.rs
//! Message-template parsing and rendering.
//!
//! Templates follow the message-templates convention used by structured
//! logging backends: literal text interleaved with holes such as `{user}`,
//! `{0}`, `{@request}` or `{elapsed,8:F2}`. Doubled braces (`{{`, `}}`) stand
//! for literal braces. A brace sequence that does not form a valid hole is
//! kept as literal text, so rendering never fails on user-supplied templates.
//!
//! Holes bind to the argument slice in one of two ways. When every hole in the
//! template is numeric, each hole takes the argument at its index. Otherwise
//! holes take arguments in order of appearance. A hole without a matching
//! argument renders as its original text; surplus arguments are ignored.

use std::borrow::Cow;
use std::fmt;

use crate::logger::Argument;

/// Capture hint carried by a hole's `@` or `$` prefix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Capture {
    /// No prefix.
    #[default]
    Default,
    /// `@`: the backend may destructure the value.
    Structure,
    /// `$`: the backend should stringify the value.
    Stringify,
}

/// A placeholder parsed from a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hole<'a> {
    raw: &'a str,
    name: &'a str,
    index: Option<usize>,
    capture: Capture,
    alignment: Option<i32>,
    format: Option<&'a str>,
}

impl<'a> Hole<'a> {
    /// The hole as written, braces included.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// The property name, or the digits of a positional hole.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The argument index when the name is purely numeric.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// The capture hint.
    #[must_use]
    pub const fn capture(&self) -> Capture {
        self.capture
    }

    /// The padding width; negative values align left.
    ///
    /// Widths beyond `u16::MAX` in either direction make the hole malformed.
    #[must_use]
    pub const fn alignment(&self) -> Option<i32> {
        self.alignment
    }

    /// The format string following `:`, passed through uninterpreted.
    #[must_use]
    pub const fn format(&self) -> Option<&'a str> {
        self.format
    }

    fn parse(raw: &'a str) -> Option<Self> {
        let inner = &raw[1..raw.len() - 1];
        let (capture, rest) = match inner.as_bytes().first() {
            Some(b'@') => (Capture::Structure, &inner[1..]),
            Some(b'$') => (Capture::Stringify, &inner[1..]),
            _ => (Capture::Default, inner),
        };
        let (head, format) = match rest.split_once(':') {
            Some((head, format)) => (head, Some(format)),
            None => (rest, None),
        };
        let (name, alignment) = match head.split_once(',') {
            Some((name, width)) => {
                let width = width.trim().parse::<i32>().ok()?;
                if width.unsigned_abs() > u32::from(u16::MAX) {
                    return None;
                }
                (name, Some(width))
            }
            None => (head, None),
        };

        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        let index = if name.bytes().all(|b| b.is_ascii_digit()) {
            Some(name.parse().ok()?)
        } else {
            None
        };

        Some(Self {
            raw,
            name,
            index,
            capture,
            alignment,
            format,
        })
    }
}

/// One segment of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, escapes already resolved.
    Text(&'a str),
    /// A placeholder.
    Hole(Hole<'a>),
}

/// A parsed message template borrowing its source text.
///
/// # Examples
///
/// ```
/// use logging::MessageTemplate;
///
/// let template = MessageTemplate::parse("{user} logged in from {address}");
/// assert_eq!(template.hole_names().collect::<Vec<_>>(), ["user", "address"]);
/// assert_eq!(
///     template.render(&[&"alice", &"10.0.0.7"]),
///     "alice logged in from 10.0.0.7"
/// );
///
/// let positional = MessageTemplate::parse("{1} before {0}");
/// assert_eq!(positional.render(&[&"a", &"b"]), "b before a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageTemplate<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    positional: bool,
}

impl<'a> MessageTemplate<'a> {
    /// Parses `text`. Parsing never fails; malformed holes become text.
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        let tokens = tokenize(text);
        let mut holes = tokens.iter().filter_map(|token| match token {
            Token::Hole(hole) => Some(hole),
            Token::Text(_) => None,
        });
        let positional = holes.clone().next().is_some() && holes.all(|hole| hole.index.is_some());

        Self {
            text,
            tokens,
            positional,
        }
    }

    /// The source text.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.text
    }

    /// Text and hole segments in source order.
    #[must_use]
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Hole names in source order.
    pub fn hole_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            Token::Hole(hole) => Some(hole.name),
            Token::Text(_) => None,
        })
    }

    /// Whether holes bind to arguments by index rather than by order.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        self.positional
    }

    /// Names the hole each of `count` arguments fills, in argument order.
    ///
    /// An argument no hole refers to is named by its position.
    pub fn argument_names(&self, count: usize) -> Vec<Cow<'a, str>> {
        (0..count)
            .map(|position| {
                let name = if self.positional {
                    self.tokens.iter().find_map(|token| match token {
                        Token::Hole(hole) if hole.index == Some(position) => Some(hole.name),
                        _ => None,
                    })
                } else {
                    self.hole_names().nth(position)
                };
                name.map_or_else(|| Cow::Owned(position.to_string()), Cow::Borrowed)
            })
            .collect()
    }

    /// Renders the template with `arguments` into a new string.
    #[must_use]
    pub fn render(&self, arguments: &[Argument<'_>]) -> String {
        let mut out = String::with_capacity(self.text.len());
        // Writing into a String cannot fail.
        let _ = self.render_to(&mut out, arguments);
        out
    }

    /// Renders the template with `arguments` into `out`.
    ///
    /// # Errors
    ///
    /// Returns the error reported by `out` or by an argument's `Display`.
    pub fn render_to<W>(&self, out: &mut W, arguments: &[Argument<'_>]) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        let mut ordinal = 0;
        for token in &self.tokens {
            match token {
                Token::Text(text) => out.write_str(text)?,
                Token::Hole(hole) => {
                    let slot = if self.positional {
                        hole.index.unwrap_or(usize::MAX)
                    } else {
                        ordinal
                    };
                    ordinal += 1;
                    match arguments.get(slot) {
                        Some(argument) => write_aligned(out, *argument, hole.alignment)?,
                        None => out.write_str(hole.raw)?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// Renders `template` with `arguments`.
///
/// Shorthand for [`MessageTemplate::parse`] followed by
/// [`MessageTemplate::render`].
#[must_use]
pub fn render(template: &str, arguments: &[Argument<'_>]) -> String {
    MessageTemplate::parse(template).render(arguments)
}

fn write_aligned<W>(out: &mut W, argument: Argument<'_>, alignment: Option<i32>) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    let Some(alignment) = alignment else {
        return write!(out, "{argument}");
    };
    let value = argument.to_string();
    let width = alignment.unsigned_abs() as usize;
    if alignment < 0 {
        write!(out, "{value:<width$}")
    } else {
        write!(out, "{value:>width$}")
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                push_text(&mut tokens, &text[start..=pos]);
                pos += 2;
                start = pos;
            }
            b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                push_text(&mut tokens, &text[start..=pos]);
                pos += 2;
                start = pos;
            }
            b'{' => {
                let Some(close) = closing_brace(&bytes[pos + 1..]) else {
                    pos += 1;
                    continue;
                };
                let end = pos + 1 + close + 1;
                if let Some(hole) = Hole::parse(&text[pos..end]) {
                    push_text(&mut tokens, &text[start..pos]);
                    tokens.push(Token::Hole(hole));
                    start = end;
                }
                pos = end;
            }
            _ => pos += 1,
        }
    }
    push_text(&mut tokens, &text[start..]);
    tokens
}

/// Offset of the `}` ending a hole, or `None` when another `{` or the end of
/// input comes first.
fn closing_brace(rest: &[u8]) -> Option<usize> {
    match rest.iter().position(|&b| b == b'{' || b == b'}')? {
        close if rest[close] == b'}' => Some(close),
        _ => None,
    }
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}
