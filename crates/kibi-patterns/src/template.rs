//! Moment-style name templates
//!
//! A template mixes date tokens with literal text. Text inside square
//! brackets is always literal, so `[logstash-]YYYY.MM.DD` formats to
//! `logstash-2024.05.15`. Recognised tokens:
//!
//! | token  | value                  |
//! |--------|------------------------|
//! | `YYYY` | calendar year          |
//! | `YY`   | two-digit year         |
//! | `GGGG` | ISO week-numbering year|
//! | `GG`   | two-digit ISO year     |
//! | `MM`/`M` | month                |
//! | `DDDD` | day of year            |
//! | `DD`/`D` | day of month         |
//! | `HH`/`H` | hour (24h)           |
//! | `WW`/`W` | ISO week             |

use chrono::{DateTime, Datelike, Timelike, Utc};
use regex::Regex;

use crate::{PatternError, PatternResult};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Year,
    ShortYear,
    IsoYear,
    ShortIsoYear,
    PaddedMonth,
    Month,
    DayOfYear,
    PaddedDay,
    Day,
    PaddedHour,
    Hour,
    PaddedIsoWeek,
    IsoWeek,
}

impl Token {
    /// Longest spellings first so `YYYY` wins over `YY`
    const SPELLINGS: [(&'static str, Token); 13] = [
        ("YYYY", Token::Year),
        ("GGGG", Token::IsoYear),
        ("DDDD", Token::DayOfYear),
        ("YY", Token::ShortYear),
        ("GG", Token::ShortIsoYear),
        ("MM", Token::PaddedMonth),
        ("DD", Token::PaddedDay),
        ("HH", Token::PaddedHour),
        ("WW", Token::PaddedIsoWeek),
        ("M", Token::Month),
        ("D", Token::Day),
        ("H", Token::Hour),
        ("W", Token::IsoWeek),
    ];

    fn at_start_of(text: &str) -> Option<(&'static str, Token)> {
        Self::SPELLINGS
            .iter()
            .copied()
            .find(|(spelling, _)| text.starts_with(spelling))
    }

    pub fn format(self, dt: DateTime<Utc>) -> String {
        let iso = dt.iso_week();
        match self {
            Token::Year => format!("{:04}", dt.year()),
            Token::ShortYear => format!("{:02}", dt.year().rem_euclid(100)),
            Token::IsoYear => format!("{:04}", iso.year()),
            Token::ShortIsoYear => format!("{:02}", iso.year().rem_euclid(100)),
            Token::PaddedMonth => format!("{:02}", dt.month()),
            Token::Month => dt.month().to_string(),
            Token::DayOfYear => format!("{:03}", dt.ordinal()),
            Token::PaddedDay => format!("{:02}", dt.day()),
            Token::Day => dt.day().to_string(),
            Token::PaddedHour => format!("{:02}", dt.hour()),
            Token::Hour => dt.hour().to_string(),
            Token::PaddedIsoWeek => format!("{:02}", iso.week()),
            Token::IsoWeek => iso.week().to_string(),
        }
    }

    fn regex(self) -> &'static str {
        match self {
            Token::Year | Token::IsoYear => r"(\d{4})",
            Token::ShortYear | Token::ShortIsoYear => r"(\d{2})",
            Token::PaddedMonth | Token::PaddedDay | Token::PaddedHour | Token::PaddedIsoWeek => {
                r"(\d{2})"
            }
            Token::DayOfYear => r"(\d{3})",
            Token::Month | Token::Day | Token::Hour | Token::IsoWeek => r"(\d{1,2})",
        }
    }

    fn accepts(self, value: u32) -> bool {
        match self {
            Token::Year | Token::ShortYear | Token::IsoYear | Token::ShortIsoYear => true,
            Token::PaddedMonth | Token::Month => (1..=12).contains(&value),
            Token::DayOfYear => (1..=366).contains(&value),
            Token::PaddedDay | Token::Day => (1..=31).contains(&value),
            Token::PaddedHour | Token::Hour => value <= 23,
            Token::PaddedIsoWeek | Token::IsoWeek => (1..=53).contains(&value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Bracketed text, copied verbatim
    Escaped(String),
    /// Unbracketed text that is not a token
    Literal(String),
    Token(Token),
}

/// A parsed name template together with its compiled matcher
#[derive(Debug, Clone)]
pub struct IntervalTemplate {
    source: String,
    segments: Vec<Segment>,
    matcher: Regex,
    tokens: Vec<Token>,
}

impl IntervalTemplate {
    pub fn parse(source: &str) -> PatternResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;

        while pos < source.len() {
            let tail = &source[pos..];

            if tail.starts_with('[') {
                let close = tail.find(']').ok_or(PatternError::UnclosedEscape(pos))?;
                flush_literal(&mut literal, &mut segments);
                if close > 1 {
                    segments.push(Segment::Escaped(tail[1..close].to_string()));
                }
                pos += close + 1;
                continue;
            }

            if let Some((spelling, token)) = Token::at_start_of(tail) {
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Token(token));
                pos += spelling.len();
                continue;
            }

            let Some(ch) = tail.chars().next() else {
                break;
            };
            literal.push(ch);
            pos += ch.len_utf8();
        }
        flush_literal(&mut literal, &mut segments);

        let mut expr = String::from("^");
        let mut tokens = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Escaped(text) | Segment::Literal(text) => expr.push_str(&regex::escape(text)),
                Segment::Token(token) => {
                    expr.push_str(token.regex());
                    tokens.push(*token);
                }
            }
        }
        expr.push('$');

        let matcher = Regex::new(&expr).map_err(|e| {
            tracing::error!(template = %source, "failed to compile template matcher: {}", e);
            PatternError::InvalidTemplate(e.to_string())
        })?;

        Ok(Self {
            source: source.to_string(),
            segments,
            matcher,
            tokens,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template contains any date token
    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Index name this template produces for `dt`
    pub fn format(&self, dt: DateTime<Utc>) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        for segment in &self.segments {
            match segment {
                Segment::Escaped(text) | Segment::Literal(text) => out.push_str(text),
                Segment::Token(token) => out.push_str(&token.format(dt)),
            }
        }
        out
    }

    /// Wildcard covering every name the template can produce.
    ///
    /// Bracketed text is kept; every unbracketed run collapses into one `*`.
    pub fn to_wildcard(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Escaped(text) => out.push_str(text),
                Segment::Literal(_) | Segment::Token(_) => {
                    if !out.ends_with('*') {
                        out.push('*');
                    }
                }
            }
        }
        out
    }

    /// Whether `index` is a name this template could have produced
    pub fn matches(&self, index: &str) -> bool {
        let Some(captures) = self.matcher.captures(index) else {
            return false;
        };
        self.tokens.iter().enumerate().all(|(i, token)| {
            captures
                .get(i + 1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .is_some_and(|value| token.accepts(value))
        })
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
