//! The notebooks that produced the CSV files wrote list-valued columns by printing Python lists,
//! so cells look like `[[52.37, 4.89], [52.38, 4.90]]` or `['woonfunctie', 'winkelfunctie']`.
//! This is a small parser for that subset of Python literal syntax.

use std::iter::Peekable;
use std::str::Chars;

use anyhow::Result;

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    /// `None` or `nan`
    Missing,
    List(Vec<Literal>),
}

impl Literal {
    pub fn as_list(&self) -> Result<&Vec<Literal>> {
        match self {
            Literal::List(items) => Ok(items),
            x => bail!("Expected a list, got {:?}", x),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Literal::Number(x) => Ok(*x),
            x => bail!("Expected a number, got {:?}", x),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Literal::Str(x) => Ok(x),
            x => bail!("Expected a string, got {:?}", x),
        }
    }
}

/// Parses one literal, which must span the whole input (modulo whitespace).
pub fn parse(input: &str) -> Result<Literal> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
    };
    let result = parser.value()?;
    parser.skip_whitespace();
    if let Some(c) = parser.chars.next() {
        bail!("Trailing {:?} after literal in {}", c, input);
    }
    Ok(result)
}

/// Parses a list of `[a, b]` pairs. Blank input is an empty list, since that's how pandas writes
/// a missing value.
pub fn parse_pairs(input: &str) -> Result<Vec<(f64, f64)>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut pairs = Vec::new();
    for item in parse(input)?.as_list()? {
        let pair = item.as_list()?;
        if pair.len() != 2 {
            bail!("Expected a pair, got {} items: {:?}", pair.len(), pair);
        }
        pairs.push((pair[0].as_f64()?, pair[1].as_f64()?));
    }
    Ok(pairs)
}

/// Parses a list of integer ids. They may be written as floats (`363100012345678.0`); `nan`
/// entries are skipped.
pub fn parse_ids(input: &str) -> Result<Vec<u64>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for item in parse(input)?.as_list()? {
        match item {
            Literal::Missing => {}
            Literal::Number(x) => ids.push(float_to_id(*x)?),
            Literal::Str(x) => ids.push(crate::parse_building_id(x)?.0),
            Literal::List(_) => bail!("Expected an id, got a nested list in {}", input),
        }
    }
    Ok(ids)
}

/// Parses a list of strings. Blank input is an empty list.
pub fn parse_strings(input: &str) -> Result<Vec<String>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut result = Vec::new();
    for item in parse(input)?.as_list()? {
        match item {
            Literal::Missing => {}
            x => result.push(x.as_str()?.to_string()),
        }
    }
    Ok(result)
}

pub(crate) fn float_to_id(x: f64) -> Result<u64> {
    if !x.is_finite() || x < 0.0 || x.fract() != 0.0 || x > u64::MAX as f64 {
        bail!("{} isn't a valid id", x);
    }
    Ok(x as u64)
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn skip_whitespace(&mut self) {
        while self.chars.peek().map(|c| c.is_whitespace()).unwrap_or(false) {
            self.chars.next();
        }
    }

    fn value(&mut self) -> Result<Literal> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => bail!("Unexpected end of input"),
            Some('[') => self.list('[', ']'),
            Some('(') => self.list('(', ')'),
            Some('\'') | Some('"') => self.string(),
            Some(_) => self.bare_word(),
        }
    }

    fn list(&mut self, open: char, close: char) -> Result<Literal> {
        let consumed = self.chars.next();
        assert_eq!(consumed, Some(open));
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.peek() == Some(&close) {
                self.chars.next();
                return Ok(Literal::List(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => {}
                Some(c) if c == close => {
                    return Ok(Literal::List(items));
                }
                Some(c) => bail!("Expected ',' or '{}' in a list, got {:?}", close, c),
                None => bail!("Unterminated list"),
            }
        }
    }

    fn string(&mut self) -> Result<Literal> {
        let quote = self.chars.next();
        let mut result = String::new();
        loop {
            match self.chars.next() {
                None => bail!("Unterminated string {:?}", result),
                Some('\\') => match self.chars.next() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some(c) => result.push(c),
                    None => bail!("Unterminated escape in {:?}", result),
                },
                Some(c) if Some(c) == quote => {
                    return Ok(Literal::Str(result));
                }
                Some(c) => result.push(c),
            }
        }
    }

    fn bare_word(&mut self) -> Result<Literal> {
        let mut word = String::new();
        while let Some(c) = self.chars.peek() {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_') {
                word.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        match word.as_str() {
            "" => bail!("Unexpected {:?}", self.chars.peek()),
            "None" | "nan" | "NaN" => Ok(Literal::Missing),
            _ => word
                .parse::<f64>()
                .map(Literal::Number)
                .map_err(|_| anyhow!("{} isn't a number", word)),
        }
    }
}
