//! Reverse URL generation.
//!
//! # Responsibilities
//! - Parse a route pattern into a fill-in template at startup
//! - Render a URL from named parameters
//! - Validate each value against its capture sub-pattern
//!
//! # Design Decisions
//! - Supported regex subset: `^`/`$` anchors, literals (plain or escaped),
//!   named groups `(?P<name>...)`, optional groups `(?:...)?` and
//!   quantified literals (`c?`, `c*`, `c+`)
//! - Quantified literals render in their shortest form (`/?` renders as
//!   nothing, `c+` as a single `c`)
//! - Optional groups render only when every parameter inside is given
//! - Anything else is rejected when the table is built, not at lookup

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::routing::types::{PatternError, ReverseError};

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param { name: String, validator: Regex },
    Optional(Vec<Segment>),
}

/// A parsed, renderable form of a route pattern.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a pattern source into a template.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
        };
        let segments = parser.sequence(0)?;
        Ok(Self { segments })
    }

    /// Names of all parameters the template can take, in declaration order.
    #[cfg(test)]
    fn param_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names(&self.segments, &mut names);
        names
    }

    /// Render a relative URL from the given parameters.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        let values: BTreeMap<&str, &str> = params.iter().copied().collect();
        let mut used = BTreeSet::new();
        let mut out = String::new();

        render_segments(&self.segments, &values, &mut used, &mut out)?;

        if let Some(extra) = values.keys().find(|k| !used.contains(*k)) {
            return Err(ReverseError::UnexpectedParam((*extra).to_string()));
        }
        Ok(out)
    }
}

fn collect_names<'a>(segments: &'a [Segment], names: &mut Vec<&'a str>) {
    for segment in segments {
        match segment {
            Segment::Literal(_) => {}
            Segment::Param { name, .. } => names.push(name),
            Segment::Optional(inner) => collect_names(inner, names),
        }
    }
}

fn render_segments<'a>(
    segments: &'a [Segment],
    values: &BTreeMap<&'a str, &str>,
    used: &mut BTreeSet<&'a str>,
    out: &mut String,
) -> Result<(), ReverseError> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Param { name, validator } => {
                let value = values
                    .get(name.as_str())
                    .ok_or_else(|| ReverseError::MissingParam(name.clone()))?;
                if !validator.is_match(value) {
                    return Err(ReverseError::InvalidValue {
                        name: name.clone(),
                        value: (*value).to_string(),
                    });
                }
                out.push_str(value);
                used.insert(name.as_str());
            }
            Segment::Optional(inner) => {
                let mut names = Vec::new();
                collect_names(inner, &mut names);
                let given = names.iter().filter(|n| values.contains_key(*n)).count();
                if given == 0 {
                    continue;
                }
                if let Some(missing) = names.iter().find(|n| !values.contains_key(*n)) {
                    return Err(ReverseError::IncompleteOptionalGroup((*missing).to_string()));
                }
                render_segments(inner, values, used, out)?;
            }
        }
    }
    Ok(())
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn unsupported(&self, what: &str) -> PatternError {
        PatternError::Irreversible(format!("{} at offset {}", what, self.pos))
    }

    /// Parse segments until end of input (depth 0) or a closing paren.
    fn sequence(&mut self, depth: usize) -> Result<Vec<Segment>, PatternError> {
        let mut segments = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                '^' if self.pos == 0 => self.pos += 1,
                '$' if depth == 0 && self.pos + 1 == self.chars.len() => self.pos += 1,
                ')' if depth > 0 => return Ok(segments),
                '(' if self.starts_with("(?P<") => {
                    let param = self.named_group()?;
                    if self.take_optional_marker()? {
                        segments.push(Segment::Optional(vec![param]));
                    } else {
                        segments.push(param);
                    }
                }
                '(' if self.starts_with("(?:") => {
                    self.pos += 3;
                    let inner = self.sequence(depth + 1)?;
                    if self.peek() != Some(')') {
                        return Err(self.unsupported("unclosed group"));
                    }
                    self.pos += 1;
                    if self.take_optional_marker()? {
                        segments.push(Segment::Optional(inner));
                    } else {
                        for segment in inner {
                            push_segment(&mut segments, segment);
                        }
                    }
                }
                '\\' => {
                    let escaped = self
                        .chars
                        .get(self.pos + 1)
                        .copied()
                        .ok_or_else(|| self.unsupported("dangling escape"))?;
                    if escaped.is_ascii_alphanumeric() {
                        return Err(self.unsupported("character class escape"));
                    }
                    self.pos += 2;
                    self.literal(&mut segments, escaped);
                }
                '(' | ')' | '[' | ']' | '{' | '}' | '.' | '|' | '*' | '+' | '?' | '^' | '$' => {
                    return Err(self.unsupported(&format!("metacharacter '{}'", c)));
                }
                _ => {
                    self.pos += 1;
                    self.literal(&mut segments, c);
                }
            }
        }

        if depth > 0 {
            return Err(self.unsupported("unclosed group"));
        }
        Ok(segments)
    }

    /// Push a literal, honouring a trailing quantifier.
    fn literal(&mut self, segments: &mut Vec<Segment>, c: char) {
        match self.peek() {
            Some('?') | Some('*') => self.pos += 1,
            Some('+') => {
                self.pos += 1;
                push_segment(segments, Segment::Literal(c.to_string()));
            }
            _ => push_segment(segments, Segment::Literal(c.to_string())),
        }
    }

    /// Consume a `?` after a group. Other quantifiers cannot be reversed.
    fn take_optional_marker(&mut self) -> Result<bool, PatternError> {
        match self.peek() {
            Some('?') => {
                self.pos += 1;
                Ok(true)
            }
            Some('*') | Some('+') | Some('{') => Err(self.unsupported("quantified group")),
            _ => Ok(false),
        }
    }

    /// Parse `(?P<name>inner)` and compile a validator for `inner`.
    fn named_group(&mut self) -> Result<Segment, PatternError> {
        self.pos += 4;
        let name_start = self.pos;
        while self.peek().is_some_and(|c| c != '>') {
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.unsupported("unterminated group name"));
        }
        let name: String = self.chars[name_start..self.pos].iter().collect();
        self.pos += 1;

        let inner_start = self.pos;
        let mut depth = 1usize;
        let mut in_class = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 1,
                '[' => in_class = true,
                ']' => in_class = false,
                '(' if !in_class => depth += 1,
                ')' if !in_class => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        if depth != 0 {
            return Err(self.unsupported("unclosed named group"));
        }
        let inner: String = self.chars[inner_start..self.pos].iter().collect();
        self.pos += 1;

        let validator = Regex::new(&format!("^(?:{})$", inner))?;
        Ok(Segment::Param { name, validator })
    }
}

fn push_segment(segments: &mut Vec<Segment>, segment: Segment) {
    if let (Some(Segment::Literal(last)), Segment::Literal(text)) = (segments.last_mut(), &segment) {
        last.push_str(text);
        return;
    }
    segments.push(segment);
}
