use std::str::FromStr;

use crate::foundation::error::{StageError, StageResult};

/// One compound selector: `#id`, `.class`, or `#id.class.other`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    /// Required element id.
    pub id: Option<String>,
    /// Required classes.
    pub classes: Vec<String>,
}

impl Compound {
    /// `true` when an element with `id` and `classes` matches.
    pub fn matches(&self, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| classes.iter().any(|have| have == c))
    }
}

/// Whitespace-separated compounds matched as descendants, e.g. `".section2 .image"`.
///
/// Tag names, attributes and other combinators are not supported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// Compounds from outermost ancestor to the matched element.
    pub parts: Vec<Compound>,
}

fn parse_compound(src: &str, token: &str) -> StageResult<Compound> {
    let bad = || StageError::selector(format!("unsupported selector '{src}'"));
    let mut out = Compound::default();
    let mut rest = token;
    while !rest.is_empty() {
        if !rest.starts_with(['#', '.']) {
            return Err(bad());
        }
        let (sigil, tail) = rest.split_at(1);
        let end = tail.find(['#', '.']).unwrap_or(tail.len());
        let (name, next) = tail.split_at(end);
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(bad());
        }
        match sigil {
            "#" if out.id.is_none() => out.id = Some(name.to_owned()),
            "." => out.classes.push(name.to_owned()),
            _ => return Err(bad()),
        }
        rest = next;
    }
    Ok(out)
}

impl FromStr for Selector {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let parts = s
            .split_whitespace()
            .map(|token| parse_compound(s, token))
            .collect::<StageResult<Vec<_>>>()?;
        if parts.is_empty() {
            return Err(StageError::selector("empty selector"));
        }
        Ok(Self { parts })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/selector.rs"]
mod tests;
