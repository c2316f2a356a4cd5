//! Flag matching against a token list.
//!
//! A flag is looked up by its full textual form. Switches are written
//! `--name`; value flags are written `-name`, followed by the value as the
//! next token, or joined with `=`:
//!
//! - `-name value`
//! - `-name=value`
//! - `-name="value with "inner" quotes"` (one outer quote layer is stripped)
//!
//! The text right after the flag name must be the end of the token or `=`, so
//! `-portal` never matches a flag named `port`.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::FlagError;
use crate::flag::{Flag, FlagKind};
use crate::parsed::{ParsedFlag, ParsedFlags};

/// Outcome of matching one flag on one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagMatch {
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FlagMatch {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn switch() -> Self {
        Self {
            present: true,
            value: None,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            present: true,
            value: Some(value.into()),
        }
    }
}

/// Find `flag` in `tokens` and extract its value.
///
/// Returns the match together with the tokens that remain once the flag's
/// occurrence (and its value token, if separate) has been removed. Only the
/// first occurrence is consumed.
pub fn match_flag(flag: &Flag, tokens: &[String]) -> Result<(FlagMatch, Vec<String>), FlagError> {
    let full_name = flag.full_name();
    let mut remaining = tokens.to_vec();

    let Some(index) = remaining
        .iter()
        .position(|token| matches_token(flag.kind(), &full_name, token))
    else {
        if flag.is_required() {
            return Err(FlagError::RequiredFlagMissing(full_name));
        }
        trace!(flag = %full_name, "flag not present");
        return Ok((FlagMatch::absent(), remaining));
    };

    let token = remaining.remove(index);
    let matched = match flag.kind() {
        FlagKind::Switch => FlagMatch::switch(),
        FlagKind::Value if token == full_name => {
            // The value is the following token, whatever it looks like.
            if index >= remaining.len() {
                return Err(FlagError::MissingFlagValue(full_name));
            }
            FlagMatch::value(remaining.remove(index))
        }
        FlagKind::Value => {
            let value = strip_outer_quotes(&token[full_name.len() + 1..]);
            if value.trim().is_empty() {
                return Err(FlagError::MissingFlagValue(full_name));
            }
            FlagMatch::value(value)
        }
    };

    debug!(flag = %full_name, value = ?matched.value, "matched flag");
    Ok((matched, remaining))
}

/// Match every flag in declaration order, threading the shrinking token list
/// through each step. The first failure aborts.
pub fn match_all(flags: &[Flag], tokens: &[String]) -> Result<(ParsedFlags, Vec<String>), FlagError> {
    let mut parsed = ParsedFlags::default();
    let mut remaining = tokens.to_vec();

    for flag in flags {
        let (matched, rest) = match_flag(flag, &remaining)?;
        remaining = rest;
        parsed.push(ParsedFlag::new(flag.clone(), matched));
    }

    trace!(remaining = ?remaining, "flags consumed");
    Ok((parsed, remaining))
}

fn matches_token(kind: FlagKind, full_name: &str, token: &str) -> bool {
    if token == full_name {
        return true;
    }
    kind == FlagKind::Value
        && token
            .strip_prefix(full_name)
            .is_some_and(|rest| rest.starts_with('='))
}

/// Remove exactly one pair of surrounding double quotes, if present.
/// Inner quotes are kept as written; no escapes are processed.
fn strip_outer_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
