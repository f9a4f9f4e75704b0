use std::{fmt::Display, sync::LazyLock};

use esrepl_utils::indexmap::FxIndexMap;
use regex::Regex;

static FLAG_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
  Str(String),
  /// The flag was given without `=value`.
  True,
}

impl FlagValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(value) => Some(value),
      Self::True => None,
    }
  }
}

impl Display for FlagValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Str(value) => write!(f, "{value:?}"),
      Self::True => write!(f, "true"),
    }
  }
}

/// The raw argument vector split into positional tokens and flags.
///
/// Any token starting with one or more `-` is a flag: every leading dash is dropped and the
/// rest is split on the first `=` into key and value. Flags are never validated and a repeated
/// key overwrites the earlier value. Every other token is kept, in order, as a positional.
#[derive(Debug, Default, Clone)]
pub struct ArgSet {
  pub raw: Vec<String>,
  pub positional: Vec<String>,
  pub flags: FxIndexMap<String, FlagValue>,
}

impl ArgSet {
  pub fn parse<I, S>(raw: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let raw: Vec<String> = raw.into_iter().map(Into::into).collect();
    let mut positional = vec![];
    let mut flags = FxIndexMap::default();

    for token in &raw {
      let Some(prefix) = FLAG_PREFIX_RE.find(token) else {
        positional.push(token.clone());
        continue;
      };

      let rest = &token[prefix.end()..];
      let (key, value) = match rest.split_once('=') {
        Some((key, value)) if !value.is_empty() => (key, FlagValue::Str(value.to_string())),
        Some((key, _)) => (key, FlagValue::True),
        None => (rest, FlagValue::True),
      };

      flags.insert(key.to_string(), value);
    }

    Self { raw, positional, flags }
  }

  pub fn flag(&self, key: &str) -> Option<&FlagValue> {
    self.flags.get(key)
  }

  pub fn has_any(&self, keys: &[&str]) -> bool {
    keys.iter().any(|key| self.flags.contains_key(*key))
  }

  #[inline]
  pub fn is_debug(&self) -> bool {
    self.has_any(&["d", "debug"])
  }

  #[inline]
  pub fn is_help(&self) -> bool {
    self.has_any(&["h", "help"])
  }
}

#[test]
fn test_positional_only() {
  let args = ArgSet::parse(["node", "cli", "./script.js"]);

  assert_eq!(args.positional, ["node", "cli", "./script.js"]);
  assert!(args.flags.is_empty());
}

#[test]
fn test_flags_are_never_positional() {
  let args = ArgSet::parse(["esrepl", "-d", "a.js", "--sourcemap=external", "b", "---x", "-"]);

  assert_eq!(args.positional, ["esrepl", "a.js", "b"]);
  assert_eq!(args.flag("d"), Some(&FlagValue::True));
  assert_eq!(args.flag("sourcemap"), Some(&FlagValue::Str("external".to_string())));
  assert_eq!(args.flag("x"), Some(&FlagValue::True));
  // A lone dash is a flag with an empty key.
  assert_eq!(args.flag(""), Some(&FlagValue::True));
  assert_eq!(args.raw.len(), 7);
}

#[test]
fn test_value_after_first_equals() {
  let args = ArgSet::parse(["--define=a=b", "--empty=", "--plain"]);

  assert_eq!(args.flag("define").and_then(FlagValue::as_str), Some("a=b"));
  assert_eq!(args.flag("empty"), Some(&FlagValue::True));
  assert_eq!(args.flag("plain"), Some(&FlagValue::True));
}

#[test]
fn test_last_write_wins() {
  let args = ArgSet::parse(["--sourcemap=inline", "-d", "--sourcemap=false"]);

  assert_eq!(args.flag("sourcemap").and_then(FlagValue::as_str), Some("false"));
  // Overwriting keeps the position of the first occurrence.
  assert_eq!(args.flags.keys().collect::<Vec<_>>(), ["sourcemap", "d"]);
}

#[test]
fn test_help_and_debug() {
  assert!(ArgSet::parse(["-h"]).is_help());
  assert!(ArgSet::parse(["--help"]).is_help());
  assert!(ArgSet::parse(["--debug"]).is_debug());
  assert!(!ArgSet::parse(["--hel"]).is_help());
  assert!(!ArgSet::parse(["debug"]).is_debug());
}
