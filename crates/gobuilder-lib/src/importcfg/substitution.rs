use std::str::FromStr;

use indexmap::IndexMap;

use crate::Error;

/// Substitutions compiled into the driver: `(custom path, replaced path)`.
pub const BUILTIN_SUBSTITUTIONS: &[(&str, &str)] =
    &[("github.com/iansmith/parigot/src/go/runtime", "runtime")];

/// Immutable remapping of custom import paths onto the standard paths they
/// replace.
///
/// When a substitute exists, the replaced path's own standard-library entry
/// is dropped and the custom package is imported under the replaced path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    /// custom path -> replaced path
    entries: IndexMap<String, String>,
}

impl SubstitutionTable {
    /// A table with no substitutions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_SUBSTITUTIONS
                .iter()
                .map(|&(custom, replaced)| (custom.to_owned(), replaced.to_owned()))
                .collect(),
        }
    }

    /// Returns a copy of this table with more entries.
    ///
    /// A later entry for an existing custom path overrides it. Each replaced
    /// path may have only one substitute.
    pub fn extended<I>(&self, pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Substitution>,
    {
        let mut entries = self.entries.clone();
        entries.extend(pairs.into_iter().map(|s| (s.custom, s.replaced)));

        let mut seen: IndexMap<&str, &str> = IndexMap::new();
        for (custom, replaced) in &entries {
            if let Some(other) = seen.insert(replaced, custom) {
                return Err(Error::Argument(format!(
                    "substitutes {other:?} and {custom:?} both replace {replaced:?}"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The path `path` should be imported as.
    pub fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        self.entries.get(path).map_or(path, String::as_str)
    }

    /// True if some custom package replaces `path`.
    pub fn is_replaced(&self, path: &str) -> bool {
        self.entries.values().any(|replaced| replaced == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, r)| (c.as_str(), r.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One `custom=replaced` table entry as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub custom: String,
    pub replaced: String,
}

impl FromStr for Substitution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((custom, replaced)) if !custom.is_empty() && !replaced.is_empty() => Ok(Self {
                custom: custom.to_owned(),
                replaced: replaced.to_owned(),
            }),
            _ => Err(Error::Argument(format!(
                "invalid substitution {s:?}: expected custom=replaced"
            ))),
        }
    }
}
