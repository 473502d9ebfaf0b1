use crate::Result;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::BTreeMap;

// Large merges produce alternations of several thousand identifiers.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Mapping from chunk-local identifiers to merged identifiers, applied to
/// free text as a single substitution pass.
///
/// Matching is leftmost, preferring the longest identifier at a position, and
/// substituted text is never rescanned. A merged identifier that happens to
/// equal some other chunk-local identifier is therefore not rewritten twice.
///
/// Identifiers can also be registered under a scope (the chunk that defined
/// them). [`rewrite_scoped`](Self::rewrite_scoped) resolves an identifier in
/// its own scope first and falls back to the first registration anywhere.
#[derive(Clone, Debug, Default)]
pub struct RelocationTable {
    map: BTreeMap<String, String>,
    scoped: BTreeMap<usize, BTreeMap<String, String>>,
    pattern: Option<Regex>,
}

impl RelocationTable {
    /// Builds a table from `(old, new)` pairs. Empty old identifiers are
    /// skipped; for a repeated old identifier the first pair wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relocation`](crate::Error::Relocation) if the
    /// combined pattern exceeds the size limit.
    pub fn from_pairs<I, O, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (old, new) in pairs {
            let old = old.into();
            if !old.is_empty() {
                map.entry(old).or_insert_with(|| new.into());
            }
        }
        Self::build(map, BTreeMap::new())
    }

    /// Builds a table from `(scope, old, new)` triples. Within a scope, and
    /// across scopes for the fallback, the first pair for an old identifier
    /// wins.
    ///
    /// # Errors
    ///
    /// Same as [`from_pairs`](Self::from_pairs).
    pub fn from_scoped_pairs<I, O, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        let mut map = BTreeMap::new();
        let mut scoped: BTreeMap<usize, BTreeMap<String, String>> = BTreeMap::new();
        for (scope, old, new) in pairs {
            let old = old.into();
            if old.is_empty() {
                continue;
            }
            let new = new.into();
            map.entry(old.clone()).or_insert_with(|| new.clone());
            scoped.entry(scope).or_default().entry(old).or_insert(new);
        }
        Self::build(map, scoped)
    }

    fn build(
        map: BTreeMap<String, String>,
        scoped: BTreeMap<usize, BTreeMap<String, String>>,
    ) -> Result<Self> {
        let pattern = if map.is_empty() {
            None
        } else {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            let alternation = keys
                .into_iter()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .size_limit(PATTERN_SIZE_LIMIT)
                    .build()?,
            )
        };

        Ok(Self {
            map,
            scoped,
            pattern,
        })
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.map.get(old).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Replaces every chunk-local identifier in `text` with its merged
    /// identifier. Borrows `text` when nothing matches.
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.substitute(None, text)
    }

    /// Like [`rewrite`](Self::rewrite), but identifiers registered under
    /// `scope` take precedence over those of other scopes.
    pub fn rewrite_scoped<'t>(&self, scope: usize, text: &'t str) -> Cow<'t, str> {
        self.substitute(self.scoped.get(&scope), text)
    }

    fn substitute<'t>(
        &self,
        local: Option<&BTreeMap<String, String>>,
        text: &'t str,
    ) -> Cow<'t, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(text);
        };
        pattern.replace_all(text, |caps: &regex::Captures<'_>| {
            let old = &caps[0];
            local
                .and_then(|local| local.get(old))
                .unwrap_or(&self.map[old])
                .clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_in_place() {
        let table = RelocationTable::from_pairs([("CHUNK1_002", "IT_OP_001")]).unwrap();
        assert_eq!(table.rewrite("2P (참조: CHUNK1_002)"), "2P (참조: IT_OP_001)");
    }

    #[test]
    fn untouched_text_is_borrowed() {
        let table = RelocationTable::from_pairs([("CHUNK1_002", "IT_OP_001")]).unwrap();
        assert!(matches!(table.rewrite("3P"), Cow::Borrowed("3P")));
        let empty = RelocationTable::default();
        assert!(matches!(empty.rewrite("CHUNK1_002"), Cow::Borrowed(_)));
    }

    #[test]
    fn does_not_cascade_through_new_ids() {
        // Workers reused the final prefix; a naive sequential replace would
        // turn IT_OP_001 -> IT_OP_002 -> IT_OP_003.
        let table = RelocationTable::from_pairs([
            ("IT_OP_001", "IT_OP_002"),
            ("IT_OP_002", "IT_OP_003"),
            ("IT_OP_003", "IT_OP_001"),
        ])
        .unwrap();
        assert_eq!(
            table.rewrite("IT_OP_001, IT_OP_002 and IT_OP_003"),
            "IT_OP_002, IT_OP_003 and IT_OP_001"
        );
    }

    #[test]
    fn prefers_longest_identifier() {
        let table =
            RelocationTable::from_pairs([("C1_001", "IT_OP_001"), ("C1_0010", "IT_OP_002")])
                .unwrap();
        assert_eq!(table.rewrite("see C1_0010"), "see IT_OP_002");
    }

    #[test]
    fn first_pair_wins_and_empty_ids_skipped() {
        let table =
            RelocationTable::from_pairs([("A_001", "X_001"), ("A_001", "X_002"), ("", "X_003")])
                .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("A_001"), Some("X_001"));
    }

    #[test]
    fn scoped_identifiers_resolve_in_their_own_scope() {
        let table = RelocationTable::from_scoped_pairs([
            (1, "TC_001", "IT_OP_001"),
            (1, "TC_002", "IT_OP_002"),
            (2, "TC_001", "IT_OP_003"),
        ])
        .unwrap();

        assert_eq!(table.rewrite_scoped(2, "after TC_001"), "after IT_OP_003");
        assert_eq!(table.rewrite_scoped(1, "after TC_001"), "after IT_OP_001");
        // Chunk 2 never defined TC_002.
        assert_eq!(table.rewrite_scoped(2, "after TC_002"), "after IT_OP_002");
        assert_eq!(table.rewrite("after TC_001"), "after IT_OP_001");
    }
}
