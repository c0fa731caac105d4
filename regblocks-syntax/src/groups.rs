//! Capture group bookkeeping
//!
//! The parser registers every capturing group as it opens, so indices follow
//! the left-to-right order of opening parentheses. Whether `\N` is a
//! backreference depends on the total group count, including groups that
//! appear later in the pattern, so a cheap prescan runs before parsing.

use std::collections::HashMap;

use thiserror::Error;

/// A capturing group, numbered from 1 in order of its opening parenthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub index: u32,
    /// Set for `(?<name>...)`
    pub name: Option<String>,
}

/// Capturing groups opened so far in one pattern
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Vec<GroupInfo>,
    by_name: HashMap<String, u32>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next capturing group.
    ///
    /// A name already taken by an earlier group is rejected and no number is
    /// consumed.
    pub fn register_group(&mut self, name: Option<String>) -> Result<u32, GroupRegistryError> {
        let index = self.group_count() + 1;
        if let Some(name) = &name {
            if self.by_name.contains_key(name) {
                return Err(GroupRegistryError::DuplicateGroupName(name.clone()));
            }
            self.by_name.insert(name.clone(), index);
        }
        self.groups.push(GroupInfo { index, name });
        Ok(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn group_count(&self) -> u32 {
        self.groups.len() as u32
    }

    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    /// Names of named groups, in order of appearance
    pub fn names(&self) -> Vec<String> {
        self.groups.iter().filter_map(|g| g.name.clone()).collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupRegistryError {
    #[error("group name '{0}' is already in use")]
    DuplicateGroupName(String),
}

/// Result of scanning a pattern for capture groups ahead of parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupScan {
    /// Number of capturing groups
    pub count: u32,
    /// Whether any group is named
    pub has_named: bool,
}

impl GroupScan {
    /// Scan a pattern, skipping escapes and bracket expressions
    pub fn of(pattern: &str) -> Self {
        let mut scan = GroupScan::default();
        let mut chars = pattern.chars().peekable();
        let mut in_class = false;

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '[' if !in_class => in_class = true,
                ']' if in_class => in_class = false,
                '(' if !in_class => {
                    if chars.peek() != Some(&'?') {
                        scan.count += 1;
                        continue;
                    }
                    chars.next();
                    if chars.peek() != Some(&'<') {
                        continue;
                    }
                    chars.next();
                    if !matches!(chars.peek(), Some('=') | Some('!')) {
                        scan.count += 1;
                        scan.has_named = true;
                    }
                }
                _ => {}
            }
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_opening_order() {
        // (?<year>..)(..)(?<day>..)
        let mut registry = GroupRegistry::new();
        let year = registry.register_group(Some("year".to_string())).unwrap();
        let month = registry.register_group(None).unwrap();
        let day = registry.register_group(Some("day".to_string())).unwrap();

        assert_eq!((year, month, day), (1, 2, 3));
        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.names(), vec!["year", "day"]);
        assert_eq!(
            registry.groups()[1],
            GroupInfo {
                index: 2,
                name: None
            }
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = GroupRegistry::new();
        registry.register_group(None).unwrap();
        registry.register_group(Some("q".to_string())).unwrap();

        assert_eq!(registry.get_by_name("q"), Some(2));
        assert!(registry.has_name("q"));
        assert!(!registry.has_name("Q"));
        assert_eq!(registry.get_by_name("missing"), None);
    }

    #[test]
    fn test_duplicate_name_keeps_numbering() {
        let mut registry = GroupRegistry::new();
        registry.register_group(Some("x".to_string())).unwrap();
        let err = registry.register_group(Some("x".to_string())).unwrap_err();

        assert_eq!(err, GroupRegistryError::DuplicateGroupName("x".to_string()));
        assert_eq!(err.to_string(), "group name 'x' is already in use");
        assert_eq!(registry.group_count(), 1);
        assert_eq!(registry.register_group(None), Ok(2));
    }

    #[test]
    fn test_scan_counts_capturing_groups_only() {
        let scan = GroupScan::of(r"(a)(?:b)(?=c)(?<!d)(?<n>e)");
        assert_eq!(scan.count, 2);
        assert!(scan.has_named);
    }

    #[test]
    fn test_scan_skips_escapes_and_classes() {
        let scan = GroupScan::of(r"\(a[(]b[\]()]");
        assert_eq!(scan, GroupScan::default());
    }

    #[test]
    fn test_scan_counts_groups_after_reference() {
        let scan = GroupScan::of(r"\2(a)(b)");
        assert_eq!(scan.count, 2);
        assert!(!scan.has_named);
    }
}
