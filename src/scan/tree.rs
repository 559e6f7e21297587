use crate::provider::TreeEntry;
use std::collections::{BTreeMap, HashSet};

/// Directory index over a flat tree listing.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    children: BTreeMap<String, Vec<TreeEntry>>,
    files: Vec<TreeEntry>,
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

impl TreeIndex {
    /// Children keep listing order. Directories missing from the listing are
    /// synthesised from their descendants.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        let mut index = Self::default();
        let mut dirs = HashSet::new();
        for entry in entries {
            let path = entry.path.trim_matches('/').to_string();
            if path.is_empty() {
                continue;
            }
            index.ensure_ancestors(&path, &mut dirs);
            if entry.is_file() {
                let file = TreeEntry { path, ..entry };
                index.files.push(file.clone());
                index
                    .children
                    .entry(parent_of(&file.path).to_string())
                    .or_default()
                    .push(file);
            } else if dirs.insert(path.clone()) {
                index
                    .children
                    .entry(parent_of(&path).to_string())
                    .or_default()
                    .push(TreeEntry::dir(&path));
            }
        }
        index
    }

    fn ensure_ancestors(&mut self, path: &str, dirs: &mut HashSet<String>) {
        let mut missing = Vec::new();
        let mut current = parent_of(path);
        while !current.is_empty() && !dirs.contains(current) {
            missing.push(current.to_string());
            current = parent_of(current);
        }
        for dir in missing.into_iter().rev() {
            dirs.insert(dir.clone());
            self.children
                .entry(parent_of(&dir).to_string())
                .or_default()
                .push(TreeEntry::dir(&dir));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &TreeEntry> {
        self.files.iter()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.iter().any(|file| file.path == path)
    }

    /// Whether `dir` holds at least one file, at any depth.
    pub fn dir_has_files(&self, dir: &str) -> bool {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.files.iter().any(|file| file.path.starts_with(&prefix))
    }

    pub fn children(&self, dir: &str) -> &[TreeEntry] {
        self.children.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First file named exactly `name` in depth-first order, each directory
    /// fully explored before its later siblings.
    pub fn find_first_named(&self, name: &str) -> Option<&TreeEntry> {
        let mut stack = self.children("").iter().rev().collect::<Vec<_>>();
        while let Some(entry) = stack.pop() {
            if entry.is_file() {
                if entry.name() == name {
                    return Some(entry);
                }
                continue;
            }
            stack.extend(self.children(&entry.path).iter().rev());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_subtree_does_not_stop_the_search() {
        let index = TreeIndex::new(vec![
            TreeEntry::dir("docs"),
            TreeEntry::dir("empty"),
            TreeEntry::dir("empty/deeper"),
            TreeEntry::dir("service"),
            TreeEntry::file("service/pom.xml", 300),
        ]);
        let found = index.find_first_named("pom.xml").expect("pom should be found");
        assert_eq!(found.path, "service/pom.xml");
    }

    #[test]
    fn search_is_depth_first_in_listing_order() {
        let index = TreeIndex::new(vec![
            TreeEntry::dir("a"),
            TreeEntry::dir("a/inner"),
            TreeEntry::file("a/inner/build.gradle", 10),
            TreeEntry::file("b/build.gradle", 10),
        ]);
        let found = index
            .find_first_named("build.gradle")
            .expect("gradle file should be found");
        assert_eq!(found.path, "a/inner/build.gradle");
    }

    #[test]
    fn missing_name_is_none() {
        let index = TreeIndex::new(vec![TreeEntry::file("src/App.java", 10)]);
        assert!(index.find_first_named("pom.xml").is_none());
        assert!(TreeIndex::default().find_first_named("pom.xml").is_none());
    }

    #[test]
    fn unlisted_directories_are_synthesised() {
        let index = TreeIndex::new(vec![TreeEntry::file("x/y/z/build.gradle.kts", 1)]);
        assert_eq!(index.children("").len(), 1);
        assert!(index.dir_has_files("x/y"));
        assert!(index
            .find_first_named("build.gradle.kts")
            .is_some());
    }

    #[test]
    fn name_match_is_exact() {
        let index = TreeIndex::new(vec![TreeEntry::file("old.pom.xml", 1)]);
        assert!(index.find_first_named("pom.xml").is_none());
    }
}
