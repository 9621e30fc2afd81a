use std::collections::HashMap;

/// Canonical-key function applied to every key entering the graph.
pub type KeyNormalizer = fn(&str) -> String;

fn identity(key: &str) -> String {
    key.to_string()
}

/// Collapses a URL and its trailing-slash variant into one key.
fn strip_trailing_slash(key: &str) -> String {
    match key.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => key.to_string(),
    }
}

/// A child node: its recorded value plus every referrer that led to it, in
/// referral order with repeats preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRecord<V> {
    pub value: Option<V>,
    pub parents: Vec<String>,
}

impl<V> Default for ChildRecord<V> {
    fn default() -> Self {
        Self {
            value: None,
            parents: Vec::new(),
        }
    }
}

/// Bidirectional child↔parent index over canonicalized string keys.
///
/// Both directions are kept in sync by every mutator, so walking from
/// either side is equally cheap. Children don't need parents, parents
/// don't need children, and the same key may play both roles.
#[derive(Debug, Clone)]
pub struct ReferrerGraph<V> {
    children: HashMap<String, ChildRecord<V>>,
    parents: HashMap<String, Vec<String>>,
    normalize: KeyNormalizer,
}

impl<V: Clone> ReferrerGraph<V> {
    pub fn new() -> Self {
        Self::with_normalizer(identity)
    }

    /// Graph whose keys treat `…/page` and `…/page/` as the same node, the
    /// rule all crawl tasks use.
    pub fn slash_insensitive() -> Self {
        Self::with_normalizer(strip_trailing_slash)
    }

    pub fn with_normalizer(normalize: KeyNormalizer) -> Self {
        Self {
            children: HashMap::new(),
            parents: HashMap::new(),
            normalize,
        }
    }

    fn key(&self, raw: &str) -> String {
        (self.normalize)(raw)
    }

    /// Record `child` as referred to by each parent. Repeat referrals from
    /// the same parent stack up.
    pub fn add<I, P>(&mut self, child: &str, parents: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let child_key = self.key(child);
        self.children.entry(child_key.clone()).or_default();
        for parent in parents {
            let parent_key = self.key(parent.as_ref());
            if let Some(record) = self.children.get_mut(&child_key) {
                record.parents.push(parent_key.clone());
            }
            self.parents
                .entry(parent_key)
                .or_default()
                .push(child_key.clone());
        }
    }

    /// Seed a parent with no children.
    pub fn add_parent(&mut self, parent: &str) {
        let key = self.key(parent);
        self.parents.entry(key).or_default();
    }

    /// Seed a child with no value and no parents.
    pub fn add_child(&mut self, child: &str) {
        let key = self.key(child);
        self.children.entry(key).or_default();
    }

    pub fn set_value(&mut self, child: &str, value: Option<V>) {
        let key = self.key(child);
        self.children.entry(key).or_default().value = value;
    }

    pub fn value(&self, child: &str) -> Option<&V> {
        self.children
            .get(&self.key(child))
            .and_then(|record| record.value.as_ref())
    }

    pub fn parents_of(&self, child: &str) -> Option<&[String]> {
        self.children
            .get(&self.key(child))
            .map(|record| record.parents.as_slice())
    }

    pub fn children_of(&self, parent: &str) -> Option<&[String]> {
        self.parents
            .get(&self.key(parent))
            .map(|children| children.as_slice())
    }

    /// Values of every child referred to by `parent`, keyed by child.
    pub fn values_of(&self, parent: &str) -> HashMap<String, Option<V>> {
        let mut values = HashMap::new();
        if let Some(children) = self.parents.get(&self.key(parent)) {
            for child in children {
                let value = self
                    .children
                    .get(child)
                    .and_then(|record| record.value.clone());
                values.insert(child.clone(), value);
            }
        }
        values
    }

    pub fn is_child(&self, key: &str) -> bool {
        self.children.contains_key(&self.key(key))
    }

    pub fn is_parent(&self, key: &str) -> bool {
        self.parents.contains_key(&self.key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.is_child(key) || self.is_parent(key)
    }

    /// Remove a child and strip it from every parent's child list.
    pub fn remove_child(&mut self, key: &str) -> bool {
        let child_key = self.key(key);
        let Some(record) = self.children.remove(&child_key) else {
            return false;
        };
        for parent in &record.parents {
            if let Some(children) = self.parents.get_mut(parent) {
                children.retain(|child| child != &child_key);
            }
        }
        true
    }

    /// Remove a parent and strip it from every child's parent list.
    pub fn remove_parent(&mut self, key: &str) -> bool {
        let parent_key = self.key(key);
        let Some(children) = self.parents.remove(&parent_key) else {
            return false;
        };
        for child in &children {
            if let Some(record) = self.children.get_mut(child) {
                record.parents.retain(|parent| parent != &parent_key);
            }
        }
        true
    }

    /// Remove every reference to `key`, in both roles.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed_child = self.remove_child(key);
        let removed_parent = self.remove_parent(key);
        removed_child || removed_parent
    }

    /// Children with no recorded parents.
    pub fn orphans(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|(_, record)| record.parents.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Parents with no recorded children.
    pub fn childless(&self) -> Vec<String> {
        self.parents
            .iter()
            .filter(|(_, children)| children.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Snapshot of every child record, independent of later mutation.
    pub fn children(&self) -> HashMap<String, ChildRecord<V>> {
        self.children.clone()
    }

    /// Snapshot of every parent and its referred children, independent of
    /// later mutation.
    pub fn parents(&self) -> HashMap<String, Vec<String>> {
        self.parents.clone()
    }
}

impl<V: Clone> Default for ReferrerGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}
