use std::collections::BTreeMap;

use super::classify::CountryClassification;
use super::domain::CriteriaPath;

type NodeId = usize;

/// One entry in the node table: its label and the label-to-child mapping.
/// Only the root carries no label; no two siblings share one.
#[derive(Debug)]
struct Node {
    label: Option<String>,
    children: BTreeMap<String, NodeId>,
}

impl Node {
    fn new(label: Option<String>) -> Self {
        Self {
            label,
            children: BTreeMap::new(),
        }
    }
}

/// Hierarchical categorical index mapping an ordered criterion path to the
/// countries that satisfy it. Nodes live in a flat arena addressed by
/// index; country names sit as leaf children of depth-5 nodes. Built fresh
/// per query session: create, populate, query, discard.
#[derive(Debug)]
pub struct CategoryIndex {
    nodes: Vec<Node>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None)],
        }
    }

    /// Build the index for a classified cohort. A country is inserted once
    /// per qualifying sector and horizon combination; holding several
    /// sectors or both horizons is legitimate, not a duplicate. A country
    /// with no qualifying horizon is never inserted and stays unreachable
    /// by any horizon-qualified query.
    pub fn build(classifications: &BTreeMap<String, CountryClassification>) -> Self {
        let mut index = Self::new();

        for (country, classification) in classifications {
            for sector in &classification.sectors {
                for horizon in &classification.horizons {
                    index.insert(
                        &CriteriaPath {
                            region: classification.region,
                            development: classification.development,
                            horizon: *horizon,
                            sector: *sector,
                            bucket: classification.bucket,
                        },
                        country,
                    );
                }
            }
        }

        index
    }

    /// Descend along the path, creating nodes as needed, and append the
    /// country as a leaf child of the final node.
    pub fn insert(&mut self, path: &CriteriaPath, country: &str) {
        let mut cursor = 0;
        for token in path.tokens() {
            cursor = self.child_or_insert(cursor, token);
        }
        self.child_or_insert(cursor, country);
    }

    fn child_or_insert(&mut self, parent: NodeId, label: &str) -> NodeId {
        if let Some(&existing) = self.nodes[parent].children.get(label) {
            return existing;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(label.to_string())));
        self.nodes[parent].children.insert(label.to_string(), id);
        id
    }

    /// Countries under the full five-token path, or empty when any token
    /// along the way has no matching child.
    pub fn query(&self, path: &CriteriaPath) -> Vec<String> {
        self.query_tokens(&path.tokens())
    }

    /// Descend along arbitrary tokens and return the labels of the final
    /// node's direct children. A prefix shorter than the full path yields
    /// the next criterion level's labels, not a deep collection; exact
    /// country results require the full path ending in the ethical bucket.
    pub fn query_tokens(&self, tokens: &[&str]) -> Vec<String> {
        let mut cursor = 0;
        for token in tokens {
            match self.nodes[cursor].children.get(*token) {
                Some(&child) => cursor = child,
                None => return Vec::new(),
            }
        }
        self.nodes[cursor].children.keys().cloned().collect()
    }

    #[cfg(test)]
    fn labels(&self) -> Vec<Option<&str>> {
        self.nodes.iter().map(|node| node.label.as_deref()).collect()
    }
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::new()
    }
}
