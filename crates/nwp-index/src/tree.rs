//! Typed file-tree index: init time -> lead time -> tag -> file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::codec::FileDescriptor;

/// Files of one lead time, keyed by variable/bundle tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LeadTimeNode {
    files: BTreeMap<String, PathBuf>,
}

impl LeadTimeNode {
    pub fn get(&self, tag: &str) -> Option<&Path> {
        self.files.get(tag).map(PathBuf::as_path)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files.iter().map(|(t, p)| (t.as_str(), p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// All lead times of one model run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InitTimeNode {
    leads: BTreeMap<u32, LeadTimeNode>,
}

impl InitTimeNode {
    pub fn lead(&self, lead_hours: u32) -> Option<&LeadTimeNode> {
        self.leads.get(&lead_hours)
    }

    /// Lead times in ascending order.
    pub fn lead_times(&self) -> impl Iterator<Item = u32> + '_ {
        self.leads.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &LeadTimeNode)> {
        self.leads.iter().map(|(l, n)| (*l, n))
    }
}

/// Read-only index built from one directory scan.
///
/// Leaf paths are relative to the data source root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileTree {
    inits: BTreeMap<DateTime<Utc>, InitTimeNode>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `path` at the position given by `descriptor`.
    ///
    /// Returns the path previously stored under the same key; the new path
    /// replaces it.
    pub fn insert(&mut self, descriptor: &FileDescriptor, path: PathBuf) -> Option<PathBuf> {
        self.inits
            .entry(descriptor.init_time)
            .or_default()
            .leads
            .entry(descriptor.lead_hours)
            .or_default()
            .files
            .insert(descriptor.tag.clone(), path)
    }

    pub fn init(&self, init_time: DateTime<Utc>) -> Option<&InitTimeNode> {
        self.inits.get(&init_time)
    }

    /// Init times in ascending order.
    pub fn init_times(&self) -> Vec<DateTime<Utc>> {
        self.inits.keys().copied().collect()
    }

    pub fn lead_times(&self, init_time: DateTime<Utc>) -> Vec<u32> {
        self.init(init_time)
            .map(|node| node.lead_times().collect())
            .unwrap_or_default()
    }

    pub fn tags(&self, init_time: DateTime<Utc>, lead_hours: u32) -> Vec<&str> {
        self.init(init_time)
            .and_then(|node| node.lead(lead_hours))
            .map(|node| node.tags().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, init_time: DateTime<Utc>, lead_hours: u32, tag: &str) -> Option<&Path> {
        self.init(init_time)?.lead(lead_hours)?.get(tag)
    }

    /// `(lead, path)` pairs for `tag` across all lead times of a run.
    pub fn files_for_tag(&self, init_time: DateTime<Utc>, tag: &str) -> Vec<(u32, &Path)> {
        let Some(node) = self.init(init_time) else {
            return Vec::new();
        };
        node.iter()
            .filter_map(|(lead, files)| files.get(tag).map(|p| (lead, p)))
            .collect()
    }

    /// Every leaf as `(init, lead, tag, path)`.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, u32, &str, &Path)> {
        self.inits.iter().flat_map(|(init, node)| {
            node.iter().flat_map(move |(lead, files)| {
                files.iter().map(move |(tag, path)| (*init, lead, tag, path))
            })
        })
    }

    /// Number of leaf files.
    pub fn len(&self) -> usize {
        self.inits
            .values()
            .flat_map(|node| node.leads.values())
            .map(LeadTimeNode::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inits.is_empty()
    }
}
