/// Judgment file: the caller-side persistence of recorded preferences.
///
/// Stored as JSON keyed by item *names*, not positions, so editing or
/// reordering the items file does not scramble earlier answers.
use pairsort_core::{ItemId, RankError, RankingList};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::bail;
use crate::config::read_if_exists;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFact {
    pub greater: String,
    pub lesser: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentLog {
    #[serde(default)]
    pub facts: Vec<NamedFact>,
    #[serde(default)]
    pub ignored: Vec<String>,
    /// Pivot seed used for this list. Reusing it keeps every question asked
    /// part of one consistent sort, so no answer is wasted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Load a judgment file. A list with no file yet starts from an empty log.
pub fn load_log(path: &Path) -> JudgmentLog {
    let Some(content) = read_if_exists(path, "judgments") else {
        return JudgmentLog::default();
    };
    serde_json::from_str(&content)
        .unwrap_or_else(|e| bail(format!("Failed to parse judgments at {}: {e}", path.display())))
}

pub fn save_log(path: &Path, log: &JudgmentLog) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }
    let json = serde_json::to_string_pretty(log)
        .unwrap_or_else(|e| bail(format!("Failed to serialize judgments: {e}")));
    std::fs::write(path, json + "\n")
        .unwrap_or_else(|e| bail(format!("Failed to write judgments to {}: {e}", path.display())));
}

/// Items, their ranking list, and the log that produced it.
///
/// Item IDs are positions in `names`. Names that only the log mentions
/// (dropped from the items file since) are numbered after them and held in
/// the list as ignored, so their judgments still order the listed items.
pub struct Session {
    pub names: Vec<String>,
    pub list: RankingList,
    pub log: JudgmentLog,
    ids: HashMap<String, ItemId>,
    unlisted: Vec<String>,
}

impl Session {
    /// Replay `log` onto a fresh list over `names`.
    ///
    /// A stored judgment that contradicts earlier ones is an error.
    pub fn from_log(names: Vec<String>, log: JudgmentLog) -> Result<Self, RankError> {
        let ids: HashMap<String, ItemId> = names.iter().cloned().zip(0..).collect();

        let mut known = ids.clone();
        let mut unlisted = Vec::new();
        let mut intern = |name: &String| -> ItemId {
            *known.entry(name.clone()).or_insert_with(|| {
                unlisted.push(name.clone());
                (names.len() + unlisted.len() - 1) as ItemId
            })
        };
        let edges: Vec<(ItemId, ItemId)> = log
            .facts
            .iter()
            .map(|fact| (intern(&fact.greater), intern(&fact.lesser)))
            .collect();

        if !unlisted.is_empty() {
            debug!(count = unlisted.len(), "judgments mention items not in the list");
        }

        let item_ids: Vec<ItemId> = (0..(names.len() + unlisted.len()) as ItemId).collect();
        let mut list = RankingList::new(&item_ids)?;
        for &id in &item_ids[names.len()..] {
            list.ignore(id)?;
        }

        for name in &log.ignored {
            match ids.get(name) {
                Some(&id) => list.ignore(id)?,
                None => debug!(item = %name, "ignored item not in list"),
            }
        }

        for (greater, lesser) in edges {
            list.record_preference(greater, lesser)?;
        }

        Ok(Session { names, list, log, ids, unlisted })
    }

    /// ID of a listed item. Names known only from the log have none.
    pub fn id_of(&self, name: &str) -> Option<ItemId> {
        self.ids.get(name).copied()
    }

    pub fn is_listed(&self, id: ItemId) -> bool {
        (id as usize) < self.names.len()
    }

    pub fn name_of(&self, id: ItemId) -> &str {
        let pos = id as usize;
        match self.names.get(pos) {
            Some(name) => name,
            None => &self.unlisted[pos - self.names.len()],
        }
    }

    /// Record one judgment. Returns false if it was already implied.
    pub fn prefer(&mut self, greater: ItemId, lesser: ItemId) -> Result<bool, RankError> {
        let added = self.list.record_preference(greater, lesser)?;
        if added {
            self.log.facts.push(NamedFact {
                greater: self.name_of(greater).to_string(),
                lesser: self.name_of(lesser).to_string(),
            });
        }
        Ok(added)
    }

    pub fn ignore(&mut self, id: ItemId) -> Result<(), RankError> {
        self.list.ignore(id)?;
        let name = self.name_of(id).to_string();
        if !self.log.ignored.contains(&name) {
            self.log.ignored.push(name);
        }
        Ok(())
    }

    pub fn restore(&mut self, id: ItemId) -> Result<(), RankError> {
        if !self.is_listed(id) {
            return Err(RankError::UnknownItem(id));
        }
        self.list.restore(id)?;
        let name = self.name_of(id).to_string();
        self.log.ignored.retain(|n| *n != name);
        Ok(())
    }

    /// Names in the given ID order.
    pub fn names_for(&self, ids: &[ItemId]) -> Vec<String> {
        ids.iter().map(|&id| self.name_of(id).to_string()).collect()
    }

    /// Ignored items from the items file, leaving out names only the log knows.
    pub fn listed_ignored(&self, ids: &[ItemId]) -> Vec<String> {
        let listed: Vec<ItemId> = ids.iter().copied().filter(|&id| self.is_listed(id)).collect();
        self.names_for(&listed)
    }
}
