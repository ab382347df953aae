use crate::data::Harvester;

use super::{normalize_name, HarvestError};

/// The known harvesters, in insertion order.
#[derive(Debug, Default)]
pub struct Registry {
    harvesters: Vec<Harvester>,
}

impl Registry {
    pub fn new(harvesters: Vec<Harvester>) -> Registry {
        Registry { harvesters }
    }

    /// Registers a new harvester under the title-cased `name`.
    /// Ids are never reused: the next id is always one past the current maximum.
    pub fn add(&mut self, name: &str) -> Result<&Harvester, HarvestError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(HarvestError::EmptyName);
        }

        if self.harvesters.iter().any(|h| h.name == name) {
            return Err(HarvestError::DuplicateHarvester(name));
        }

        let id = self.next_id();
        self.harvesters.push(Harvester { id, name });

        Ok(&self.harvesters[self.harvesters.len() - 1])
    }

    pub fn lookup(&self, name: &str) -> Option<&Harvester> {
        let name = normalize_name(name);
        self.harvesters.iter().find(|h| h.name == name)
    }

    pub fn next_id(&self) -> u32 {
        self.harvesters.iter().map(|h| h.id).max().map_or(1, |id| id + 1)
    }

    pub fn harvesters(&self) -> &[Harvester] {
        &self.harvesters
    }

    pub fn into_harvesters(self) -> Vec<Harvester> {
        self.harvesters
    }
}
