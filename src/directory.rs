use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::parser::model::{Contribution, PersonIdentity};

#[derive(Debug, Deserialize)]
struct ProfileDump {
    profiles: Vec<Profile>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    personal: Personal,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Personal {
    first_name: String,
    last_name: String,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    uuid: String,
}

/// Known members of parliament, keyed by exact (first name, last name).
#[derive(Debug, Default, Clone)]
pub struct PersonDirectory {
    people: HashMap<(String, String), PersonIdentity>,
}

impl PersonDirectory {
    /// Parse an abgeordnetenwatch-style profile dump.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: ProfileDump = serde_json::from_str(json).context("invalid profile dump")?;
        let mut people = HashMap::with_capacity(dump.profiles.len());
        for p in dump.profiles {
            let identity = PersonIdentity {
                uuid: p.meta.uuid,
                image_url: p.personal.picture.and_then(|pic| pic.url),
            };
            // First entry wins, like a linear scan would.
            people
                .entry((p.personal.first_name, p.personal.last_name))
                .or_insert(identity);
        }
        Ok(PersonDirectory { people })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading speaker directory {}", path.display()))?;
        let dir = Self::from_json(&json)?;
        if dir.is_empty() {
            warn!(path = %path.display(), "speaker directory has no profiles");
        }
        info!(path = %path.display(), people = dir.len(), "loaded speaker directory");
        Ok(dir)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn resolve(&self, first_name: &str, last_name: &str) -> Option<&PersonIdentity> {
        self.people
            .get(&(first_name.to_string(), last_name.to_string()))
    }

    /// Attach identities in place; returns how many speakers were resolved.
    pub fn resolve_all(&self, contributions: &mut [Contribution]) -> usize {
        let mut resolved = 0;
        for c in contributions.iter_mut() {
            if let Some(identity) = self.resolve(&c.speaker.first_name, &c.speaker.last_name) {
                c.speaker.identity = Some(identity.clone());
                resolved += 1;
            }
        }
        resolved
    }
}
