//! Hash table with separate chaining, plus the visualizer session around it.
//!
//! The hash is deliberately naive: the sum of the key's character codes
//! modulo the bucket count. Anagrams always collide, which is the point.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::HashConfig;
use crate::error::{DsvizError, Result};
use crate::timer::Notice;

/// The worked calculation behind a bucket index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTrace {
    /// One term per UTF-16 code unit. Half of a surrogate pair shows as U+FFFD.
    pub terms: Vec<(char, u32)>,
    pub sum: u64,
    pub buckets: usize,
    pub index: usize,
}

impl fmt::Display for HashTrace {
    /// `c(99) + a(97) + t(116) = 312 % 8 = 0`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (ch, code)) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{ch}({code})")?;
        }
        write!(f, " = {} % {} = {}", self.sum, self.buckets, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Raised when a new key lands in a bucket that already had entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub index: usize,
    pub trace: HashTrace,
    pub existing_keys: Vec<String>,
    pub new_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Empty key or value
    Ignored,
    Inserted { trace: HashTrace },
    /// Key already present; value replaced in place
    Updated { trace: HashTrace },
    Collided(Collision),
}

impl InsertOutcome {
    pub fn trace(&self) -> Option<&HashTrace> {
        match self {
            InsertOutcome::Ignored => None,
            InsertOutcome::Inserted { trace } | InsertOutcome::Updated { trace } => Some(trace),
            InsertOutcome::Collided(collision) => Some(&collision.trace),
        }
    }
}

/// Fixed-size table; buckets that hold nothing are absent from the map.
#[derive(Debug, Clone)]
pub struct ChainedTable {
    buckets: usize,
    chains: BTreeMap<usize, Vec<Entry>>,
}

impl ChainedTable {
    pub fn new(buckets: usize) -> Result<Self> {
        if buckets == 0 {
            return Err(DsvizError::config("hash table needs at least one bucket"));
        }
        Ok(Self {
            buckets,
            chains: BTreeMap::new(),
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets
    }

    /// Sum of UTF-16 code units modulo the bucket count, with the working shown
    pub fn hash(&self, key: &str) -> HashTrace {
        let terms: Vec<(char, u32)> = key
            .encode_utf16()
            .map(|unit| {
                let ch = char::decode_utf16([unit])
                    .next()
                    .and_then(|decoded| decoded.ok())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                (ch, u32::from(unit))
            })
            .collect();
        let sum: u64 = terms.iter().map(|(_, code)| u64::from(*code)).sum();
        let index = (sum % self.buckets as u64) as usize;
        HashTrace {
            terms,
            sum,
            buckets: self.buckets,
            index,
        }
    }

    pub fn insert(&mut self, key: &str, value: &str) -> InsertOutcome {
        if key.is_empty() || value.is_empty() {
            return InsertOutcome::Ignored;
        }

        let trace = self.hash(key);
        let chain = self.chains.entry(trace.index).or_default();

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            entry.value = value.to_string();
            debug!(key, index = trace.index, "updated existing key");
            return InsertOutcome::Updated { trace };
        }

        let existing_keys: Vec<String> = chain.iter().map(|entry| entry.key.clone()).collect();
        chain.push(Entry {
            key: key.to_string(),
            value: value.to_string(),
        });

        if existing_keys.is_empty() {
            debug!(key, index = trace.index, "inserted");
            return InsertOutcome::Inserted { trace };
        }

        info!(
            key,
            index = trace.index,
            chain_len = existing_keys.len() + 1,
            "collision resolved by chaining"
        );
        InsertOutcome::Collided(Collision {
            index: trace.index,
            trace,
            existing_keys,
            new_key: key.to_string(),
        })
    }

    /// Remove `key` from `bucket`. An emptied bucket is dropped entirely.
    pub fn delete(&mut self, bucket: usize, key: &str) -> bool {
        let Some(chain) = self.chains.get_mut(&bucket) else {
            return false;
        };
        let before = chain.len();
        chain.retain(|entry| entry.key != key);
        let removed = chain.len() != before;
        if chain.is_empty() {
            self.chains.remove(&bucket);
        }
        if removed {
            debug!(key, bucket, "deleted");
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.chains
            .get(&self.hash(key).index)?
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Chain at `index`, or `None` if the bucket has never held (or no longer holds) anything
    pub fn bucket(&self, index: usize) -> Option<&[Entry]> {
        self.chains.get(&index).map(Vec::as_slice)
    }

    /// Occupied buckets in index order
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &[Entry])> {
        self.chains.iter().map(|(index, chain)| (*index, chain.as_slice()))
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Last thing that happened, shown in the operation log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert {
        index: usize,
        key: String,
        value: String,
        trace: HashTrace,
        updated: bool,
    },
    Delete {
        index: usize,
        key: String,
    },
}

/// Which input field receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Key,
    Value,
}

/// Interactive session: input fields, the table, and its timed notices.
#[derive(Debug, Clone)]
pub struct HashVisualizer {
    table: ChainedTable,
    pub key_input: String,
    pub value_input: String,
    pub field: Field,
    collision: Notice<Collision>,
    highlight: Notice<usize>,
    last_operation: Option<Operation>,
}

impl HashVisualizer {
    pub fn new(config: &HashConfig) -> Result<Self> {
        Ok(Self {
            table: ChainedTable::new(config.buckets)?,
            key_input: String::new(),
            value_input: String::new(),
            field: Field::Key,
            collision: Notice::new(config.collision_notice()),
            highlight: Notice::new(config.highlight()),
            last_operation: None,
        })
    }

    /// Insert the typed key/value. Empty fields leave everything untouched.
    pub fn submit(&mut self, now: Instant) -> InsertOutcome {
        let key = self.key_input.clone();
        let value = self.value_input.clone();
        let outcome = self.insert(&key, &value, now);
        if outcome != InsertOutcome::Ignored {
            self.key_input.clear();
            self.value_input.clear();
            self.field = Field::Key;
        }
        outcome
    }

    pub fn insert(&mut self, key: &str, value: &str, now: Instant) -> InsertOutcome {
        let outcome = self.table.insert(key, value);
        if let InsertOutcome::Collided(collision) = &outcome {
            self.collision.show(collision.clone(), now);
        }
        if let Some(trace) = outcome.trace() {
            self.last_operation = Some(Operation::Insert {
                index: trace.index,
                key: key.to_string(),
                value: value.to_string(),
                trace: trace.clone(),
                updated: matches!(outcome, InsertOutcome::Updated { .. }),
            });
            self.highlight.show(trace.index, now);
        }
        outcome
    }

    /// Delete an entry; also dismisses any collision notice
    pub fn delete(&mut self, bucket: usize, key: &str) -> bool {
        let removed = self.table.delete(bucket, key);
        if removed {
            self.last_operation = Some(Operation::Delete {
                index: bucket,
                key: key.to_string(),
            });
            self.collision.dismiss();
        }
        removed
    }

    /// Clear expired notices
    pub fn expire(&mut self, now: Instant) {
        self.collision.expire(now);
        self.highlight.expire(now);
    }

    pub fn table(&self) -> &ChainedTable {
        &self.table
    }

    pub fn collision(&self) -> Option<&Collision> {
        self.collision.get()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight.get().copied()
    }

    /// The operation log, hidden while a collision notice is up
    pub fn visible_operation(&self) -> Option<&Operation> {
        if self.collision.is_active() {
            return None;
        }
        self.last_operation.as_ref()
    }

    /// Entries flattened in display order, for list selection
    pub fn entries(&self) -> Vec<(usize, &Entry)> {
        self.table
            .occupied()
            .flat_map(|(index, chain)| chain.iter().map(move |entry| (index, entry)))
            .collect()
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            Field::Key => &mut self.key_input,
            Field::Value => &mut self.value_input,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Key => Field::Value,
            Field::Value => Field::Key,
        };
    }
}
