// Symbol tables for Roxas.
// A table maps identifier names to a caller-defined record for the lifetime
// of one compilation unit's analysis.

use std::collections::HashMap;
use thiserror::Error;

/// Lookup of a name that was never inserted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol not found: {name}")]
pub struct SymbolNotFound {
    pub name: String,
}

/// Name -> `T` store.
///
/// Not `Clone`: a table has a single owner for its whole lifetime.
/// Iteration is not exposed.
#[derive(Debug)]
pub struct SymbolTable<T> {
    table: HashMap<String, T>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&T, SymbolNotFound> {
        self.table.get(name).ok_or_else(|| SymbolNotFound {
            name: name.to_string(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut T, SymbolNotFound> {
        self.table.get_mut(name).ok_or_else(|| SymbolNotFound {
            name: name.to_string(),
        })
    }

    /// Insert or overwrite. Returns the record previously stored under
    /// `name`, if any.
    pub fn set(&mut self, name: impl Into<String>, entry: T) -> Option<T> {
        self.table.insert(name.into(), entry)
    }

    pub fn remove(&mut self, name: &str) -> Result<T, SymbolNotFound> {
        self.table.remove(name).ok_or_else(|| SymbolNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A typical record for a compiler front half: one row per identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolRecord {
    pub type_name: String,
    pub size: usize,
    pub line_declared: usize,
    pub line_used: Option<usize>,
    pub address: Option<u64>,
}
