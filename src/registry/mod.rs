// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Function registry.
//!
//! The registry is the table of every function id the library knows about,
//! together with how each one is typed, switched and linked. It is checked
//! once when built and never changes afterwards, so it can be shared freely
//! between threads.
//!
//! # Examples
//!
//! ```
//! use daichi_hvac::registry::Registry;
//! use daichi_hvac::types::{FunctionCategory, FunctionId};
//!
//! let registry = Registry::builtin();
//!
//! let fan = registry.definition_for(FunctionId::FAN_SPEED).unwrap();
//! assert_eq!(fan.linked_function_id, Some(FunctionId::FAN_SPEED_AUTO));
//!
//! let modes = registry.definitions_in_category(FunctionCategory::OperatingMode);
//! assert_eq!(modes.len(), 5);
//!
//! assert!(registry.definition_for(FunctionId::new(999)).is_err());
//! ```

mod builtin;
mod definition;

pub use definition::{
    ActivationKind, FunctionDefinition, ParameterField, ParameterKind, ParameterSchema,
    ValueRange, ValueType,
};

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::{RegistryError, UnknownFunction};
use crate::types::{FunctionCategory, FunctionId};

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    Registry::with_version(builtin::definitions(), Some(builtin::VERSION))
        .unwrap_or_else(|e| panic!("built-in function table is invalid: {e}"))
});

/// Versioned function table as stored on disk.
#[derive(Debug, Deserialize)]
struct TableDocument {
    #[serde(default)]
    version: Option<u32>,
    functions: Vec<FunctionDefinition>,
}

/// Read-only table of function definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    version: Option<u32>,
    definitions: Vec<FunctionDefinition>,
    index: HashMap<FunctionId, usize>,
    depths: HashMap<FunctionId, usize>,
}

impl Registry {
    /// Builds a registry from a list of definitions.
    ///
    /// # Errors
    ///
    /// Returns a `RegistryError` if two definitions share an id, a link does
    /// not resolve, links form a cycle, an integer-range definition has a
    /// missing or inverted range, or only half of a command pair is declared.
    pub fn new(definitions: Vec<FunctionDefinition>) -> Result<Self, RegistryError> {
        Self::with_version(definitions, None)
    }

    /// Loads a versioned table from JSON.
    ///
    /// The document has the shape `{"version": 1, "functions": [...]}`; each
    /// entry uses the camelCase field names of [`FunctionDefinition`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Json` if the document does not match the
    /// schema, or any of the errors of [`Registry::new`].
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let document: TableDocument = serde_json::from_str(json)?;
        Self::with_version(document.functions, document.version)
    }

    fn with_version(
        definitions: Vec<FunctionDefinition>,
        version: Option<u32>,
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (position, def) in definitions.iter().enumerate() {
            if index.insert(def.id, position).is_some() {
                return Err(RegistryError::DuplicateId(def.id));
            }
            check_shape(def)?;
        }

        for def in &definitions {
            if let Some(linked) = def.linked_function_id
                && !index.contains_key(&linked)
            {
                return Err(RegistryError::DanglingLink {
                    function: def.id,
                    linked,
                });
            }
        }

        let depths = dependency_depths(&definitions, &index)?;

        tracing::debug!(
            functions = definitions.len(),
            version = ?version,
            "Function registry loaded"
        );

        Ok(Self {
            version,
            definitions,
            index,
            depths,
        })
    }

    /// Returns the process-wide built-in registry.
    ///
    /// Built on first use and shared afterwards.
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in table fails its load-time checks.
    /// The table is static, so this cannot happen at runtime in a released
    /// build.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Returns the table version, when the source declared one.
    #[must_use]
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Looks up a definition.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFunction` if the id is not in the table.
    pub fn definition_for(&self, id: FunctionId) -> Result<&FunctionDefinition, UnknownFunction> {
        self.get(id).ok_or(UnknownFunction(id))
    }

    /// Looks up a definition, returning `None` if unknown.
    #[must_use]
    pub fn get(&self, id: FunctionId) -> Option<&FunctionDefinition> {
        self.index.get(&id).map(|&position| &self.definitions[position])
    }

    /// Returns `true` if the id is in the table.
    #[must_use]
    pub fn contains(&self, id: FunctionId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns all definitions in table order.
    #[must_use]
    pub fn definitions(&self) -> &[FunctionDefinition] {
        &self.definitions
    }

    /// Returns the definitions of one category, in ascending id order.
    #[must_use]
    pub fn definitions_in_category(&self, category: FunctionCategory) -> Vec<&FunctionDefinition> {
        let mut defs: Vec<_> = self
            .definitions
            .iter()
            .filter(|def| def.category() == category)
            .collect();
        defs.sort_by_key(|def| def.id);
        defs
    }

    /// Returns the length of the link chain starting at `id`.
    ///
    /// Functions without a link have depth 0. Returns `None` for unknown ids.
    #[must_use]
    pub fn dependency_depth(&self, id: FunctionId) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn check_shape(def: &FunctionDefinition) -> Result<(), RegistryError> {
    if def.value_type == ValueType::IntegerRange && def.range.is_none() {
        return Err(RegistryError::MissingRange(def.id));
    }
    if let Some(range) = def.range
        && range.min > range.max
    {
        return Err(RegistryError::InvalidRange {
            function: def.id,
            min: range.min,
            max: range.max,
        });
    }
    if def.on_command.is_some() != def.off_command.is_some() {
        return Err(RegistryError::IncompleteCommandPair(def.id));
    }
    Ok(())
}

/// Walks every link chain once. All links are known to resolve.
fn dependency_depths(
    definitions: &[FunctionDefinition],
    index: &HashMap<FunctionId, usize>,
) -> Result<HashMap<FunctionId, usize>, RegistryError> {
    let mut depths: HashMap<FunctionId, usize> = HashMap::with_capacity(definitions.len());

    for def in definitions {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = def.id;

        // follow links until a known depth or the root
        let base = loop {
            if let Some(&depth) = depths.get(&current) {
                break depth;
            }
            if !seen.insert(current) {
                return Err(RegistryError::DependencyCycle(current));
            }
            chain.push(current);
            match index
                .get(&current)
                .and_then(|&position| definitions[position].linked_function_id)
            {
                Some(next) => current = next,
                None => {
                    chain.pop();
                    depths.insert(current, 0);
                    break 0;
                }
            }
        };

        for (offset, id) in chain.iter().rev().enumerate() {
            depths.insert(*id, base + offset + 1);
        }
    }

    Ok(depths)
}
