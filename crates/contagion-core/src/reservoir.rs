//! Reservoirs: animal or environmental carriers of an infectious agent.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::table::{Table, TableEntry};

/// A carrier species, keyed by its common name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservoir {
    /// Common name. Unique within a [`ReservoirTable`].
    pub name: String,
    /// Scientific species name.
    pub species: String,
}

impl Reservoir {
    /// Create a reservoir from its common and scientific names.
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
        }
    }
}

impl TableEntry for Reservoir {
    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn key_label(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Reservoir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.species)
    }
}

/// The reservoirs known for one infectious agent, unique by name.
pub type ReservoirTable = Table<Reservoir>;

impl Table<Reservoir> {
    /// Find a reservoir by name.
    pub fn find(&self, name: &str) -> Option<&Reservoir> {
        self.find_by(|reservoir| reservoir.name == name)
    }
}
