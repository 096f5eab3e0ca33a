//! Infectious agents and their table.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservoir::ReservoirTable;
use crate::table::{Table, TableEntry};

/// A pathogen record.
///
/// Two agents are equal when they share a name and the same R0 value; the
/// remaining fields are descriptive. The agent owns its reservoir table, so
/// cloning an agent clones every reservoir with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfectiousAgent {
    /// Unique pathogen name.
    pub name: String,
    /// Basic reproduction number. Always greater than zero.
    pub r0: f32,
    /// Transmission medium (air, fluids, ...).
    pub medium: String,
    /// Date of the first recorded infection.
    pub first_date: NaiveDate,
    /// City of the first recorded infection.
    pub first_city: String,
    /// Known carrier species.
    reservoirs: ReservoirTable,
}

impl InfectiousAgent {
    /// Create an agent, taking ownership of its reservoir table.
    pub fn new(
        name: impl Into<String>,
        r0: f32,
        medium: impl Into<String>,
        first_date: NaiveDate,
        first_city: impl Into<String>,
        reservoirs: ReservoirTable,
    ) -> Self {
        debug_assert!(r0 > 0.0, "R0 must be positive");
        Self {
            name: name.into(),
            r0,
            medium: medium.into(),
            first_date,
            first_city: first_city.into(),
            reservoirs,
        }
    }

    /// The carriers associated with this agent.
    pub const fn reservoirs(&self) -> &ReservoirTable {
        &self.reservoirs
    }

    /// Mutable access to the carriers associated with this agent.
    pub const fn reservoirs_mut(&mut self) -> &mut ReservoirTable {
        &mut self.reservoirs
    }
}

impl PartialEq for InfectiousAgent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.r0.to_bits() == other.r0.to_bits()
    }
}

impl TableEntry for InfectiousAgent {
    fn same_key(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn key_label(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for InfectiousAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} r0={} medium={} first={} in {}",
            self.name, self.r0, self.medium, self.first_date, self.first_city
        )
    }
}

/// All known infectious agents, unique by name.
pub type InfectiousAgentTable = Table<InfectiousAgent>;

impl Table<InfectiousAgent> {
    /// Find an agent by name.
    pub fn find(&self, name: &str) -> Option<&InfectiousAgent> {
        self.find_by(|agent| agent.name == name)
    }

    /// Find an agent by name for in-place mutation.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut InfectiousAgent> {
        self.find_by_mut(|agent| agent.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::reservoir::Reservoir;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    fn reservoirs(names: &[(&str, &str)]) -> ReservoirTable {
        let mut table = ReservoirTable::new();
        for (name, species) in names {
            assert!(table.add(Reservoir::new(*name, *species)).is_ok());
        }
        table
    }

    fn h1n1() -> InfectiousAgent {
        InfectiousAgent::new(
            "Influenza H1N1",
            0.2,
            "Air",
            date(2019, 11, 17),
            "New York",
            reservoirs(&[("rat", "Rattus rattus"), ("bat", "Rhinolophus FerrumEquinum")]),
        )
    }

    fn yamagata() -> InfectiousAgent {
        InfectiousAgent::new(
            "Influenza Yamagata",
            0.15,
            "Air",
            date(2019, 10, 22),
            "London",
            reservoirs(&[("rat", "Rattus rattus"), ("monkey", "Macaca mulatta")]),
        )
    }

    #[test]
    fn distinct_agents_are_not_equal() {
        assert_ne!(h1n1(), yamagata());
    }

    #[test]
    fn equality_needs_matching_r0() {
        let mut other = h1n1();
        other.r0 = 0.3;
        assert_ne!(h1n1(), other);
    }

    #[test]
    fn clone_is_independent_of_source() {
        let original = h1n1();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        let removed = copy
            .reservoirs_mut()
            .remove(&Reservoir::new("bat", "Rhinolophus FerrumEquinum"));
        assert!(removed.is_ok());
        assert_eq!(copy.reservoirs().len(), 1);
        assert_eq!(original.reservoirs().len(), 2);
    }

    #[test]
    fn reservoirs_are_reported_by_membership() {
        let agent = yamagata();
        let expected = reservoirs(&[("monkey", "Macaca mulatta"), ("rat", "Rattus rattus")]);
        assert!(agent.reservoirs().same_members(&expected));
    }

    #[test]
    fn agent_table_add_find_remove() {
        let mut table = InfectiousAgentTable::new();
        assert!(table.add(h1n1()).is_ok());
        assert!(table.add(yamagata()).is_ok());
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("Influenza H1N1"), Some(&h1n1()));

        assert!(table.remove(&yamagata()).is_ok());
        assert!(table.find("Influenza Yamagata").is_none());
        assert!(matches!(
            table.remove(&yamagata()),
            Err(RegistryError::NotFound(_))
        ));
        assert_eq!(table.len(), 1);
    }
}
