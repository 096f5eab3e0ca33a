//! Countries: a named owner of an ordered [`CityList`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::city::{City, CityList};
use crate::error::RegistryError;

/// A country and the cities it owns.
///
/// Countries compare equal by name only. Cloning a country clones its whole
/// city chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    /// Unique country name.
    pub name: String,
    /// Health system collapse flag. Carried but never consulted.
    pub health_collapse: bool,
    /// Owned cities, in insertion order.
    pub cities: CityList,
}

impl Country {
    /// Create a country with no cities.
    pub fn new(name: impl Into<String>, health_collapse: bool) -> Self {
        Self {
            name: name.into(),
            health_collapse,
            cities: CityList::new(),
        }
    }

    /// Append `city` to the country's city list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicated`] if the country already owns a
    /// city with that name.
    pub fn add_city(&mut self, city: City) -> Result<(), RegistryError> {
        self.cities.insert(city, CityList::APPEND)
    }

    /// Living population across all cities.
    pub fn total_population(&self) -> i64 {
        self.cities.population_sum()
    }

    /// Confirmed cases across all cities.
    pub fn total_cases(&self) -> i64 {
        self.cities.cases_sum()
    }

    /// Critical cases across all cities.
    pub fn total_critical_cases(&self) -> i64 {
        self.cities.critical_cases_sum()
    }

    /// Deaths across all cities.
    pub fn total_deaths(&self) -> i64 {
        self.cities.deaths_sum()
    }

    /// Recoveries across all cities.
    pub fn total_recovered(&self) -> i64 {
        self.cities.recovered_sum()
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (collapsed: {})", self.name, self.health_collapse)?;
        write!(f, "{}", self.cities)
    }
}
