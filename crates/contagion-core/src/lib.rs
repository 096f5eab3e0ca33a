//! Record types and keyed containers for a toy outbreak registry.
//!
//! The crate tracks reservoirs, infectious agents, countries and their
//! cities, infections, and per-country research snapshots. It offers three
//! container tiers, each with its own indexing contract:
//!
//! - [`table`] -- [`Table`]: an unordered, growable collection with unique
//!   keys, used for reservoirs, agents and infections.
//! - [`city`] -- [`CityList`]: a singly linked, 0-based list of cities with
//!   unique names and whole-list reductions.
//! - [`research`] -- [`ResearchList`]: a doubly linked, 1-based list of
//!   research snapshots that can be ranked in place.
//!
//! Mutations return [`RegistryError`]; lookups return [`Option`].
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use contagion_core::{CaseCounts, City, Country, Research, ResearchList};
//!
//! let since = NaiveDate::from_ymd_opt(2020, 1, 23).unwrap_or_default();
//! let mut italy = Country::new("Italy", false);
//! italy.add_city(City::new("Milan", since, 1_390_000, 1_100)).ok();
//! italy.cities.update("Milan", since, CaseCounts::new(20_000, 50, 3_000, 5_000));
//! assert_eq!(italy.total_deaths(), 3_000);
//!
//! let mut ranking = ResearchList::new();
//! ranking.insert(Research::new(&italy), 1).ok();
//! assert_eq!(ranking.position_of(&italy), Some(1));
//! ```

pub mod agent;
pub mod city;
pub mod country;
pub mod error;
pub mod infection;
pub mod research;
pub mod reservoir;
pub mod table;

// Re-export primary types at crate root.
pub use agent::{InfectiousAgent, InfectiousAgentTable};
pub use city::{CaseCounts, City, CityCounter, CityList};
pub use country::Country;
pub use error::RegistryError;
pub use infection::{Infection, InfectionTable};
pub use research::{Research, ResearchList, ResearchStats, compare_stats};
pub use reservoir::{Reservoir, ReservoirTable};
pub use table::{Table, TableEntry};
