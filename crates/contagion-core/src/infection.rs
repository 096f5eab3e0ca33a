//! Infections: one agent spreading in one country, with running totals.
//!
//! An [`Infection`] owns independent copies of its agent and country. Its
//! totals are either accumulated through [`Infection::update`] or recomputed
//! from the owned country's cities with [`Infection::refresh_from_country`].
//! The [`InfectionTable`] is keyed by the (agent name, country name) pair and
//! carries the per-agent aggregation formulas.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::agent::InfectiousAgent;
use crate::city::CaseCounts;
use crate::country::Country;
use crate::table::{Table, TableEntry};

/// An infectious agent present in a country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Infection {
    /// The pathogen.
    pub agent: InfectiousAgent,
    /// The affected country, with its cities.
    pub country: Country,
    /// Date the infection was first recorded in the country.
    pub first_date: NaiveDate,
    /// Accumulated confirmed cases.
    pub total_cases: u64,
    /// Accumulated critical cases.
    pub total_critical_cases: u64,
    /// Accumulated deaths.
    pub total_deaths: u64,
    /// Accumulated recoveries.
    pub total_recovered: u64,
}

impl Infection {
    /// Record a new infection with every total at zero.
    ///
    /// Both `agent` and `country` are cloned, so later changes to the
    /// originals do not reach the infection.
    pub fn new(agent: &InfectiousAgent, country: &Country, first_date: NaiveDate) -> Self {
        Self {
            agent: agent.clone(),
            country: country.clone(),
            first_date,
            total_cases: 0,
            total_critical_cases: 0,
            total_deaths: 0,
            total_recovered: 0,
        }
    }

    /// Add `delta` to the running totals.
    pub fn update(&mut self, delta: CaseCounts) {
        self.total_cases = self.total_cases.saturating_add(u64::from(delta.cases));
        self.total_critical_cases = self
            .total_critical_cases
            .saturating_add(u64::from(delta.critical_cases));
        self.total_deaths = self.total_deaths.saturating_add(u64::from(delta.deaths));
        self.total_recovered = self
            .total_recovered
            .saturating_add(u64::from(delta.recovered));
    }

    /// Replace the totals with the sums over the owned country's cities.
    pub fn refresh_from_country(&mut self) {
        self.total_cases = non_negative(self.country.total_cases());
        self.total_critical_cases = non_negative(self.country.total_critical_cases());
        self.total_deaths = non_negative(self.country.total_deaths());
        self.total_recovered = non_negative(self.country.total_recovered());
        tracing::debug!(
            agent = %self.agent.name,
            country = %self.country.name,
            cases = self.total_cases,
            deaths = self.total_deaths,
            "infection refreshed"
        );
    }
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl PartialEq for Infection {
    fn eq(&self, other: &Self) -> bool {
        self.same_key(other)
    }
}

impl TableEntry for Infection {
    fn same_key(&self, other: &Self) -> bool {
        self.agent.name == other.agent.name && self.country.name == other.country.name
    }

    fn key_label(&self) -> String {
        format!("{}/{}", self.agent.name, self.country.name)
    }
}

impl fmt::Display for Infection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} since {}: cases={} critical={} deaths={} recovered={}",
            self.agent.name,
            self.country.name,
            self.first_date,
            self.total_cases,
            self.total_critical_cases,
            self.total_deaths,
            self.total_recovered
        )
    }
}

/// Infections, unique by (agent name, country name).
pub type InfectionTable = Table<Infection>;

impl Table<Infection> {
    /// Find the infection of `agent_name` in `country_name`.
    pub fn find(&self, agent_name: &str, country_name: &str) -> Option<&Infection> {
        self.find_by(|i| i.agent.name == agent_name && i.country.name == country_name)
    }

    /// Find the infection of `agent_name` in `country_name` for mutation.
    pub fn find_mut(&mut self, agent_name: &str, country_name: &str) -> Option<&mut Infection> {
        self.find_by_mut(|i| i.agent.name == agent_name && i.country.name == country_name)
    }

    /// The worst infection of `agent_name`: most cases, then most deaths.
    ///
    /// When two infections tie on both, the one added first wins. Returns
    /// `None` if the agent has no infection in the table.
    pub fn max_infection(&self, agent_name: &str) -> Option<&Infection> {
        self.iter()
            .filter(|infection| infection.agent.name == agent_name)
            .fold(None, |best: Option<&Infection>, candidate| match best {
                Some(current)
                    if (candidate.total_cases, candidate.total_deaths)
                        <= (current.total_cases, current.total_deaths) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            })
    }

    /// Deaths over cases, summed across every infection of `agent_name`.
    ///
    /// Returns `None` when the agent has no recorded cases.
    #[allow(clippy::cast_precision_loss)]
    pub fn mortality_rate(&self, agent_name: &str) -> Option<f64> {
        let (cases, deaths) = self
            .iter()
            .filter(|infection| infection.agent.name == agent_name)
            .fold((0_u64, 0_u64), |(cases, deaths), infection| {
                (
                    cases.saturating_add(infection.total_cases),
                    deaths.saturating_add(infection.total_deaths),
                )
            });
        (cases > 0).then(|| deaths as f64 / cases as f64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::error::RegistryError;
    use crate::reservoir::{Reservoir, ReservoirTable};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ebola() -> InfectiousAgent {
        InfectiousAgent::new(
            "Ebola",
            25.0,
            "Fluids",
            date(2013, 12, 1),
            "Meliandou",
            ReservoirTable::new(),
        )
    }

    fn sars() -> InfectiousAgent {
        let mut reservoirs = ReservoirTable::new();
        reservoirs.add(Reservoir::new("bat", "Rhinolophus FerrumEquinum")).unwrap();
        InfectiousAgent::new("SARS-CoV-2", 1.3, "Air", date(2019, 12, 1), "Wuhan", reservoirs)
    }

    fn ebola_table() -> InfectionTable {
        let mut table = InfectionTable::new();
        let figures = [
            ("Sierra Leone", CaseCounts::new(10_000, 0, 3_956, 6_044)),
            ("Liberia", CaseCounts::new(10_000, 0, 4_809, 5_191)),
            ("Guinea", CaseCounts::new(3_800, 0, 2_500, 1_300)),
        ];
        for (country, delta) in figures {
            let country = Country::new(country, false);
            table.add(Infection::new(&ebola(), &country, date(2014, 3, 1))).unwrap();
            table.find_mut("Ebola", &country.name).unwrap().update(delta);
        }
        table
    }

    #[test]
    fn new_infection_starts_at_zero() {
        let infection = Infection::new(&sars(), &Country::new("China", false), date(2019, 12, 1));
        assert_eq!(infection.total_cases, 0);
        assert_eq!(infection.total_deaths, 0);
        assert_eq!(infection.agent, sars());
    }

    #[test]
    fn updates_accumulate() {
        let mut infection =
            Infection::new(&sars(), &Country::new("China", false), date(2019, 12, 1));
        infection.update(CaseCounts::new(80_711, 0, 3_042, 0));
        infection.update(CaseCounts::new(2_000, 2_002, 1_000, 1_001));
        assert_eq!(infection.total_cases, 82_711);
        assert_eq!(infection.total_deaths, 4_042);
        assert_eq!(infection.total_critical_cases, 2_002);
        assert_eq!(infection.total_recovered, 1_001);
    }

    #[test]
    fn refresh_recomputes_from_cities() {
        let mut italy = Country::new("Italy", false);
        let milan = City::new("Milan", date(2020, 1, 23), 1_390_000, 1_100)
            .with_counts(CaseCounts::new(20_000, 50, 3_000, 5_000));
        let como = City::new("Como", date(2020, 2, 1), 507_500, 100)
            .with_counts(CaseCounts::new(5_000, 15, 500, 1_000));
        italy.add_city(milan).unwrap();
        italy.add_city(como).unwrap();

        let mut infection = Infection::new(&sars(), &italy, date(2020, 1, 31));
        infection.update(CaseCounts::new(1, 1, 1, 1));
        infection.refresh_from_country();
        assert_eq!(infection.total_cases, 25_000);
        assert_eq!(infection.total_critical_cases, 65);
        assert_eq!(infection.total_deaths, 3_500);
        assert_eq!(infection.total_recovered, 6_000);
    }

    #[test]
    fn key_is_agent_and_country() {
        let mut table = InfectionTable::new();
        let china = Country::new("China", false);
        table.add(Infection::new(&sars(), &china, date(2019, 12, 1))).unwrap();
        table.add(Infection::new(&ebola(), &china, date(2020, 1, 1))).unwrap();
        let again = Infection::new(&sars(), &china, date(2021, 1, 1));
        assert!(matches!(table.add(again), Err(RegistryError::Duplicated(ref k)) if k == "SARS-CoV-2/China"));
        assert_eq!(table.len(), 2);
        assert!(table.find("Ebola", "China").is_some());
        assert!(table.find("Ebola", "Italy").is_none());
    }

    #[test]
    fn max_infection_prefers_cases_then_deaths() {
        let table = ebola_table();
        let worst = table.max_infection("Ebola").unwrap();
        assert_eq!(worst.country.name, "Liberia");
        assert!(table.max_infection("SARS-CoV-2").is_none());
    }

    #[test]
    fn max_infection_full_tie_keeps_earliest() {
        let mut table = InfectionTable::new();
        for name in ["Guinea", "Liberia"] {
            let mut infection =
                Infection::new(&ebola(), &Country::new(name, false), date(2014, 1, 1));
            infection.update(CaseCounts::new(10, 0, 5, 0));
            table.add(infection).unwrap();
        }
        assert_eq!(table.max_infection("Ebola").unwrap().country.name, "Guinea");
    }

    #[test]
    fn mortality_rate_is_deaths_over_cases() {
        let table = ebola_table();
        let rate = table.mortality_rate("Ebola").unwrap();
        assert!((rate - 0.473_319_3).abs() < 1e-6);
    }

    #[test]
    fn mortality_rate_without_cases_is_none() {
        let mut table = InfectionTable::new();
        table
            .add(Infection::new(&ebola(), &Country::new("Guinea", false), date(2014, 1, 1)))
            .unwrap();
        assert!(table.mortality_rate("Ebola").is_none());
        assert!(table.mortality_rate("Unknown").is_none());
    }

    #[test]
    fn same_members_ignores_order_and_totals() {
        let table = ebola_table();
        let mut other = InfectionTable::new();
        for name in ["Guinea", "Sierra Leone", "Liberia"] {
            other
                .add(Infection::new(&ebola(), &Country::new(name, false), date(2014, 1, 1)))
                .unwrap();
        }
        assert!(table.same_members(&other));
    }
}
