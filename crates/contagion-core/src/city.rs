//! Cities and the singly linked, index-addressed city list.
//!
//! A [`CityList`] is an owned chain of boxed nodes. Positions are 0-based:
//! index `0` is the head and the valid positions for [`CityList::get`] and
//! [`CityList::delete`] are `0..len`. Insertion accepts `0..=len`, plus the
//! [`CityList::APPEND`] sentinel. The length is recomputed by walking the
//! chain, so it can never drift from the reachable node count.
//!
//! Aggregates over the chain come in two forms, an explicit loop
//! ([`CityList::total_iterative`]) and an accumulator-passing recursion
//! ([`CityList::total_recursive`]). Both visit every node and agree on every
//! list.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Case counters
// ---------------------------------------------------------------------------

/// The four epidemiological counters tracked per city and per infection.
///
/// Used both as initial values and as update deltas. Counters are unsigned,
/// so an update can never subtract cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCounts {
    /// Confirmed cases.
    pub cases: u32,
    /// Cases needing intensive care.
    pub critical_cases: u32,
    /// Deaths.
    pub deaths: u32,
    /// Recovered patients.
    pub recovered: u32,
}

impl CaseCounts {
    /// Bundle the four counters.
    pub const fn new(cases: u32, critical_cases: u32, deaths: u32, recovered: u32) -> Self {
        Self {
            cases,
            critical_cases,
            deaths,
            recovered,
        }
    }
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// A city and its latest outbreak figures.
///
/// Cities compare equal by name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    /// Name, unique within a [`CityList`].
    pub name: String,
    /// Date of the latest figures.
    pub last_update: NaiveDate,
    /// Living population. Each update subtracts its death delta; the value is
    /// not clamped and may go negative if deaths outrun the population.
    pub population: i64,
    /// Accumulated confirmed cases.
    pub cases: u32,
    /// Accumulated critical cases.
    pub critical_cases: u32,
    /// Accumulated deaths.
    pub deaths: u32,
    /// Accumulated recoveries.
    pub recovered: u32,
    /// Hospital beds available.
    pub medical_beds: u32,
}

impl City {
    /// Create a city with all counters at zero.
    pub fn new(
        name: impl Into<String>,
        last_update: NaiveDate,
        population: i64,
        medical_beds: u32,
    ) -> Self {
        debug_assert!(population > 0, "population must be positive");
        debug_assert!(medical_beds > 0, "medical beds must be positive");
        Self {
            name: name.into(),
            last_update,
            population,
            cases: 0,
            critical_cases: 0,
            deaths: 0,
            recovered: 0,
            medical_beds,
        }
    }

    /// Set the starting counters. Population is left untouched.
    #[must_use]
    pub const fn with_counts(mut self, counts: CaseCounts) -> Self {
        self.cases = counts.cases;
        self.critical_cases = counts.critical_cases;
        self.deaths = counts.deaths;
        self.recovered = counts.recovered;
        self
    }

    /// Return the current counters.
    pub const fn counts(&self) -> CaseCounts {
        CaseCounts::new(self.cases, self.critical_cases, self.deaths, self.recovered)
    }

    /// Accumulate `delta`, stamp `date` and remove the dead from the
    /// population.
    pub fn apply(&mut self, date: NaiveDate, delta: CaseCounts) {
        self.last_update = date;
        self.cases = self.cases.saturating_add(delta.cases);
        self.critical_cases = self.critical_cases.saturating_add(delta.critical_cases);
        self.deaths = self.deaths.saturating_add(delta.deaths);
        self.recovered = self.recovered.saturating_add(delta.recovered);
        self.population = self.population.saturating_sub(i64::from(delta.deaths));
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "\tpopulation:{} medical_beds:{} updated:{}",
            self.population,
            self.medical_beds,
            self.last_update.format("%-d/%-m/%Y")
        )?;
        write!(
            f,
            "\tcases:{} critical:{} deaths:{} recovered:{}",
            self.cases, self.critical_cases, self.deaths, self.recovered
        )
    }
}

/// Selects which city field a list reduction sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityCounter {
    /// Living population.
    Population,
    /// Confirmed cases.
    Cases,
    /// Critical cases.
    CriticalCases,
    /// Deaths.
    Deaths,
    /// Recoveries.
    Recovered,
}

impl CityCounter {
    fn read(self, city: &City) -> i64 {
        match self {
            Self::Population => city.population,
            Self::Cases => i64::from(city.cases),
            Self::CriticalCases => i64::from(city.critical_cases),
            Self::Deaths => i64::from(city.deaths),
            Self::Recovered => i64::from(city.recovered),
        }
    }
}

// ---------------------------------------------------------------------------
// City list
// ---------------------------------------------------------------------------

struct CityNode {
    city: City,
    next: Option<Box<CityNode>>,
}

/// An ordered, index-addressed chain of cities with unique names.
#[derive(Default)]
pub struct CityList {
    head: Option<Box<CityNode>>,
}

impl CityList {
    /// Insertion index meaning "after the current tail".
    pub const APPEND: usize = usize::MAX;

    /// Create an empty list.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Count the cities by walking the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Return whether the list has no cities.
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate over the cities from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Iterate mutably over the cities from head to tail.
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }

    /// Move `city` into the list so that it ends up at position `index`.
    ///
    /// `0` inserts at the head, [`CityList::APPEND`] at the tail, and any
    /// `index` in `1..=len` before the city currently at that position.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicated`] if a city with the same name is
    /// already listed, or [`RegistryError::InvalidIndex`] if `index` is past
    /// the end. The list is unchanged on error.
    pub fn insert(&mut self, city: City, index: usize) -> Result<(), RegistryError> {
        if self.find(&city.name).is_some() {
            return Err(RegistryError::Duplicated(city.name));
        }

        let len = self.len();
        let position = if index == Self::APPEND {
            len
        } else if index <= len {
            index
        } else {
            return Err(RegistryError::InvalidIndex { index, len });
        };

        let mut link = &mut self.head;
        for _ in 0..position {
            let Some(node) = link else { break };
            link = &mut node.next;
        }

        tracing::debug!(key = %city.name, index = position, "city insert");
        let next = link.take();
        *link = Some(Box::new(CityNode { city, next }));
        Ok(())
    }

    /// Unlink the city at `index` and return it.
    ///
    /// Returns `None` when the list is empty or `index` is not below the
    /// length.
    pub fn delete(&mut self, index: usize) -> Option<City> {
        let mut link = &mut self.head;
        for _ in 0..index {
            let Some(node) = link else { return None };
            link = &mut node.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        tracing::debug!(key = %removed.city.name, index, "city delete");
        Some(removed.city)
    }

    /// Return the city at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&City> {
        self.iter().nth(index)
    }

    /// Return the city at `index` for in-place mutation.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut City> {
        self.iter_mut().nth(index)
    }

    /// Find a city by name.
    pub fn find(&self, name: &str) -> Option<&City> {
        self.iter().find(|city| city.name == name)
    }

    /// Find a city by name for in-place mutation.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut City> {
        self.iter_mut().find(|city| city.name == name)
    }

    /// Accumulate `delta` into the named city and return it.
    ///
    /// See [`City::apply`] for the effect on population.
    pub fn update(&mut self, name: &str, date: NaiveDate, delta: CaseCounts) -> Option<&City> {
        let city = self.find_mut(name)?;
        city.apply(date, delta);
        Some(city)
    }

    /// Drop every city. Safe to call on an empty list.
    pub fn clear(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }

    /// Sum `counter` over the chain with an explicit loop.
    pub fn total_iterative(&self, counter: CityCounter) -> i64 {
        let mut total: i64 = 0;
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            total = total.saturating_add(counter.read(&current.city));
            node = current.next.as_deref();
        }
        total
    }

    /// Sum `counter` over the chain by recursion on the nodes.
    ///
    /// Stack depth grows with the list; the named sums use
    /// [`CityList::total_iterative`].
    pub fn total_recursive(&self, counter: CityCounter) -> i64 {
        total_from(self.head.as_deref(), counter, 0)
    }

    /// Total living population.
    pub fn population_sum(&self) -> i64 {
        self.total_iterative(CityCounter::Population)
    }

    /// Total confirmed cases.
    pub fn cases_sum(&self) -> i64 {
        self.total_iterative(CityCounter::Cases)
    }

    /// Total critical cases.
    pub fn critical_cases_sum(&self) -> i64 {
        self.total_iterative(CityCounter::CriticalCases)
    }

    /// Total deaths.
    pub fn deaths_sum(&self) -> i64 {
        self.total_iterative(CityCounter::Deaths)
    }

    /// Total recoveries.
    pub fn recovered_sum(&self) -> i64 {
        self.total_iterative(CityCounter::Recovered)
    }
}

fn total_from(node: Option<&CityNode>, counter: CityCounter, acc: i64) -> i64 {
    match node {
        None => acc,
        Some(current) => total_from(
            current.next.as_deref(),
            counter,
            acc.saturating_add(counter.read(&current.city)),
        ),
    }
}

impl Drop for CityList {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Clone for CityList {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        let mut link = &mut copy.head;
        for city in self {
            let node = link.insert(Box::new(CityNode {
                city: city.clone(),
                next: None,
            }));
            link = &mut node.next;
        }
        copy
    }
}

impl fmt::Debug for CityList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for CityList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, city) in self.iter().enumerate() {
            writeln!(f, "{position} {city}")?;
        }
        Ok(())
    }
}

impl Serialize for CityList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CityList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cities = Vec::<City>::deserialize(deserializer)?;
        let mut list = Self::new();
        for city in cities {
            list.insert(city, Self::APPEND)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(list)
    }
}

/// Borrowing iterator over a [`CityList`].
pub struct Iter<'a> {
    next: Option<&'a CityNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a City;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.city
        })
    }
}

/// Mutably borrowing iterator over a [`CityList`].
pub struct IterMut<'a> {
    next: Option<&'a mut CityNode>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut City;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            &mut node.city
        })
    }
}

impl<'a> IntoIterator for &'a CityList {
    type Item = &'a City;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
