//! Integration tests for country aggregation and the research ranking.
//!
//! Builds four countries from city figures, snapshots them into a
//! [`ResearchList`] and checks the ranking end to end.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::too_many_lines
)]

use chrono::NaiveDate;
use contagion_core::{
    CaseCounts, City, CityCounter, Country, RegistryError, Research, ResearchList,
    compare_stats,
};

/// population, cases, critical, deaths, recovered, beds
type Figures = (i64, u32, u32, u32, u32, u32);

fn city(name: &str, figures: Figures) -> City {
    let (population, cases, critical, deaths, recovered, beds) = figures;
    City::new(name, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(), population, beds)
        .with_counts(CaseCounts::new(cases, critical, deaths, recovered))
}

fn country(name: &str, cities: &[(&str, Figures)]) -> Country {
    let mut country = Country::new(name, false);
    for (city_name, figures) in cities {
        country.add_city(city(city_name, *figures)).unwrap();
    }
    country
}

const MILAN: Figures = (1_390_000, 15_000, 2_500, 5_000, 300, 1_100);
const BERGAMO: Figures = (1_114_590, 23_000, 7_000, 4_500, 200, 800);
const BRESCIA: Figures = (1_109_841, 3_400, 200, 55, 8, 850);
const COMO: Figures = (507_500, 5_800, 250, 80, 100, 100);
const ASUNCION: Figures = (7_000_000, 220, 6, 9, 60, 1_000);
const CONCEPCION: Figures = (1_114_590, 10, 0, 5, 1, 810);
const MADRID: Figures = (1_109_841, 24_500, 5_200, 480, 1_500, 975);
const BARCELONA: Figures = (507_500, 38_590, 9_000, 450, 890, 800);
const LISBON: Figures = (87_500, 3_480, 1_300, 440, 290, 800);
const PORTO: Figures = (127_500, 590, 910, 50, 590, 800);

fn italy() -> Country {
    country(
        "Italy",
        &[("Milan", MILAN), ("Brescia", BRESCIA), ("Bergamo", BERGAMO), ("Como", COMO)],
    )
}

fn spain() -> Country {
    country("Spain", &[("Madrid", MADRID), ("Barcelona", BARCELONA)])
}

fn paraguay() -> Country {
    country("Paraguay", &[("Asuncion", ASUNCION), ("Concepcion", CONCEPCION)])
}

fn portugal() -> Country {
    country("Portugal", &[("Lisbon", LISBON), ("Porto", PORTO)])
}

fn ranking(list: &ResearchList) -> Vec<String> {
    list.iter().map(|r| r.country.name.clone()).collect()
}

#[test]
fn country_totals_match_city_sums() {
    let expected = [
        (spain(), 63_090, 14_200, 930),
        (italy(), 47_200, 9_950, 9_635),
        (portugal(), 4_070, 2_210, 490),
        (paraguay(), 230, 6, 14),
    ];
    for (country, cases, critical, deaths) in expected {
        assert_eq!(country.total_cases(), cases, "{}", country.name);
        assert_eq!(country.total_critical_cases(), critical, "{}", country.name);
        assert_eq!(country.total_deaths(), deaths, "{}", country.name);
        for counter in [CityCounter::Population, CityCounter::Recovered] {
            assert_eq!(
                country.cities.total_iterative(counter),
                country.cities.total_recursive(counter)
            );
        }
    }
}

#[test]
fn snapshots_compare_by_infectivity_first() {
    let italy = Research::new(&italy());
    let spain = Research::new(&spain());
    let paraguay = Research::new(&paraguay());
    assert_eq!(compare_stats(&spain.stats, &italy.stats), 1);
    assert_eq!(compare_stats(&paraguay.stats, &italy.stats), -1);
    assert_eq!(compare_stats(&italy.stats, &italy.stats), 0);
}

#[test]
fn snapshot_is_not_refreshed_by_later_updates() {
    let mut paraguay = paraguay();
    let research = Research::new(&paraguay);
    let day = NaiveDate::from_ymd_opt(2020, 4, 10).unwrap();
    paraguay
        .cities
        .update("Asuncion", day, CaseCounts::new(100_000, 0, 0, 0))
        .unwrap();
    assert_eq!(research.stats.infectivity, 230);
    assert_eq!(research.country.total_cases(), 230);
}

#[test]
fn ranking_sorts_descending_and_is_idempotent() {
    let mut list = ResearchList::new();
    for (position, country) in [italy(), spain(), paraguay()].iter().enumerate() {
        list.insert(Research::new(country), position + 1).unwrap();
    }
    assert_eq!(list.position_of(&spain()), Some(2));
    assert_eq!(list.position_of(&Country::new("nonExist", false)), None);

    list.bubble_sort().unwrap();
    assert_eq!(list.position_of(&spain()), Some(1));
    assert_eq!(ranking(&list), vec!["Spain", "Italy", "Paraguay"]);

    list.bubble_sort().unwrap();
    assert_eq!(ranking(&list), vec!["Spain", "Italy", "Paraguay"]);

    list.insert(Research::new(&portugal()), 4).unwrap();
    list.bubble_sort().unwrap();
    assert_eq!(list.position_of(&portugal()), Some(3));
    assert_eq!(ranking(&list), vec!["Spain", "Italy", "Portugal", "Paraguay"]);
    assert_eq!(list.last().unwrap().country.name, "Paraguay");
}

#[test]
fn ranking_insert_delete_clear_cycle() {
    let mut list = ResearchList::new();
    list.insert(Research::new(&italy()), 1).unwrap();
    assert_eq!(list.get(1).unwrap().country.name, "Italy");
    assert!(matches!(
        list.insert(Research::new(&italy()), 6),
        Err(RegistryError::InvalidIndex { index: 6, len: 1 })
    ));

    list.insert(Research::new(&paraguay()), 2).unwrap();
    list.insert(Research::new(&italy()), 3).unwrap();
    list.insert(Research::new(&italy()), 2).unwrap();
    assert_eq!(list.get(2).unwrap().country.name, "Italy");
    assert_eq!(list.len(), 4);

    assert!(list.delete(1).is_ok());
    assert!(matches!(list.delete(4), Err(RegistryError::InvalidIndex { .. })));

    list.clear();
    assert!(list.is_empty());
    assert!(list.bubble_sort().is_ok());

    for (position, country) in [italy(), spain(), paraguay()].iter().enumerate() {
        list.insert(Research::new(country), position + 1).unwrap();
    }
    assert_eq!(list.get(2).unwrap().country.name, "Spain");
}

#[test]
fn country_round_trips_through_json() {
    let italy = italy();
    let json = serde_json::to_string(&italy).unwrap();
    let back: Country = serde_json::from_str(&json).unwrap();
    let names: Vec<&str> = back.cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Milan", "Brescia", "Bergamo", "Como"]);
    assert_eq!(back.total_cases(), italy.total_cases());
}
