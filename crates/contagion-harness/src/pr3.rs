//! Third assignment: research snapshots and the ranked list.

use chrono::NaiveDate;
use contagion_core::{
    CaseCounts, City, Country, RegistryError, Research, ResearchList, compare_stats,
};

use crate::Check;
use crate::suite::{TestSection, TestSuite};

/// population, cases, critical, deaths, recovered, beds
type Figures = (i64, u32, u32, u32, u32, u32);

const MILAN: Figures = (1_390_000, 15_000, 2_500, 5_000, 300, 1_100);
const BERGAMO: Figures = (1_114_590, 23_000, 7_000, 4_500, 200, 800);
const BRESCIA: Figures = (1_109_841, 3_400, 200, 55, 8, 850);
const COMO: Figures = (507_500, 5_800, 250, 80, 100, 100);
const ASUNCION: Figures = (7_000_000, 220, 6, 9, 60, 1_000);
const CONCEPCION: Figures = (1_114_590, 10, 0, 5, 1, 810);
const MADRID: Figures = (1_109_841, 24_500, 5_200, 480, 1_500, 975);
const BARCELONA: Figures = (507_500, 38_590, 9_000, 450, 890, 800);
const LISBON_SMALL: Figures = (87_500, 3_480, 1_300, 440, 290, 800);
const LISBON_LARGE: Figures = (9_000_000, 220, 10, 9, 60, 1_000);
const PORTO: Figures = (127_500, 590, 910, 50, 590, 800);

/// Run every PR3 check and record it under section `PR3`.
pub fn run(suite: &mut TestSuite) -> bool {
    let mut section = suite.open_section("PR3", "Tests for PR3 exercices");
    let ex1 = snapshots(&mut section);
    let ex2 = list_editing(&mut section);
    let ex3 = ranking(&mut section);
    suite.add_section(section);
    ex1 && ex2 && ex3
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn city(name: &str, figures: Figures) -> City {
    let (population, cases, critical, deaths, recovered, beds) = figures;
    City::new(name, day(2020, 3, 1), population, beds)
        .with_counts(CaseCounts::new(cases, critical, deaths, recovered))
}

fn country(name: &str, cities: &[(&str, Figures)]) -> Result<Country, RegistryError> {
    let mut country = Country::new(name, false);
    for (city_name, figures) in cities {
        country.add_city(city(city_name, *figures))?;
    }
    Ok(country)
}

fn names_at(list: &ResearchList, expected: &[&str]) -> bool {
    list.len() == expected.len()
        && list
            .iter()
            .zip(expected)
            .all(|(research, name)| research.country.name == *name)
}

// ---------------------------------------------------------------------------
// EX1: snapshots and comparison
// ---------------------------------------------------------------------------

fn snapshots(section: &mut TestSection) -> bool {
    let mut passed = true;
    let mut italy = Country::new("Italy", false);
    let mut paraguay = Country::new("Paraguay", false);
    let mut lisbon = Country::new("Lisbon", false);
    let mut research_italy: Option<Research> = None;

    passed &= section.run_test("PR3_EX1_1", "Initizalize Research", || -> Check {
        italy.add_city(city("Como", COMO))?;
        let research = Research::new(&italy);
        let ok = research.stats.infectivity == 5_800
            && research.stats.severity == 250
            && research.stats.lethality == 80;
        research_italy = Some(research);
        Ok(ok)
    });

    let setup = paraguay
        .add_city(city("Asuncion", ASUNCION))
        .and_then(|()| lisbon.add_city(city("Lisbon", LISBON_LARGE)));
    if setup.is_err() {
        return false;
    }
    let research_paraguay = Research::new(&paraguay);
    let research_lisbon = Research::new(&lisbon);

    passed &= section.run_test("PR3_EX1_2", "Research Stats Compare High Infectivity", || -> Check {
        Ok(research_italy
            .as_ref()
            .is_some_and(|italy| compare_stats(&italy.stats, &research_paraguay.stats) == 1))
    });

    passed &= section.run_test("PR3_EX1_3", "Research Stats Compare High Severity", || -> Check {
        Ok(compare_stats(&research_paraguay.stats, &research_lisbon.stats) == -1)
    });

    passed &= section.run_test("PR3_EX1_4", "Research Stats Compare High Lethality", || -> Check {
        let updated = lisbon
            .cities
            .update("Lisbon", day(2020, 3, 1), CaseCounts::new(220, 6, 9, 658))
            .is_some();
        Ok(updated && compare_stats(&research_paraguay.stats, &research_lisbon.stats) == -1)
    });

    passed &= section.run_test("PR3_EX1_5", "Research Stats Compare both equals", || -> Check {
        Ok(research_italy
            .as_ref()
            .is_some_and(|italy| compare_stats(&italy.stats, &italy.stats) == 0))
    });

    passed
}

// ---------------------------------------------------------------------------
// EX2: inserting and deleting
// ---------------------------------------------------------------------------

fn list_editing(section: &mut TestSection) -> bool {
    let built = (
        country("Italy", &[("Como", COMO)]),
        country("Spain", &[("Barcelona", BARCELONA)]),
        country("Paraguay", &[("Asuncion", ASUNCION)]),
    );
    let (Ok(italy), Ok(spain), Ok(paraguay)) = built else {
        return false;
    };
    let research_italy = Research::new(&italy);
    let research_spain = Research::new(&spain);
    let research_paraguay = Research::new(&paraguay);

    let mut world = ResearchList::new();
    let mut passed = true;

    passed &= section.run_test("PR3_EX2_1", "Insert a Country to ResearchList Head", || -> Check {
        world.insert(research_italy.clone(), 1)?;
        Ok(world.get(1).is_some_and(|r| r.country == italy))
    });

    passed &= section.run_test("PR3_EX2_2", "check researchList Invalid Index", || -> Check {
        Ok(matches!(
            world.insert(research_paraguay.clone(), 6),
            Err(RegistryError::InvalidIndex { .. })
        ))
    });

    passed &= section.run_test("PR3_EX2_3", "Insert a Country to ResearchList Middle", || -> Check {
        world.insert(research_paraguay.clone(), 2)?;
        world.insert(research_italy.clone(), 3)?;
        world.insert(research_italy.clone(), 2)?;
        Ok(world.get(2).is_some_and(|r| r.country == italy))
    });

    passed &= section.run_test("PR3_EX2_4", "Delete a Country from ResearchList", || -> Check {
        world.delete(1)?;
        Ok(world.len() == 3)
    });

    passed &= section.run_test("PR3_EX2_5", "Delete an invalid index from ResearchList", || -> Check {
        Ok(matches!(world.delete(4), Err(RegistryError::InvalidIndex { .. })))
    });

    passed &= section.run_test("PR3_EX2_6", "Check researchList free", || -> Check {
        world.clear();
        Ok(world.is_empty())
    });

    passed &= section.run_test(
        "PR3_EX2_7",
        "Get a stat from ResearchList through index",
        || -> Check {
            world.insert(research_italy.clone(), 1)?;
            world.insert(research_spain.clone(), 2)?;
            world.insert(research_paraguay.clone(), 3)?;
            Ok(world.get(2).is_some_and(|r| r.country.name == "Spain"))
        },
    );

    world.clear();
    passed
}

// ---------------------------------------------------------------------------
// EX3: search and sort
// ---------------------------------------------------------------------------

fn ranking(section: &mut TestSection) -> bool {
    let built = (
        country(
            "Italy",
            &[("Milan", MILAN), ("Brescia", BRESCIA), ("Bergamo", BERGAMO), ("Como", COMO)],
        ),
        country("Spain", &[("Madrid", MADRID), ("Barcelona", BARCELONA)]),
        country("Paraguay", &[("Asuncion", ASUNCION), ("Concepcion", CONCEPCION)]),
        country("Portugal", &[("Lisbon", LISBON_SMALL), ("Porto", PORTO)]),
    );
    let (Ok(italy), Ok(spain), Ok(paraguay), Ok(portugal)) = built else {
        return false;
    };
    let non_exist = Country::new("nonExist", false);

    let mut world = ResearchList::new();
    let seeded = world
        .insert(Research::new(&italy), 1)
        .and_then(|()| world.insert(Research::new(&spain), 2))
        .and_then(|()| world.insert(Research::new(&paraguay), 3));
    if seeded.is_err() {
        return false;
    }
    let mut passed = true;

    passed &= section.run_test("PR3_EX3_1", "Get a country position Recursively", || -> Check {
        Ok(world.position_of(&spain) == Some(2))
    });

    passed &= section.run_test("PR3_EX3_2", "Get a non-existent country position ", || -> Check {
        Ok(world.position_of(&non_exist).is_none())
    });

    passed &= section.run_test("PR3_EX3_3", "Sort ResearchList", || -> Check {
        world.bubble_sort()?;
        Ok(world.position_of(&spain) == Some(1))
    });

    passed &= section.run_test("PR3_EX3_4", "ReSort a sorted ResearchList", || -> Check {
        world.bubble_sort()?;
        Ok(world.position_of(&spain) == Some(1) && names_at(&world, &["Spain", "Italy", "Paraguay"]))
    });

    passed &= section.run_test("PR3_EX3_5", "Add new country and sort", || -> Check {
        world.insert(Research::new(&portugal), 4)?;
        world.bubble_sort()?;
        Ok(world.position_of(&portugal) == Some(3))
    });

    passed &= section.run_test("PR3_EX3_6", "Sort an empty ResearchList", || -> Check {
        let mut empty = ResearchList::new();
        empty.bubble_sort()?;
        Ok(empty.is_empty())
    });

    passed
}
