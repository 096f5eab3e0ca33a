//! Second assignment: city lists and country totals.

use chrono::NaiveDate;
use contagion_core::{
    CaseCounts, City, CityList, Country, Infection, InfectiousAgent, Reservoir, ReservoirTable,
};

use crate::Check;
use crate::suite::{TestSection, TestSuite};

/// Run every PR2 check and record it under section `PR2`.
pub fn run(suite: &mut TestSuite) -> bool {
    let mut section = suite.open_section("PR2", "Tests for PR2 exercices");
    let ex1 = list_insertion(&mut section);
    let ex2 = list_access(&mut section);
    let ex3 = country_totals(&mut section);
    suite.add_section(section);
    ex1 && ex2 && ex3
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn new_york() -> City {
    City::new("New York", day(2020, 4, 3), 8_350_000, 50_000)
}

fn milan() -> City {
    City::new("Milan", day(2020, 1, 23), 1_390_000, 1_100)
}

fn london() -> City {
    City::new("London", day(2020, 2, 20), 9_700_000, 60_000)
}

fn foo() -> City {
    City::new("Foo", day(2020, 1, 1), 1, 1)
}

fn names_match(list: &CityList, expected: &[&City]) -> bool {
    list.len() == expected.len() && list.iter().zip(expected).all(|(a, b)| a == *b)
}

// ---------------------------------------------------------------------------
// EX1: building a list
// ---------------------------------------------------------------------------

fn list_insertion(section: &mut TestSection) -> bool {
    let mut cities = CityList::new();
    let mut passed = true;

    passed &= section.run_test("PR2_EX1_1", "Create a list of cities", || -> Check {
        Ok(cities.is_empty() && cities.get(0).is_none())
    });

    passed &= section.run_test("PR2_EX1_2", "Validate if a list is empty", || -> Check {
        Ok(cities.is_empty())
    });

    passed &= section.run_test("PR2_EX1_3", "Return the size of the list", || -> Check {
        Ok(cities.len() == 0)
    });

    passed &= section.run_test("PR2_EX1_4", "Insert a element in the list", || -> Check {
        cities.insert(new_york(), 0)?;
        Ok(cities.len() == 1)
    });

    passed &= section.run_test("PR2_EX1_5", "Insert multiple cities in the list", || -> Check {
        cities.insert(milan(), 1)?;
        Ok(cities.len() == 2)
    });

    passed &= section.run_test("PR2_EX1_6", "Insert wrong city index", || -> Check {
        Ok(cities.insert(foo(), 3).is_err() && cities.insert(foo(), 4).is_err())
    });

    cities.clear();
    passed
}

// ---------------------------------------------------------------------------
// EX2: lookups, deletion and updates
// ---------------------------------------------------------------------------

fn list_access(section: &mut TestSection) -> bool {
    let mut cities = CityList::new();
    let empty = CityList::new();
    let seeded = cities
        .insert(new_york().with_counts(CaseCounts::new(1, 2, 3, 4)), 0)
        .and_then(|()| cities.insert(milan(), 1))
        .and_then(|()| cities.insert(london(), 1));
    if seeded.is_err() {
        return false;
    }
    let mut passed = true;

    passed &= section.run_test("PR2_EX2_1", "Find a city", || -> Check {
        Ok(cities.find("London") == Some(&london())
            && cities.find("Milan") == Some(&milan())
            && cities.find("New York") == Some(&new_york())
            && cities.find("Bar").is_none()
            && empty.find("London").is_none())
    });

    passed &= section.run_test("PR2_EX2_2", "Get a city from an empty city list", || -> Check {
        Ok(empty.get(0).is_none() && cities.get(3).is_none())
    });

    passed &= section.run_test("PR2_EX2_3", "Get a city from a city list", || -> Check {
        Ok(names_match(&cities, &[&new_york(), &london(), &milan()]))
    });

    passed &= section.run_test("PR2_EX2_4", "Delete a city from a city list", || -> Check {
        let mut ok = true;
        for index in [3, 0, 2] {
            cities.insert(foo(), index)?;
            ok &= cities.delete(index).is_some_and(|city| city == foo()) && cities.len() == 3;
        }
        Ok(ok && names_match(&cities, &[&new_york(), &london(), &milan()]))
    });

    passed &= section.run_test("PR2_EX2_5", "delete a non exist city from a list ", || -> Check {
        let mut no_cities = CityList::new();
        Ok(no_cities.delete(1).is_none() && cities.delete(4).is_none() && cities.len() == 3)
    });

    passed &= section.run_test("PR2_EX2_6", "update a city from a list", || -> Check {
        let first = cities
            .update("London", day(2020, 3, 6), CaseCounts::new(8, 1, 0, 0))
            .is_some_and(|city| city.cases == 8 && city.critical_cases == 1);
        let second = cities
            .update("London", day(2020, 4, 2), CaseCounts::new(9_283, 500, 1_000, 100))
            .is_some_and(|city| city.counts() == CaseCounts::new(9_291, 501, 1_000, 100));
        Ok(first && second)
    });

    passed &= section.run_test("PR2_EX2_7", "update a non existing city from a list", || -> Check {
        Ok(cities
            .update("Bar", day(2020, 4, 2), CaseCounts::new(1, 1, 1, 1))
            .is_none())
    });

    passed
}

// ---------------------------------------------------------------------------
// EX3: country aggregation
// ---------------------------------------------------------------------------

fn country_totals(section: &mut TestSection) -> bool {
    let mut italy = Country::new("Italy", false);
    let mut passed = true;

    passed &= section.run_test("PR2_EX3_0", "calculate country population", || -> Check {
        italy.add_city(milan())?;
        italy.add_city(City::new("Brescia", day(2020, 1, 23), 1_109_841, 850))?;
        italy.add_city(City::new("Bergamo", day(2020, 1, 18), 1_114_590, 800))?;
        italy.add_city(City::new("Como", day(2020, 2, 1), 507_500, 100))?;
        Ok(italy.total_population() == 4_121_931)
    });

    passed &= section.run_test("PR2_EX3_1", "calculate country total cases", || -> Check {
        let date = day(2020, 4, 5);
        let updates = [
            ("Milan", CaseCounts::new(20_000, 50, 3_000, 5_000)),
            ("Bergamo", CaseCounts::new(10_000, 30, 2_000, 2_500)),
            ("Brescia", CaseCounts::new(10_000, 30, 2_200, 2_000)),
            ("Como", CaseCounts::new(5_000, 15, 500, 1_000)),
        ];
        let mut applied = true;
        for (name, delta) in updates {
            applied &= italy.cities.update(name, date, delta).is_some();
        }
        Ok(applied && italy.total_cases() == 45_000)
    });

    passed &= section.run_test("PR2_EX3_2", "calculate country total critical cases", || -> Check {
        Ok(italy.total_critical_cases() == 125)
    });

    passed &= section.run_test("PR2_EX3_3", "calculate country total deaths", || -> Check {
        Ok(italy.total_deaths() == 7_700)
    });

    passed &= section.run_test("PR2_EX3_4", "calculate country total cases", || -> Check {
        Ok(italy.total_recovered() == 10_500)
    });

    passed &= section.run_test("PR2_EX3_5", "update infection totals", || -> Check {
        let mut reservoirs = ReservoirTable::new();
        reservoirs.add(Reservoir::new("pangolin ", "Manis pentadactyla"))?;
        reservoirs.add(Reservoir::new("bat", "Rhinolophus FerrumEquinum"))?;
        let sars = InfectiousAgent::new("SARS-CoV-2", 1.3, "Air", day(2019, 12, 1), "Wuhan", reservoirs);

        let mut infection = Infection::new(&sars, &italy, day(2020, 1, 31));
        infection.refresh_from_country();
        Ok(infection.total_cases == 45_000
            && infection.total_deaths == 7_700
            && infection.total_critical_cases == 125
            && infection.total_recovered == 10_500)
    });

    passed
}
