//! First assignment: reservoir, agent and infection tables.

use chrono::NaiveDate;
use contagion_core::{
    CaseCounts, Country, Infection, InfectionTable, InfectiousAgent, InfectiousAgentTable,
    RegistryError, Reservoir, ReservoirTable,
};

use crate::Check;
use crate::suite::{TestSection, TestSuite};

const EBOLA_MORTALITY: f64 = 0.473_319_322;
const SARS_MORTALITY: f64 = 0.089_379_847;
const RATE_TOLERANCE: f64 = 1e-6;

/// Run every PR1 check and record it under section `PR1`.
pub fn run(suite: &mut TestSuite) -> bool {
    let mut section = suite.open_section("PR1", "Tests for PR1 exercices");
    let ex1 = reservoirs(&mut section);
    let ex2 = agents(&mut section);
    let ex3 = agent_table(&mut section);
    let ex4 = infections(&mut section);
    suite.add_section(section);
    ex1 && ex2 && ex3 && ex4
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn rat() -> Reservoir {
    Reservoir::new("rat", "Rattus rattus")
}

fn bat() -> Reservoir {
    Reservoir::new("bat", "Rhinolophus FerrumEquinum")
}

fn monkey() -> Reservoir {
    Reservoir::new("monkey", "Macaca mulatta")
}

fn pangolin() -> Reservoir {
    Reservoir::new("pangolin ", "Manis pentadactyla")
}

fn reservoir_table(members: Vec<Reservoir>) -> Result<ReservoirTable, RegistryError> {
    let mut table = ReservoirTable::new();
    for reservoir in members {
        table.add(reservoir)?;
    }
    Ok(table)
}

fn h1n1() -> Result<InfectiousAgent, RegistryError> {
    Ok(InfectiousAgent::new(
        "Influenza H1N1",
        0.2,
        "Air",
        day(2019, 11, 17),
        "New York",
        reservoir_table(vec![rat(), bat()])?,
    ))
}

fn yamagata() -> Result<InfectiousAgent, RegistryError> {
    Ok(InfectiousAgent::new(
        "Influenza Yamagata",
        0.15,
        "Air",
        day(2019, 10, 22),
        "London",
        reservoir_table(vec![rat(), monkey()])?,
    ))
}

fn h3n2() -> Result<InfectiousAgent, RegistryError> {
    Ok(InfectiousAgent::new(
        "Influenza H3N2",
        0.12,
        "Air",
        day(2020, 1, 3),
        "Paris",
        reservoir_table(vec![rat(), bat(), monkey()])?,
    ))
}

// ---------------------------------------------------------------------------
// EX1: reservoirs
// ---------------------------------------------------------------------------

fn reservoirs(section: &mut TestSection) -> bool {
    let mut table = ReservoirTable::new();
    let mut passed = true;

    passed &= section.run_test("PR1_EX1_1", "Initialize the table of reservoirs", || -> Check {
        Ok(table.is_empty())
    });

    passed &= section.run_test("PR1_EX1_2", "Initialize a reservoir", || -> Check {
        Ok(rat() == Reservoir::new("rat", "Rattus rattus"))
    });

    passed &= section.run_test("PR1_EX1_3", "Add a new reservoir", || -> Check {
        table.add(rat())?;
        Ok(table.len() == 1 && table.find("rat") == Some(&rat()))
    });

    passed &= section.run_test("PR1_EX1_4", "Add more reservoirs", || -> Check {
        table.add(bat())?;
        let bat_found = table.len() == 2 && table.find("bat") == Some(&bat());
        table.add(monkey())?;
        Ok(bat_found && table.len() == 3 && table.find("monkey") == Some(&monkey()))
    });

    passed &= section.run_test("PR1_EX1_5", "Remove a reservoir", || -> Check {
        let was_there = table.find("bat").is_some();
        table.remove(&bat())?;
        let shifted = table.len() == 2
            && table.find("bat").is_none()
            && table.find("rat").is_some()
            && table.find("monkey").is_some();
        table.remove(&monkey())?;
        let rat_left = table.find("rat").is_some();
        table.remove(&rat())?;
        Ok(was_there && shifted && rat_left)
    });

    passed &= section.run_test("PR1_EX1_6", "Remove a non existing reservoir", || -> Check {
        let missing = matches!(table.remove(&bat()), Err(RegistryError::NotFound(_)));
        Ok(missing && table.is_empty())
    });

    table.clear();
    passed
}

// ---------------------------------------------------------------------------
// EX2: infectious agents
// ---------------------------------------------------------------------------

fn agents(section: &mut TestSection) -> bool {
    let mut passed = true;
    let mut built: Option<(InfectiousAgent, InfectiousAgent)> = None;

    passed &= section.run_test("PR1_EX2_1", "Initialize a infectious agent", || -> Check {
        let (a1, b) = (h1n1()?, yamagata()?);
        let distinct = a1 != b;
        built = Some((a1, b));
        Ok(distinct)
    });

    passed &= section.run_test("PR1_EX2_2", "Copy a infectious agent", || -> Check {
        Ok(built.as_ref().is_some_and(|(a1, _)| a1.clone() == *a1))
    });

    passed &= section.run_test("PR1_EX2_3", "Get the reservoirs list", || -> Check {
        let expected = reservoir_table(vec![rat(), monkey()])?;
        Ok(built
            .as_ref()
            .is_some_and(|(_, b)| b.reservoirs().same_members(&expected)))
    });

    passed
}

// ---------------------------------------------------------------------------
// EX3: infectious agent table
// ---------------------------------------------------------------------------

fn agent_table(section: &mut TestSection) -> bool {
    let mut table = InfectiousAgentTable::new();
    let mut passed = true;

    passed &= section.run_test(
        "PR1_EX3_1",
        "Initialize the table of infectious agents",
        || -> Check { Ok(table.is_empty()) },
    );

    passed &= section.run_test("PR1_EX3_2", "Add a new infectious agent", || -> Check {
        let a1 = h1n1()?;
        table.add(a1.clone())?;
        Ok(table.len() == 1 && table.find("Influenza H1N1") == Some(&a1))
    });

    passed &= section.run_test("PR1_EX3_3", "Add more infectious agent", || -> Check {
        let (a2, b) = (h3n2()?, yamagata()?);
        table.add(a2.clone())?;
        let a2_found = table.len() == 2 && table.find("Influenza H3N2") == Some(&a2);
        table.add(b.clone())?;
        Ok(a2_found && table.len() == 3 && table.find("Influenza Yamagata") == Some(&b))
    });

    passed &= section.run_test("PR1_EX3_4", "Remove a infectious agent", || -> Check {
        let was_there = table.find("Influenza Yamagata").is_some();
        table.remove(&yamagata()?)?;
        Ok(was_there
            && table.len() == 2
            && table.find("Influenza Yamagata").is_none()
            && table.find("Influenza H1N1").is_some()
            && table.find("Influenza H3N2").is_some())
    });

    passed &= section.run_test(
        "PR1_EX3_5",
        "Remove a non existing infectious agent",
        || -> Check {
            let missing = matches!(table.remove(&yamagata()?), Err(RegistryError::NotFound(_)));
            Ok(missing
                && table.len() == 2
                && table.find("Influenza Yamagata").is_none()
                && table.find("Influenza H1N1").is_some()
                && table.find("Influenza H3N2").is_some())
        },
    );

    passed
}

// ---------------------------------------------------------------------------
// EX4: infections
// ---------------------------------------------------------------------------

/// Record `infection` with `counts` already applied.
fn add_with_counts(
    table: &mut InfectionTable,
    mut infection: Infection,
    counts: CaseCounts,
) -> Result<(), RegistryError> {
    infection.update(counts);
    table.add(infection)
}

fn update_recorded(
    table: &mut InfectionTable,
    agent: &str,
    country: &str,
    delta: CaseCounts,
) -> Result<(), RegistryError> {
    let infection = table
        .find_mut(agent, country)
        .ok_or_else(|| RegistryError::NotFound(format!("{agent}/{country}")))?;
    infection.update(delta);
    Ok(())
}

fn rate_matches(rate: Option<f64>, expected: f64) -> bool {
    rate.is_some_and(|rate| (rate - expected).abs() < RATE_TOLERANCE)
}

fn infections(section: &mut TestSection) -> bool {
    let china = Country::new("China", false);
    let south_korea = Country::new("South Korea", false);
    let italy = Country::new("Italy", false);
    let sierra_leone = Country::new("Sierra Leone", false);
    let liberia = Country::new("Liberia", false);
    let guinea = Country::new("Guinea", false);

    let outbreak = day(2019, 12, 1);
    let Ok(reservoirs) = reservoir_table(vec![pangolin(), bat()]) else {
        return false;
    };
    let sars = InfectiousAgent::new("SARS-CoV-2", 1.3, "Air", outbreak, "Wuhan", reservoirs.clone());

    let mut table = InfectionTable::new();
    let mut china_infection = Infection::new(&sars, &china, outbreak);
    let sars_italy = Infection::new(&sars, &italy, day(2020, 1, 31));
    let mut passed = true;

    passed &= section.run_test("PR1_EX4_1", "Initialize an infection", || -> Check {
        Ok(china_infection.agent == sars && china_infection.total_cases == 0)
    });

    passed &= section.run_test("PR1_EX4_2", "Update an infection", || -> Check {
        china_infection.update(CaseCounts::new(80_711, 0, 3_042, 0));
        let first = china_infection.total_cases == 80_711 && china_infection.total_deaths == 3_042;
        china_infection.update(CaseCounts::new(2_000, 2_002, 1_000, 1_001));
        Ok(first
            && china_infection.total_cases == 82_711
            && china_infection.total_deaths == 4_042
            && china_infection.total_critical_cases == 2_002
            && china_infection.total_recovered == 1_001)
    });

    passed &= section.run_test("PR1_EX4_3", "Initialize the table of infections", || -> Check {
        Ok(table.is_empty())
    });

    passed &= section.run_test("PR1_EX4_4", "Add a new infection", || -> Check {
        table.add(Infection::new(&sars, &china, outbreak))?;
        Ok(table.len() == 1)
    });

    passed &= section.run_test("PR1_EX4_5", "Add more infections", || -> Check {
        table.add(Infection::new(&sars, &south_korea, day(2020, 1, 20)))?;
        let korea_found = table.len() == 2 && table.find("SARS-CoV-2", "South Korea").is_some();
        table.add(sars_italy.clone())?;
        Ok(korea_found && table.len() == 3 && table.find("SARS-CoV-2", "Italy").is_some())
    });

    passed &= section.run_test("PR1_EX4_6", "Copy an infection", || -> Check {
        Ok(sars_italy.clone() == sars_italy)
    });

    passed &= section.run_test("PR1_EX4_7", "Add duplicated infection", || -> Check {
        Ok(matches!(
            table.add(sars_italy.clone()),
            Err(RegistryError::Duplicated(_))
        ))
    });

    passed &= section.run_test("PR1_EX4_8", "Remove infection", || -> Check {
        table.remove(&sars_italy)?;
        let gone = matches!(table.remove(&sars_italy), Err(RegistryError::NotFound(_)))
            && table.find("SARS-CoV-2", "Italy").is_none();
        table.add(sars_italy.clone())?;
        Ok(gone)
    });

    let ebola = InfectiousAgent::new("Ebola", 25.0, "Fluids", day(2013, 12, 1), "Meliandou", reservoirs);

    passed &= section.run_test("PR1_EX4_9", "Get Max Infection", || -> Check {
        let ebola_figures = [
            (&sierra_leone, CaseCounts::new(10_000, 0, 3_956, 6_044)),
            (&liberia, CaseCounts::new(10_000, 0, 4_809, 5_191)),
            (&guinea, CaseCounts::new(3_800, 0, 2_500, 1_300)),
        ];
        for (country, counts) in ebola_figures {
            let infection = Infection::new(&ebola, country, day(2020, 1, 31));
            add_with_counts(&mut table, infection, counts)?;
        }
        let ebola_max = table
            .max_infection("Ebola")
            .is_some_and(|worst| worst.country.name == liberia.name);

        let sars_figures = [
            ("China", CaseCounts::new(81_639, 0, 3_326, 76_751)),
            ("Italy", CaseCounts::new(119_827, 0, 14_681, 19_758)),
        ];
        for (country, delta) in sars_figures {
            update_recorded(&mut table, "SARS-CoV-2", country, delta)?;
        }
        let sars_max = table
            .max_infection("SARS-CoV-2")
            .is_some_and(|worst| *worst == sars_italy);
        Ok(ebola_max && sars_max)
    });

    passed &= section.run_test("PR1_EX4_10", "Get mortality rate", || -> Check {
        Ok(rate_matches(table.mortality_rate("Ebola"), EBOLA_MORTALITY)
            && rate_matches(table.mortality_rate("SARS-CoV-2"), SARS_MORTALITY))
    });

    passed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn liberia_outbreak() -> Infection {
        let ebola = InfectiousAgent::new(
            "Ebola",
            25.0,
            "Fluids",
            day(2013, 12, 1),
            "Meliandou",
            ReservoirTable::new(),
        );
        Infection::new(&ebola, &Country::new("Liberia", false), day(2020, 1, 31))
    }

    #[test]
    fn add_with_counts_stores_the_figures() {
        let mut table = InfectionTable::new();
        add_with_counts(&mut table, liberia_outbreak(), CaseCounts::new(10_000, 0, 4_809, 5_191))
            .unwrap();
        let stored = table.find("Ebola", "Liberia").unwrap();
        assert_eq!(stored.total_cases, 10_000);
        assert_eq!(stored.total_deaths, 4_809);
    }

    #[test]
    fn seeding_errors_are_returned() {
        let mut table = InfectionTable::new();
        table.add(liberia_outbreak()).unwrap();
        let again = add_with_counts(&mut table, liberia_outbreak(), CaseCounts::new(1, 0, 0, 0));
        assert!(matches!(again, Err(RegistryError::Duplicated(_))));

        let missing = update_recorded(&mut table, "Ebola", "Guinea", CaseCounts::new(1, 0, 0, 0));
        assert!(matches!(missing, Err(RegistryError::NotFound(_))));
        assert_eq!(table.find("Ebola", "Liberia").unwrap().total_cases, 0);
    }

    #[test]
    fn scenarios_all_pass() {
        let mut suite = TestSuite::new(false);
        assert!(run(&mut suite));
        assert_eq!(suite.section("PR1").map(|s| s.tests().len()), Some(24));
    }
}
