use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ProducerType;

/// Packaging a product can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerType {
    Unit,
    HalfKilo,
    Kilo,
    Bunch,
    Dozen,
    Tray,
    Bag,
    Box,
    Jar,
    Bottle,
    WeeklyBasket,
    HalfBasket,
    CommitMangoes,
    CommitAvocados,
}

/// Containers every producer role may use.
pub const SHARED_CONTAINERS: [ContainerType; 10] = [
    ContainerType::Unit,
    ContainerType::HalfKilo,
    ContainerType::Kilo,
    ContainerType::Bunch,
    ContainerType::Dozen,
    ContainerType::Tray,
    ContainerType::Bag,
    ContainerType::Box,
    ContainerType::Jar,
    ContainerType::Bottle,
];

/// Extra containers for producers committed to a week schedule.
pub const MAIN_PRODUCER_CONTAINERS: [ContainerType; 2] =
    [ContainerType::WeeklyBasket, ContainerType::HalfBasket];

/// The only containers a tropical shop may use.
pub const TROPICAL_CONTAINERS: [ContainerType; 2] =
    [ContainerType::CommitMangoes, ContainerType::CommitAvocados];

/// Container types a producer may list products in.
///
/// The tropical flag only changes the outcome for shop producers.
pub fn allowed_container_types(producer_type: ProducerType, is_tropical: bool) -> Vec<ContainerType> {
    match producer_type {
        ProducerType::Shop if is_tropical => TROPICAL_CONTAINERS.to_vec(),
        ProducerType::Shop => SHARED_CONTAINERS.to_vec(),
        ProducerType::Regular | ProducerType::OddWeek | ProducerType::EvenWeek => SHARED_CONTAINERS
            .iter()
            .chain(MAIN_PRODUCER_CONTAINERS.iter())
            .copied()
            .collect(),
    }
}

impl ContainerType {
    pub const ALL: [ContainerType; 14] = [
        ContainerType::Unit,
        ContainerType::HalfKilo,
        ContainerType::Kilo,
        ContainerType::Bunch,
        ContainerType::Dozen,
        ContainerType::Tray,
        ContainerType::Bag,
        ContainerType::Box,
        ContainerType::Jar,
        ContainerType::Bottle,
        ContainerType::WeeklyBasket,
        ContainerType::HalfBasket,
        ContainerType::CommitMangoes,
        ContainerType::CommitAvocados,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ContainerType::Unit => "UNIT",
            ContainerType::HalfKilo => "HALF_KILO",
            ContainerType::Kilo => "KILO",
            ContainerType::Bunch => "BUNCH",
            ContainerType::Dozen => "DOZEN",
            ContainerType::Tray => "TRAY",
            ContainerType::Bag => "BAG",
            ContainerType::Box => "BOX",
            ContainerType::Jar => "JAR",
            ContainerType::Bottle => "BOTTLE",
            ContainerType::WeeklyBasket => "WEEKLY_BASKET",
            ContainerType::HalfBasket => "HALF_BASKET",
            ContainerType::CommitMangoes => "COMMIT_MANGOES",
            ContainerType::CommitAvocados => "COMMIT_AVOCADOS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContainerType::Unit => "Unit",
            ContainerType::HalfKilo => "Half kilo",
            ContainerType::Kilo => "Kilo",
            ContainerType::Bunch => "Bunch",
            ContainerType::Dozen => "Dozen",
            ContainerType::Tray => "Tray",
            ContainerType::Bag => "Bag",
            ContainerType::Box => "Box",
            ContainerType::Jar => "Jar",
            ContainerType::Bottle => "Bottle",
            ContainerType::WeeklyBasket => "Weekly basket",
            ContainerType::HalfBasket => "Half basket",
            ContainerType::CommitMangoes => "Mango commitment",
            ContainerType::CommitAvocados => "Avocado commitment",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ContainerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase().replace('-', "_");
        ContainerType::ALL
            .into_iter()
            .find(|c| c.key() == upper)
            .ok_or_else(|| format!("Unknown container type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(containers: Vec<ContainerType>) -> HashSet<ContainerType> {
        containers.into_iter().collect()
    }

    #[test]
    fn test_tropical_shop_gets_commitments_only() {
        let allowed = as_set(allowed_container_types(ProducerType::Shop, true));
        let expected: HashSet<_> = [ContainerType::CommitMangoes, ContainerType::CommitAvocados]
            .into_iter()
            .collect();
        assert_eq!(allowed, expected);
    }

    #[test]
    fn test_plain_shop_gets_shared_set() {
        let allowed = allowed_container_types(ProducerType::Shop, false);
        assert_eq!(allowed.len(), 10);
        assert_eq!(as_set(allowed), as_set(SHARED_CONTAINERS.to_vec()));
    }

    #[test]
    fn test_weekly_producers_get_extras() {
        for producer_type in [
            ProducerType::Regular,
            ProducerType::OddWeek,
            ProducerType::EvenWeek,
        ] {
            for tropical in [false, true] {
                let allowed = allowed_container_types(producer_type, tropical);
                assert_eq!(allowed.len(), 12);
                assert!(allowed.contains(&ContainerType::WeeklyBasket));
                assert!(allowed.contains(&ContainerType::HalfBasket));
                assert!(!allowed.contains(&ContainerType::CommitMangoes));
            }
        }
    }

    #[test]
    fn test_from_str_and_serde_agree() {
        let parsed = ContainerType::from_str("commit-mangoes").unwrap();
        assert_eq!(parsed, ContainerType::CommitMangoes);

        let json = serde_json::to_string(&ContainerType::HalfKilo).unwrap();
        assert_eq!(json, "\"HALF_KILO\"");
        assert!(ContainerType::from_str("crate").is_err());
    }
}
