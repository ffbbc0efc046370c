//! Participation
//!
//! Who travelled on a leg and who of them drove. Everything here is keyed by
//! occupant name: the same name in two vehicles counts once.

use rustc_hash::FxHashSet;

use crate::vehicles::Vehicle;

/// Insertion-ordered set of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: Vec<String>,
    seen: FxHashSet<String>,
}

impl NameSet {
    /// Add `name` if not already present.
    pub fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    /// Check for membership.
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Union preserving `self`'s order, then `other`'s new names.
    #[must_use]
    pub fn union(&self, other: &NameSet) -> NameSet {
        let mut merged = self.clone();

        for name in other.iter() {
            merged.insert(name);
        }

        merged
    }
}

/// Occupants and drivers of a set of vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participation {
    occupants: NameSet,
    drivers: NameSet,
}

impl Participation {
    /// Classify everyone seated in `vehicles`.
    pub fn classify(vehicles: &[Vehicle]) -> Self {
        let mut participation = Participation::default();

        for vehicle in vehicles {
            if let Some(driver) = vehicle.driver() {
                participation.drivers.insert(&driver.name);
            }

            for occupant in vehicle.occupants() {
                participation.occupants.insert(&occupant.name);
            }
        }

        participation
    }

    /// Combined participation over two legs.
    #[must_use]
    pub fn union(&self, other: &Participation) -> Participation {
        Participation {
            occupants: self.occupants.union(&other.occupants),
            drivers: self.drivers.union(&other.drivers),
        }
    }

    /// Number of distinct non-driving occupants.
    ///
    /// Anyone driving a vehicle is excluded by name, even if they also sit as
    /// a passenger elsewhere.
    pub fn payer_count(&self) -> usize {
        let seated_drivers = self
            .drivers
            .iter()
            .filter(|name| self.occupants.contains(name))
            .count();

        self.occupants.len() - seated_drivers
    }

    /// Distinct occupant names
    pub fn occupants(&self) -> &NameSet {
        &self.occupants
    }

    /// Distinct driver names
    pub fn drivers(&self) -> &NameSet {
        &self.drivers
    }

    /// Check whether `name` drove any vehicle.
    pub fn is_driver(&self, name: &str) -> bool {
        self.drivers.contains(name)
    }

    /// Check whether `name` was seated in any vehicle.
    pub fn is_occupant(&self, name: &str) -> bool {
        self.occupants.contains(name)
    }
}
