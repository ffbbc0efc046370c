//! Carpool
//!
//! Carpool splits the travel costs of a group moving in several cars: it works
//! out a per-person fee for each leg, what every driver collects, and the
//! transfers between drivers that leave them all at the same net balance.

pub mod amounts;
pub mod calculation;
pub mod config;
pub mod costs;
pub mod fees;
pub mod fixtures;
pub mod optimizer;
pub mod participants;
pub mod participation;
pub mod prelude;
pub mod report;
pub mod settlement;
pub mod trip;
pub mod vehicles;
