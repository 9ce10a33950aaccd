pub mod acquirer;
pub mod config;
pub mod distance;
pub mod error;
pub mod geo_reading;
pub mod ledger;
pub mod tracker;
pub mod view;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod mock;
