pub mod config;
pub mod error;
pub mod gtfs;
pub mod mbta;
pub mod shapes;
pub mod stations;
