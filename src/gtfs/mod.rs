//! Local GTFS batch transforms.
//!
//! Single-pass utilities over static GTFS text files and the JSON
//! artifacts the fetch pipelines leave behind. Each transform reads
//! one input, reshapes it in memory, and writes one output; malformed
//! rows are logged and skipped, everything else surfaces the
//! underlying read/parse failure.

pub mod error;
pub mod shapes;
pub mod stations;
