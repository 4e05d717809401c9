//! Rate table data structures, filtering and loading

mod data;
mod filter;
pub mod loader;
pub mod synthetic;

pub use data::{RateTable, Record, Region};
pub use filter::{filter, RateFilter};
pub use loader::{load_default_rates, load_rates, load_rates_from_reader, write_rates, write_rates_to_writer};
pub use synthetic::synthetic_rates;
