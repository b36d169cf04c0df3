//! Crossing record input.

mod parser;

pub use parser::{
    RawCrossing, parse_crossings_file, parse_crossings_str, parse_records_file,
    parse_records_str,
};
