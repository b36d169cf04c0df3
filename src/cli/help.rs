//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print a usage reminder with the effective defaults.
pub fn print_smart_help(config: &Config) {
    println!("Usage: plantwatch [FILES]... [OPTIONS]");
    println!("       plantwatch watch <FILE> [OPTIONS]");
    println!("       plantwatch georef <CROSSINGS> [--timestamps <FILE>] [--gnss <FILE>]");
    println!();
    println!("{}", defaults_line(config));
    println!();
    println!("Example: plantwatch crossing_records.csv -s 0.5 -f csv,json");
    println!();
    println!("Run 'plantwatch -h' for all options or 'plantwatch config init' to create a config file.");
}

fn defaults_line(config: &Config) -> String {
    format!(
        "Standard spacing: {} m, reference latitude: {}",
        config.defaults.standard_spacing, config.defaults.reference_latitude
    )
}
