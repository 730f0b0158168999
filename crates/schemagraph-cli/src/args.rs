//! Command-line argument definitions for the schemagraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity and pinned classes.

use clap::Parser;

use schemagraph::layout::Pin;

/// Command-line arguments for the schemagraph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON schema export
    #[arg(default_value = "db.json", help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Pin a class at a fixed position, e.g. `--pin Person=120,-40`
    #[arg(long = "pin", value_name = "CLASS=X,Y", allow_hyphen_values = true)]
    pub pins: Vec<Pin>,
}

#[cfg(test)]
mod tests {
    use schemagraph::geometry::Point;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["schemagraph"]).unwrap();
        assert_eq!(args.input, "db.json");
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
        assert!(args.pins.is_empty());
    }

    #[test]
    fn test_repeated_pins() {
        let args = Args::try_parse_from([
            "schemagraph",
            "schema.json",
            "--pin",
            "Person=10,-20",
            "--pin",
            "Company=0,0",
        ])
        .unwrap();

        assert_eq!(args.input, "schema.json");
        assert_eq!(
            args.pins,
            [
                Pin::new("Person", Point::new(10.0, -20.0)),
                Pin::new("Company", Point::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_invalid_pin_is_rejected() {
        assert!(Args::try_parse_from(["schemagraph", "--pin", "Person"]).is_err());
        assert!(Args::try_parse_from(["schemagraph", "--pin", "Person=NaN,0"]).is_err());
    }
}
