use std::{fmt, path::PathBuf};

/// How element values are turned into fills.
///
/// With the `clap` feature this doubles as the `-m` value list, using the
/// same names as [`fmt::Display`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColorMode {
    /// Grayscale shade equal to the value (0 = black, 1 = white).
    #[default]
    Bw,
    /// Fixed hue per element with the value as alpha.
    Color,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColorMode::Bw => write!(f, "bw"),
            ColorMode::Color => write!(f, "color"),
        }
    }
}

/// Run configuration, built once from the command line.
///
/// `input == None` selects the synthetic demo table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub mode: ColorMode,
}
