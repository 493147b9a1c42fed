use std::path::PathBuf;

use clap::Parser;
use dmat_core::config::{ColorMode, Config};

/// Animate density-matrix element magnitudes on a 2x2 grid.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input file. Cols: time |1⟩⟨1| |1⟩⟨2| |2⟩⟨1| |2⟩⟨2|
    #[arg(short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Black & white or color mode.
    #[arg(short = 'm', value_enum, default_value_t = ColorMode::Bw)]
    mode: ColorMode,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            input: self.file,
            mode: self.mode,
        }
    }
}
