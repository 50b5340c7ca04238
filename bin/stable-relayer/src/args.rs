//! Parses command-line arguments for the relayer.

use std::path::PathBuf;

use clap::{crate_version, Parser};

#[derive(Debug, Parser)]
#[clap(
    name = "stable-relayer",
    about = "Relays attested burn/mint transfers to their destination chains",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[clap(
        long,
        short = 'p',
        help = "The file containing the relayer timing params",
        default_value = "params.toml"
    )]
    pub params: PathBuf,

    #[clap(
        long,
        short = 'c',
        help = "The file containing the configuration for the relayer",
        default_value = "config.toml"
    )]
    pub config: PathBuf,
}
