use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Sample reference genomes per family from a taxonomy table")]
pub struct Args {
    #[arg(
        short = 'i',
        long = "input",
        required = true,
        value_name = "PATH",
        help = "Path to the taxonomy table [TSV export of the ICTV VMR spreadsheet]"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'f',
        long = "filtered",
        required = true,
        value_name = "PATH",
        help = "Output path for the filtered taxonomy table"
    )]
    pub filtered: PathBuf,

    #[arg(
        short = 'r',
        long = "random",
        required = true,
        value_name = "PATH",
        help = "Output path for the randomly sampled taxonomy table"
    )]
    pub random: PathBuf,

    #[arg(
        long = "class",
        help = "Taxonomic class to keep",
        value_name = "NAME",
        default_value = config::TARGET_CLASS
    )]
    pub class: String,

    #[arg(
        long = "exclude-order",
        help = "Taxonomic order to exclude",
        value_name = "NAME",
        default_value = config::EXCLUDED_ORDER
    )]
    pub exclude_order: String,

    #[arg(
        short = 'n',
        long = "per-family",
        help = "Maximum number of genomes to draw per family",
        value_name = "N",
        default_value_t = config::SAMPLE_SIZE
    )]
    pub per_family: usize,

    #[arg(
        long = "seed",
        required = false,
        value_name = "SEED",
        help = "Seed for the random source [unseeded when absent]"
    )]
    pub seed: Option<u64>,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.input]
    }
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}
