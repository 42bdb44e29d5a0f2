use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Filter hmmscan domtblout results by e-value and coverage")]
pub struct Args {
    #[arg(
        short = 'd',
        long = "domtblout",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Paths to hmmscan domtblout file(s) delimited by comma"
    )]
    pub domtblout: Vec<PathBuf>,

    #[arg(
        short = 'e',
        long = "evalue",
        help = "Upper e-value cutoff [hits must be strictly below]",
        value_name = "FLOAT",
        default_value_t = config::EVALUE_THRESHOLD
    )]
    pub evalue: f64,

    #[arg(
        short = 'c',
        long = "coverage",
        help = "Lower profile-coverage cutoff [hits must be strictly above]",
        value_name = "FLOAT",
        default_value_t = config::COVERAGE_THRESHOLD
    )]
    pub coverage: f64,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "DIR",
        help = "Directory for the filtered tables [default: next to each input]"
    )]
    pub outdir: Option<PathBuf>,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        self.domtblout.iter().collect()
    }
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}
