use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Extract, measure and align per-cluster protein sequences")]
pub struct Args {
    #[arg(
        short = 'c',
        long = "clusters",
        required = true,
        value_name = "PATH",
        help = "Path to the two-column pairwise cluster table [cluster, member]"
    )]
    pub clusters: PathBuf,

    #[arg(
        short = 'f',
        long = "faa",
        required = true,
        value_name = "PATH",
        help = "Path to the full protein sequence collection [FASTA]"
    )]
    pub faa: PathBuf,

    #[arg(
        short = 's',
        long = "sizes",
        required = true,
        value_name = "PATH",
        help = "Path to the two-column sequence length table [id, length]"
    )]
    pub sizes: PathBuf,

    #[arg(
        short = 'o',
        long = "outdir",
        required = true,
        value_name = "DIR",
        help = "Directory to place per-cluster artifacts under"
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads passed to the aligner",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.clusters, &self.faa, &self.sizes]
    }
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}
