use clap::{Parser, Subcommand};
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "table")]
    Table {
        #[command(flatten)]
        args: TableArgs,
    },
    #[command(name = "colors")]
    Colors {
        #[command(flatten)]
        args: ColorsArgs,
    },
}

#[derive(Debug, Parser)]
pub struct TableArgs {
    #[arg(
        short = 'p',
        long = "profiles",
        required = true,
        value_name = "PATH",
        help = "Path to the two-column profile list [profile ID, nickname]"
    )]
    pub profiles: PathBuf,

    #[arg(
        short = 'd',
        long = "domtblout",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Filtered domtblout table(s) delimited by comma, paired with --gff by position"
    )]
    pub domtblout: Vec<PathBuf>,

    #[arg(
        short = 'g',
        long = "gff",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Prodigal GFF file(s) delimited by comma, paired with --domtblout by position"
    )]
    pub gff: Vec<PathBuf>,

    #[arg(
        long = "refseq-domtblout",
        required = false,
        value_name = "PATH",
        help = "Filtered domtblout table for the RefSeq annotation"
    )]
    pub refseq_domtblout: Option<PathBuf>,

    #[arg(
        long = "refseq-gff",
        required = false,
        value_name = "PATH",
        help = "RefSeq GFF file"
    )]
    pub refseq_gff: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "DIR",
        help = "Directory for the edited GFFs and name tables [default: next to each input]"
    )]
    pub outdir: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ColorsArgs {
    #[arg(
        short = 'n',
        long = "names",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Unique [#HMM_family, Query_ID] table(s) delimited by comma, paired with --gff by position"
    )]
    pub names: Vec<PathBuf>,

    #[arg(
        short = 'g',
        long = "gff",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Prodigal GFF file(s) delimited by comma, paired with --names by position"
    )]
    pub gff: Vec<PathBuf>,

    #[arg(
        long = "refseq-names",
        required = false,
        value_name = "PATH",
        help = "Unique [#HMM_family, Query_ID] table for the RefSeq annotation"
    )]
    pub refseq_names: Option<PathBuf>,

    #[arg(
        long = "refseq-gff",
        required = false,
        value_name = "PATH",
        help = "RefSeq GFF file"
    )]
    pub refseq_gff: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "DIR",
        help = "Directory for the filtered GFFs [default: next to each input]"
    )]
    pub outdir: Option<PathBuf>,
}

impl ArgCheck for TableArgs {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        let mut inputs = vec![&self.profiles];
        inputs.extend(self.domtblout.iter());
        inputs.extend(self.gff.iter());
        inputs.extend(self.refseq_domtblout.iter());
        inputs.extend(self.refseq_gff.iter());

        inputs
    }
}

impl ArgCheck for ColorsArgs {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        let mut inputs = Vec::new();
        inputs.extend(self.names.iter());
        inputs.extend(self.gff.iter());
        inputs.extend(self.refseq_names.iter());
        inputs.extend(self.refseq_gff.iter());

        inputs
    }
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}
