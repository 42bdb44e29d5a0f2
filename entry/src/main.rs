/// crasstools: scripts supporting a viral-genomics annotation pipeline
///
/// This is the entry point for the crasstools CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand [crass-tool]
/// in-process through its library entry function.
///
/// This wrapper offers 4 different subcommands:
/// - crass-hits
/// - crass-annot
/// - crass-cluster
/// - crass-taxa
///
/// Each subcommand/submodule covers one stage of the pipeline:
/// filtering hmmscan domtblout hits by significance, resolving
/// profile hits to protein names and rewriting GFF annotations,
/// extracting and aligning per-cluster protein sequences, and
/// sampling reference genomes from the ICTV taxonomy. The shared
/// constants [functional-color table, thresholds, file suffixes]
/// live in the hidden 'config' submodule.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// crasstools crass-annot -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use log::{error, Level};
use simple_logger::init_with_level;

use crass_annot::lib_crass_annot;
use crass_cluster::lib_crass_cluster;
use crass_hits::lib_crass_hits;
use crass_taxa::lib_crass_taxa;

#[derive(Parser)]
#[command(name = "crasstools")]
#[command(about = "crasstools: scripts supporting a viral-genomics annotation pipeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "crass-hits")]
    Hits(ToolArgs),
    #[command(name = "crass-annot")]
    Annot(ToolArgs),
    #[command(name = "crass-cluster")]
    Cluster(ToolArgs),
    #[command(name = "crass-taxa")]
    Taxa(ToolArgs),
}

#[derive(Args)]
struct ToolArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let result = match cli.command {
        Commands::Hits(args) => lib_crass_hits(args.args),
        Commands::Annot(args) => lib_crass_annot(args.args),
        Commands::Cluster(args) => lib_crass_cluster(args.args),
        Commands::Taxa(args) => lib_crass_taxa(args.args),
    };

    result.unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });
}

fn init() {
    let message = format!(
        r#"

        crasstools: scripts supporting a viral-genomics annotation pipeline

        this is the entry point for the crasstools CLI
        and it is responsible for parsing the CLI arguments
        for each crass-tool:

        - crass-hits
        - crass-annot
        - crass-cluster
        - crass-taxa

        > version: {}

        for any bug, please open an issue on the repository.

        * to get help on the subcommands, run:
            crasstools <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", message);
}
