use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use crass_annot::cli::{Args, SubArgs};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    match args.command {
        SubArgs::Table { args } => {
            use crass_annot::core::make_annotation_tables;

            args.check().unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });

            make_annotation_tables(args).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
        }
        SubArgs::Colors { args } => {
            use crass_annot::core::color_annotations;

            args.check().unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });

            color_annotations(args).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
        }
    }

    let elapsed = start.elapsed();
    info!("Elapsed time: {:?}", elapsed);
}
