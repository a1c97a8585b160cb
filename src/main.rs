use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod convert;

#[derive(Parser)]
struct Importer {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Convert {
        #[clap(short, long, value_parser, value_name = "PATH")]
        data_path: PathBuf,

        #[clap(short, long, value_parser, default_value = "en")]
        locale: String,

        #[clap(short, long, value_parser, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let importer = Importer::parse();

    match importer.command {
        Command::Convert {
            data_path,
            locale,
            output,
        } => {
            convert::convert(data_path, locale, output).unwrap();
        }
    }
}
