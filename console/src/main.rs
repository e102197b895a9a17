mod genomewide;
mod score;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use genomewide::GenomewideArgs;
use score::ScoreArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    #[command(
        name = "genomewide",
        about = "Per-bin methylation scores from sorted Bismark BAM files"
    )]
    Genomewide {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  GenomewideArgs,
    },

    #[command(
        name = "score",
        about = "Per-record methylation scores from an extracted read table"
    )]
    Score {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ScoreArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Genomewide { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Score { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
