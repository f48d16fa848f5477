use std::path::PathBuf;

use clap::{command, Parser};
use colored::Colorize;
use user_seed::{config, schema, stream};

/// Load users from a CSV export into the user_data table
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with the database and CSV paths. Defaults to ./user-seed.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let configuration = match config::get_configuration(args.config) {
        Ok(c) => c,
        Err(e) => {
            println!("{}", e.to_string().bold().red());
            std::process::exit(1);
        }
    };

    if let Err(e) = user_seed::seed(&configuration) {
        println!("{}: {}", "The import failed".bold().red(), e);
        std::process::exit(1);
    }

    let average = schema::connect_db(&configuration).and_then(|conn| stream::average_age(&conn));
    match average {
        Ok(Some(average)) => println!("{} {:.2}", "Average age of users:".green(), average),
        Ok(None) => println!("{}", "There are no users yet.".yellow()),
        Err(e) => println!("{}: {}", "I couldn't compute the average age".red(), e),
    }
}
