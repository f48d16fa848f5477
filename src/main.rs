use clap::{command, Parser};
use colored::Colorize;
use gh_org_client::Bootstrap;

/// List the public repositories of a GitHub organization
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The organization to look at. Falls back to the GH_ORG environment variable
    org: Option<String>,

    /// Only list repositories declaring this license key, e.g. apache-2.0
    #[arg(long)]
    license: Option<String>,
}

fn main() {
    let args = Args::parse();

    let bootstrap = match Bootstrap::new(args.org) {
        Ok(b) => b,
        Err(e) => {
            println!("{}", e.to_string().bold().red());
            std::process::exit(1);
        }
    };

    let client = bootstrap.client();
    match client.public_repos(args.license.as_deref()) {
        Ok(repos) => {
            for repo in repos {
                println!("{repo}");
            }
        }
        Err(e) => {
            println!(
                "{} {}: {}",
                "I couldn't list the repositories of".red(),
                bootstrap.org().white(),
                e.to_string().red()
            );
            std::process::exit(1);
        }
    }
}
