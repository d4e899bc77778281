use clap::Parser;
use colored::Colorize;

use floodwatch::cli::args::{Cli, Commands, MapCommands};
use floodwatch::cli::commands;
use floodwatch::error::FloodwatchError;
use floodwatch::features::records::RecordStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), FloodwatchError> {
    let cli = Cli::parse();
    let format = cli.output;

    let output = match cli.command {
        Commands::Watch(args) => {
            commands::watch(&args)?;
            String::new()
        }
        Commands::Maps(args) => {
            let store = RecordStore::new()?;
            match args.command {
                MapCommands::List => commands::maps_list(&store, format)?,
                MapCommands::Show { name } => commands::maps_show(&store, &name, format)?,
                MapCommands::Add { name, song } => {
                    commands::maps_add(&store, &name, song.as_deref())?
                }
            }
        }
        Commands::Sessions(args) => {
            let store = RecordStore::new()?;
            commands::sessions_list(&store, args.map.as_deref(), args.limit, format)?
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
