mod cli;

use anyhow::Result;
use clap::Parser;
use log::info;

use cli::{Cli, Commands, InspectArgs, QueryArgs};
use neo_explorer::data::writer::write_results;
use neo_explorer::{create_filters, limit, load_approaches, load_neos, NeoDatabase};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let neos = load_neos(&cli.neofile)?;
    let approaches = load_approaches(&cli.cadfile)?;
    let db = NeoDatabase::new(neos.records, approaches.records);

    match &cli.command {
        Commands::Inspect(args) => inspect(&db, args),
        Commands::Query(args) => query(&db, args),
    }
}

fn inspect(db: &NeoDatabase, args: &InspectArgs) -> Result<()> {
    let neo = match (&args.target.pdes, &args.target.name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (_, Some(name)) => db.get_neo_by_name(name),
        _ => None,
    };

    let Some(neo) = neo else {
        println!("No matching NEOs exist in the database.");
        return Ok(());
    };

    println!("{neo}");
    if args.verbose {
        for approach in db.approaches_of(neo) {
            println!("- {}", approach.describe(Some(neo)));
        }
    }
    Ok(())
}

fn query(db: &NeoDatabase, args: &QueryArgs) -> Result<()> {
    let filters = create_filters(&args.criteria());
    for f in &filters {
        info!("Filter: {f}");
    }

    let results = limit(db.query(&filters), Some(args.limit));

    match &args.outfile {
        Some(path) => {
            write_results(path, results, db)?;
        }
        None => {
            let mut count = 0;
            for approach in results {
                println!("{}", approach.describe(db.neo_of(approach)));
                count += 1;
            }
            if count == 0 {
                println!("No close approaches match the given filters.");
            }
        }
    }
    Ok(())
}
