//! Foxhole Production Calculator
//!
//! Command line front end: imports recipe files and runs calculations.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use foxhole_calculator::calculator::{Calculator, RecipeChooser, ScriptedChooser};
use foxhole_calculator::prompt::{self, InteractiveChooser};
use foxhole_calculator::report::Report;
use foxhole_calculator::{RecipeTable, Resource, ResourceAmount, db, extract, logging};

#[derive(Parser)]
#[command(name = "foxhole-calculator")]
#[command(about = "Production chain calculator for Foxhole logistics")]
struct Cli {
    /// Path to the SQLite recipe database
    #[arg(short, long, default_value = "recipes.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import recipes from a JSON file or a directory of JSON files
    Import {
        /// Recipe file or directory
        source: PathBuf,

        /// Clear existing recipes before importing
        #[arg(long)]
        clear: bool,
    },

    /// Calculate materials and byproducts for a list of products
    Calc {
        /// Products as "NUMBER NAME", e.g. "3 pcon" "20 120mm". Prompted for when omitted
        items: Vec<String>,

        /// Read recipes from this JSON file instead of the database
        #[arg(short, long)]
        recipes: Option<PathBuf>,

        /// Answer recipe prompts from a list, e.g. "1,0,2" (0 = none)
        #[arg(short, long, value_delimiter = ',')]
        choices: Option<Vec<usize>>,
    },

    /// List every normalized recipe
    ListRecipes {
        /// Read recipes from this JSON file instead of the database
        #[arg(short, long)]
        recipes: Option<PathBuf>,
    },

    /// List all known resources and how many recipes make each
    ListResources,

    /// Initialize empty database with schema
    Init,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { source, clear } => {
            let conn = db::open(&cli.database)?;
            if clear {
                println!("Clearing existing recipes...");
                db::clear_recipes(&conn)?;
            }

            let stats = extract::import_to_database(&conn, &source)?;
            println!("{}", stats);
            println!("Database now holds {} recipes", db::count_recipes(&conn)?);
        }

        Commands::Calc {
            items,
            recipes,
            choices,
        } => {
            let table = db::load_table(&cli.database, recipes.as_deref())?;
            if table.is_empty() {
                println!("No recipes loaded. Run 'import' or pass --recipes first.");
            }

            let demands = read_demands(&items)?;

            let ledger = match choices {
                Some(choices) => {
                    let mut chooser = ScriptedChooser::new(choices);
                    let ledger = calculate(&table, &demands, &mut chooser)?;
                    if chooser.remaining() > 0 {
                        warn!(unused = chooser.remaining(), "scripted choices left over");
                    }
                    ledger
                }
                None => {
                    let stdin = io::stdin();
                    let mut chooser = InteractiveChooser::new(stdin.lock(), io::stdout());
                    calculate(&table, &demands, &mut chooser)?
                }
            };

            println!();
            print!("{}", Report::new(&demands, &ledger));
        }

        Commands::ListRecipes { recipes } => {
            let table = db::load_table(&cli.database, recipes.as_deref())?;
            if table.is_empty() {
                println!("No recipes loaded. Run 'import' or pass --recipes first.");
            } else {
                for recipe in table.recipes() {
                    println!("  {}", recipe);
                }
            }
        }

        Commands::ListResources => {
            let table = db::load_table(&cli.database, None)?;
            println!("{:<12} {:>8}", "Resource", "Recipes");
            println!("{}", "-".repeat(21));
            for resource in Resource::ALL {
                let count = table.find_recipes(*resource).len();
                println!("{:<12} {:>8}", resource.name(), count);
            }
        }

        Commands::Init => {
            db::open(&cli.database)?;
            println!("Database initialized at: {}", cli.database.display());
        }
    }

    Ok(())
}

fn read_demands(items: &[String]) -> Result<Vec<ResourceAmount>> {
    if items.is_empty() {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let demands = prompt::prompt_demands(&mut stdin.lock(), &mut stdout)?;
        stdout.flush()?;
        return Ok(demands);
    }

    let mut demands = Vec::with_capacity(items.len());
    for item in items {
        match prompt::parse_demand_line(item) {
            Ok(demand) => demands.push(demand),
            Err(e) => bail!("Invalid product \"{}\": {}", item, e),
        }
    }
    Ok(demands)
}

fn calculate<C: RecipeChooser>(
    table: &RecipeTable,
    demands: &[ResourceAmount],
    chooser: &mut C,
) -> Result<foxhole_calculator::Ledger> {
    Calculator::new(table)
        .resolve(demands, chooser)
        .context("Calculation failed")
}
