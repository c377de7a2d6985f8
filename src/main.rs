use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tree_volume_estimator::{
    calc::{BatchEvaluator, CalculatorConfig, VolumeCalculator},
    config::CruiseConfig,
    engine::{lookup, EquationLookup, ProfileEngine, StaticEquationTable},
    io,
    models::{CalcMode, TreeInput},
    report,
};

#[derive(Parser)]
#[command(
    name = "treevol",
    about = "Standing-tree volume estimation and log merchandizing",
    version,
    author
)]
struct Cli {
    /// Path to a TOML cruise configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report volume and log detail for a single tree
    Tree {
        /// Species code or abbreviation (e.g. DF, WH, or an FIA number)
        #[arg(short, long)]
        species: String,

        /// Tree DBH in inches
        #[arg(short, long)]
        dbh: f64,

        /// Tree total height in feet
        #[arg(short = 't', long)]
        height: f64,

        /// Girard form class
        #[arg(short, long, default_value = "80")]
        form_class: i32,

        /// Volume equation identifier; "fia" selects the FIA default
        #[arg(short, long)]
        equation: Option<String>,

        /// Compute and display per-product-class aggregates
        #[arg(long)]
        products: bool,
    },

    /// Evaluate a batch of trees from a CSV file (dbh,height[,form_class])
    Batch {
        /// Input CSV path
        #[arg(short, long)]
        input: PathBuf,

        /// Optional output CSV path for the result rows
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Species code or abbreviation for the whole batch
        #[arg(short, long, default_value = "DF")]
        species: String,

        /// Compute per-product-class aggregates
        #[arg(long)]
        products: bool,
    },

    /// Print the effective merchandizing rules and product classes
    Rules,
}

fn load_config(path: &Option<PathBuf>) -> Result<CruiseConfig> {
    match path {
        Some(p) => Ok(CruiseConfig::load(p)?),
        None => Ok(CruiseConfig::default()),
    }
}

fn resolve_species(spec: &str) -> Result<(u16, String)> {
    if let Ok(code) = spec.parse::<u16>() {
        let abbrev = lookup::species_abbrev(code).unwrap_or("?").to_string();
        return Ok((code, abbrev));
    }
    let code = lookup::species_code(spec)?;
    Ok((code, spec.to_uppercase()))
}

fn resolve_equation(
    equation: &Option<String>,
    species: u16,
    config: &CruiseConfig,
) -> Result<String> {
    let table = StaticEquationTable;
    match equation.as_deref() {
        None => Ok(table.default_equation(
            species,
            config.cruise.region,
            &config.cruise.forest,
            &config.cruise.district,
            false,
        )?),
        Some(e) if e.eq_ignore_ascii_case("fia") => Ok(table.default_equation(
            species,
            config.cruise.region,
            &config.cruise.forest,
            &config.cruise.district,
            true,
        )?),
        Some(e) => Ok(e.to_string()),
    }
}

fn build_calculator(
    config: &CruiseConfig,
    vol_eq: String,
    products: bool,
) -> Result<VolumeCalculator> {
    let calc_config = CalculatorConfig {
        vol_eq,
        region: config.cruise.region,
        forest: config.cruise.forest.clone(),
        district: config.cruise.district.clone(),
        product: config.cruise.product.clone(),
        mode: CalcMode::Cruise,
        rules: config.merch_rules()?,
        product_table: products.then(|| config.product_table()).transpose()?,
    };
    Ok(VolumeCalculator::new(
        Box::new(ProfileEngine::new()),
        calc_config,
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Tree {
            species,
            dbh,
            height,
            form_class,
            equation,
            products,
        } => {
            let (code, abbrev) = resolve_species(&species)?;
            let vol_eq = resolve_equation(&equation, code, &config)?;

            let mut calculator = build_calculator(&config, vol_eq.clone(), products)?;
            let mut tree = TreeInput::new(dbh, height);
            tree.species = code;
            tree.form_class = form_class;

            let result = calculator.calc(&tree)?;

            report::print_volume_report(
                &format!("{abbrev} ({code})"),
                &vol_eq,
                dbh,
                form_class,
                height,
                &result,
            );
            report::print_log_table(&result);
            if products {
                let table = config.product_table()?;
                report::print_product_table(&table, &result);
            }
        }

        Commands::Batch {
            input,
            output,
            species,
            products,
        } => {
            let (code, _) = resolve_species(&species)?;
            let vol_eq = resolve_equation(&None, code, &config)?;

            let batch_input = io::read_batch_csv(&input)?;
            println!(
                "  Loaded {} trees from {}",
                batch_input.dbh.len(),
                input.display()
            );

            let calculator = build_calculator(&config, vol_eq, products)?;
            let mut evaluator = BatchEvaluator::new(calculator);
            let results = evaluator.evaluate(
                &batch_input.dbh,
                &batch_input.height,
                batch_input.form_class.as_deref(),
            )?;

            report::print_batch_table(&results);

            let failed = results.rows.iter().filter(|r| r.error_code != 0).count();
            if failed > 0 {
                println!("{}", format!("{failed} tree(s) failed").yellow());
            }

            if let Some(path) = output {
                io::write_batch_csv(&results, &path)?;
                println!("Results written to {}", path.display());
            }
        }

        Commands::Rules => {
            let rules = config.merch_rules()?;
            let table = config.product_table()?;
            println!("{}", "Merchandizing Rules".bold().green());
            println!("{}", toml::to_string_pretty(&rules)?);
            println!("{}", "Product Classes".bold().green());
            for (i, class) in table.classes().iter().enumerate() {
                println!(
                    "  {i}: {} (min diam {:.1}\", min length {:.1} ft)",
                    class.name, class.min_diameter, class.min_length
                );
            }
        }
    }

    Ok(())
}
