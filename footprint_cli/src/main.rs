//! # Footprint CLI
//!
//! Thin transport in front of `footprint_core`: decodes a request, runs the
//! engine, prints the result as JSON.
//!
//! ## Usage
//!
//! ```text
//! footprint [--config engine.toml] <category> [input.json | -]
//! footprint [--config engine.toml]                # interactive prompts
//! footprint --print-factors                       # dump built-in tables as TOML
//! ```
//!
//! `category` is one of `waste`, `travel`, `energy`, `diet`. The input is a
//! flat JSON object of answers, read from a file or stdin.
//!
//! Exit status: 0 on success, 2 when the input is rejected (the HTTP 400
//! equivalent), 1 on configuration or I/O errors.
//!
//! Logging goes to stderr; set `RUST_LOG` to adjust and `FOOTPRINT_LOG_JSON=1`
//! for JSON lines.

use std::env;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use footprint_core::validation::fields;
use footprint_core::{
    Category, CategoryInput, Computed, EmissionResult, Engine, EngineConfig, FactorTables,
    ValidationError,
};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_FAILURE: u8 = 1;

fn init_tracing() {
    let json = env::var("FOOTPRINT_LOG_JSON").map(|v| v == "1").unwrap_or(false);

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_target(false).with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(io::stderr)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    category: Option<String>,
    input: Option<String>,
    print_factors: bool,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut raw = raw.into_iter();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = raw.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--print-factors" => args.print_factors = true,
            "--help" | "-h" => return Err(usage()),
            _ if args.category.is_none() => args.category = Some(arg),
            _ if args.input.is_none() => args.input = Some(arg),
            _ => return Err(format!("Unexpected argument: {}\n\n{}", arg, usage())),
        }
    }

    Ok(args)
}

fn usage() -> String {
    "Usage: footprint [--config engine.toml] [--print-factors] <waste|travel|energy|diet> [input.json|-]"
        .to_string()
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig, String> {
    match path.or_else(|| env::var_os("FOOTPRINT_CONFIG").map(PathBuf::from)) {
        Some(path) => EngineConfig::load(&path).map_err(|e| e.to_string()),
        None => Ok(EngineConfig::default()),
    }
}

fn read_input(source: &str) -> Result<CategoryInput, String> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        text
    } else {
        fs::read_to_string(source).map_err(|e| format!("Failed to read {}: {}", source, e))?
    };

    serde_json::from_str(&text).map_err(|e| format!("Input must be a flat JSON object: {}", e))
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return None;
    }

    let answer = input.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

fn ask(input: &mut CategoryInput, field: &str, label: &str) -> bool {
    match prompt(label) {
        Some(answer) => {
            input.insert(field, answer);
            true
        }
        None => false,
    }
}

fn options<'a>(keys: impl IntoIterator<Item = &'a str>) -> String {
    keys.into_iter().collect::<Vec<_>>().join(" / ")
}

/// Ask for each field of `category`, skipping follow-ups a "no" makes moot.
fn prompt_input(category: Category, tables: &FactorTables) -> CategoryInput {
    let mut input = CategoryInput::new();

    match category {
        Category::Waste => {
            ask(&mut input, fields::GENERATED_WASTE, "Did you generate waste this week? (yes/no): ");
            let label = format!("Age group ({}): ", options(tables.waste.age_group_keys()));
            ask(&mut input, fields::AGE_GROUP, &label);
        }
        Category::Travel => {
            for mode in tables.travel.iter() {
                let toggle = mode.toggle_field();
                let asked = ask(&mut input, &toggle, &format!("Did you travel by {}? (yes/no): ", mode.mode));
                if asked && input.token(&toggle).map(|t| t == "yes").unwrap_or(false) {
                    ask(&mut input, &mode.distance_field(), &format!("Distance by {}: ", mode.mode));
                }
            }
        }
        Category::Energy => {
            ask(&mut input, fields::ENERGY_USAGE, "Did you use energy at home? (yes/no): ");
            if input.token(fields::ENERGY_USAGE).map(|t| t == "yes").unwrap_or(false) {
                ask(&mut input, fields::ELECTRICITY_BILL, "Electricity bill: ");
                let label = format!("Gas meter type ({}): ", options(tables.energy.meter_types()));
                ask(&mut input, fields::GAS_METER_TYPE, &label);
                ask(&mut input, fields::GAS_BILL, "Gas bill: ");
            }
        }
        Category::Diet => {
            let label = format!("Age category ({}): ", options(tables.diet.age_categories()));
            ask(&mut input, fields::AGE_CATEGORY, &label);
            let label = format!("Gender ({}): ", options(tables.diet.genders()));
            ask(&mut input, fields::GENDER, &label);
            let label = format!("Diet type ({}): ", options(tables.diet.diet_types()));
            ask(&mut input, fields::DIET_TYPE, &label);
        }
    }

    input
}

fn report_rejection(err: &ValidationError) -> ExitCode {
    eprintln!("Error: {}", err);
    if let Ok(json) = serde_json::to_string_pretty(err) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::from(EXIT_INVALID_INPUT)
}

fn report_result(computed: &Computed<EmissionResult>) -> ExitCode {
    for err in &computed.storage_errors {
        eprintln!("Warning: result not recorded: {}", err);
    }

    match serde_json::to_string_pretty(&computed.result) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to encode result: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<ExitCode, String> {
    if args.print_factors {
        let toml = FactorTables::standard().to_toml_string().map_err(|e| e.to_string())?;
        print!("{}", toml);
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(args.config)?;
    let engine = Engine::from_config(config).map_err(|e| e.to_string())?;
    debug!("Using factor tables {}", engine.tables().version);

    let interactive = args.category.is_none();
    let category_name = match args.category {
        Some(name) => name,
        None => {
            println!("Footprint - Personal Emissions Calculator");
            println!("=========================================");
            println!();
            prompt("Category (waste/travel/energy/diet): ").unwrap_or_default()
        }
    };

    let category = match Category::from_str_flexible(&category_name) {
        Ok(category) => category,
        Err(err) => return Ok(report_rejection(&err)),
    };

    let input = match args.input {
        Some(source) => read_input(&source)?,
        None if interactive => prompt_input(category, engine.tables()),
        None => read_input("-")?,
    };

    if interactive {
        println!();
    }

    match engine.calculate(category, &input) {
        Ok(computed) => Ok(report_result(&computed)),
        Err(err) => Ok(report_rejection(&err)),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
