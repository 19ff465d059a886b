//! demostat - summary statistics over demographic/income survey CSVs.
//!
//! Loads a delimited survey file, derives ten aggregate metrics, and
//! reports them to the console, as JSON, or in an interactive terminal UI.

mod aggregate;
mod app;
mod cli;
mod loader;
mod record;
mod report;

use std::error::Error;
use std::process;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cli::{Args, Mode};

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // The fmt subscriber and the terminal UI would both write to stdout.
    if args.mode != Mode::Tui {
        init_logging(&args);
    }

    if let Err(e) = run(&args) {
        error!("analysis failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    match args.mode {
        Mode::Tui => app::run_tui(&args.data_dir),
        Mode::Console | Mode::Json => {
            // validate() guarantees an input path in these modes
            let path = args.input.as_deref().ok_or("no input file given")?;
            let table = loader::load_csv(path)?;
            info!(rows = table.len(), "table loaded");
            let result = aggregate::compute(&table)?;
            match args.mode {
                Mode::Console => print!("{}", report::render_console(&result)),
                Mode::Json => println!("{}", report::render_json(&result)?),
                Mode::Tui => unreachable!(),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SAMPLE: &str = "\
age,workclass,education,occupation,race,sex,hours-per-week,native-country,salary
30,Private,Bachelors,Tech-support,White,Male,40,India,>50K
40,Private,Masters,Tech-support,Asian-Pac-Islander,Male,50,India,>50K
50,Private,HS-grad,Sales,White,Female,20,United-States,<=50K
28,Private,Doctorate,Prof-specialty,Black,Female,60,India,<=50K
";

    #[test]
    fn load_compute_report_pipeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = loader::load_csv(file.path()).unwrap();
        let result = aggregate::compute(&table).unwrap();

        assert_eq!(result.average_age_men, 35.0);
        assert_eq!(result.percentage_bachelors, 25.0);
        assert_eq!(result.min_work_hours, 20);
        assert_eq!(result.top_india_occupation, "Tech-support");
        assert_eq!(result.race_count.values().sum::<u64>(), 4);

        let transcript = report::render_console(&result);
        assert!(transcript.contains("Average age of men: 35.0"));
        assert!(transcript.contains("Top occupation in India for those earning >50K: Tech-support"));
    }

    #[test]
    fn missing_salary_column_surfaces_as_schema_error() {
        let input = "age,education,occupation,race,sex,hours-per-week,native-country\n";
        let table = loader::load_from_reader(input.as_bytes()).unwrap();
        let err = aggregate::compute(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "required column `salary` is missing from the input table"
        );
    }
}
