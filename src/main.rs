//! Expense Analyzer CLI
//!
//! Reads an expense CSV and writes the requested view as CSV on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- summary expense_data.csv
//! cargo run -- classify --amount 150 --payment-mode Rent
//! cargo run -- forecast --model monthly_expense_regressor.json --month 4
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity
//! - `EXPENSE_FOOD_LIMIT` / `EXPENSE_SHOPPING_LIMIT`: default category thresholds

use clap::{Args, Parser, Subcommand, ValueEnum};
use expense_analyzer::models::{load_classifier, load_detector, load_regressor};
use expense_analyzer::{
    report, Amount, AnalyzerError, CategoryModel, CategoryRules, ExpenseDataset, FeatureVector,
    Result,
};
use log::{info, warn};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "expense-analyzer",
    version,
    about = "Summarize, categorize, forecast and flag personal expenses"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction count, total and average spend
    Summary {
        /// Expense CSV file
        data: PathBuf,
    },

    /// Show the first or last transactions with derived date fields
    Preview {
        /// Expense CSV file
        data: PathBuf,
        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Show the first rows instead of the last
        #[arg(long)]
        head: bool,
    },

    /// Predict the category of one transaction from the rules
    Classify {
        /// Expense amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Amount,
        /// Payment mode, e.g. Cash, UPI, Fuel, Rent
        #[arg(short, long)]
        payment_mode: String,
        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Apply the rules to every transaction in a dataset
    Categorize {
        /// Expense CSV file
        data: PathBuf,
        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Predict monthly spend with a regressor artifact
    Forecast {
        /// Regressor JSON artifact
        #[arg(short, long)]
        model: PathBuf,
        /// Month to predict (1-12); all months when omitted
        #[arg(long)]
        month: Option<u32>,
    },

    /// Flag unusual transactions with an anomaly detector artifact
    Anomalies {
        /// Expense CSV file
        data: PathBuf,
        /// Anomaly detector JSON artifact
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Predict a category code with a classifier artifact
    Predict {
        /// Classifier JSON artifact
        #[arg(short, long)]
        model: PathBuf,
        /// Expense amount
        #[arg(short, long)]
        amount: Amount,
        /// Month of the expense (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Day of the month (1-31)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
        day: u32,
        /// Day of the week, 0 = Monday .. 6 = Sunday
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=6))]
        weekday: u32,
        /// Payment mode as known to the classifier
        #[arg(short, long)]
        payment_mode: String,
    },

    /// Feature importances stored in a classifier artifact
    Importances {
        /// Classifier JSON artifact
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Transaction counts by category or payment mode
    Breakdown {
        /// Expense CSV file
        data: PathBuf,
        /// Column to group by
        #[arg(long, value_enum, default_value_t = GroupBy::Category)]
        by: GroupBy,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Category,
    PaymentMode,
}

#[derive(Args)]
struct RuleArgs {
    /// Largest amount still counted as Food
    #[arg(long, env = "EXPENSE_FOOD_LIMIT", default_value = "100")]
    food_limit: Amount,
    /// Smallest amount counted as Shopping
    #[arg(long, env = "EXPENSE_SHOPPING_LIMIT", default_value = "2000")]
    shopping_limit: Amount,
    /// Reject thresholds where the food limit is not below the shopping limit
    #[arg(long)]
    strict: bool,
}

impl RuleArgs {
    fn into_rules(self) -> Result<CategoryRules> {
        let rules = CategoryRules::new(self.food_limit, self.shopping_limit);
        rules.check_reference_ranges();
        if let Err(e) = rules.validate() {
            if self.strict {
                return Err(e);
            }
            warn!("{}; amounts in both bands resolve to Shopping", e);
        }
        Ok(rules)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let handle = stdout.lock();

    match cli.command {
        Commands::Summary { data } => {
            let dataset = ExpenseDataset::open(data)?;
            report::write_summary(&dataset.summary()?, handle)?;
        }
        Commands::Preview { data, count, head } => {
            let dataset = ExpenseDataset::open(data)?;
            let rows = if head {
                dataset.head(count)
            } else {
                dataset.tail(count)
            };
            report::write_transactions(rows, handle)?;
        }
        Commands::Classify {
            amount,
            payment_mode,
            rules,
        } => {
            let rules = rules.into_rules()?;
            let category = rules.classify(amount, &payment_mode);
            info!("Rules used: {}", rules.describe().join("; "));
            report::write_classification(amount, &payment_mode, category, handle)?;
        }
        Commands::Categorize { data, rules } => {
            let rules = rules.into_rules()?;
            let dataset = ExpenseDataset::open(data)?;
            report::write_categorized(&dataset, &rules, handle)?;
        }
        Commands::Forecast { model, month } => {
            let regressor = load_regressor(model)?;
            let months: Vec<u32> = match month {
                Some(m) => vec![m],
                None => (1..=12).collect(),
            };
            report::write_forecast(&regressor, &months, handle)?;
        }
        Commands::Anomalies { data, model } => {
            let detector = load_detector(model)?;
            let dataset = ExpenseDataset::open(data)?;
            let found = report::write_anomalies(&dataset, &detector, handle)?;
            info!("{} of {} transactions flagged as unusual", found, dataset.len());
        }
        Commands::Predict {
            model,
            amount,
            month,
            day,
            weekday,
            payment_mode,
        } => {
            let classifier = load_classifier(model)?;
            let payment_code = classifier.encode_payment_mode(&payment_mode)?;
            let features = FeatureVector::new(amount, month, day, weekday, payment_code);
            report::write_category_code(classifier.predict(&features), handle)?;
        }
        Commands::Importances { model } => {
            let path = model.display().to_string();
            let classifier = load_classifier(&model)?;
            let importances = classifier
                .feature_importances()
                .ok_or_else(|| AnalyzerError::Model {
                    path,
                    message: "artifact has no feature_importances".to_string(),
                })?;
            report::write_importances(&importances, handle)?;
        }
        Commands::Breakdown { data, by } => {
            let dataset = ExpenseDataset::open(data)?;
            match by {
                GroupBy::Category => {
                    report::write_category_breakdown(&dataset.category_breakdown(), handle)?
                }
                GroupBy::PaymentMode => {
                    report::write_payment_mode_breakdown(&dataset.payment_mode_breakdown(), handle)?
                }
            }
        }
    }

    Ok(())
}
