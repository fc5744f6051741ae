use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    AppState,
    expense::{ExpenseClient, ExpenseDraft, IdempotencyToken},
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample expenses as (amount, category, description, days ago).
const SAMPLE_EXPENSES: [(f64, &str, &str, i64); 10] = [
    (450.0, "Food", "Weekly groceries", 1),
    (120.0, "Transport", "Metro card top-up", 2),
    (799.0, "Entertainment", "Concert ticket", 3),
    (1850.5, "Utilities", "Electricity bill", 5),
    (300.0, "Healthcare", "Pharmacy", 6),
    (2499.0, "Shopping", "Running shoes", 8),
    (1200.0, "Education", "Online course", 10),
    (85.0, "Food", "Chai and samosas", 12),
    (60.0, "Transport", "Auto rickshaw", 14),
    (150.0, "Other", "Gift wrapping", 20),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    let state = AppState::new(conn, "Etc/UTC")?;
    let client = ExpenseClient::new(state.expense_store);
    let today = OffsetDateTime::now_utc().date();

    println!("Creating sample expenses...");

    for (amount, category, description, days_ago) in SAMPLE_EXPENSES {
        let draft = ExpenseDraft {
            amount,
            category: category.to_owned(),
            description: description.to_owned(),
            date: Some(today - Duration::days(days_ago)),
        };

        let new_expense = draft.validate(today)?;
        client.create_expense(&new_expense, &IdempotencyToken::generate())?;
    }

    println!("Success!");

    Ok(())
}
