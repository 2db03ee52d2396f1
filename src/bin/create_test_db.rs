use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::macros::date;

use expense_tracker::{
    Money, NewAccount, NewCard, NewCategory, NewExpense, NewUser, PasswordHash, create_account,
    create_card, create_category, create_expense, create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

fn money(amount: &str) -> Result<Money, Box<dyn Error>> {
    Ok(Money::new(Decimal::from_str(amount)?)?)
}

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

    initialize_db(&conn)?;

    println!("Creating test user test@example.com with the password 'test'...");

    let user = create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: PasswordHash::from_raw_password("test", PasswordHash::DEFAULT_COST)?,
        },
        &conn,
    )?;

    println!("Creating accounts, cards and categories...");

    let checking = create_account(
        user.id,
        NewAccount {
            account_name: "Everyday".to_owned(),
            balance: money("1520.35")?,
            account_type: "Checking".to_owned(),
        },
        &conn,
    )?;
    create_account(
        user.id,
        NewAccount {
            account_name: "Rainy Day".to_owned(),
            balance: money("8000")?,
            account_type: "Savings".to_owned(),
        },
        &conn,
    )?;
    let card = create_card(
        user.id,
        NewCard {
            card_name: "Visa".to_owned(),
            limit: money("5000")?,
            closing_day: 5,
            due_day: 15,
        },
        &conn,
    )?;

    let mut categories = Vec::new();
    for name in ["Groceries", "Transport", "Eating Out"] {
        let category = create_category(
            user.id,
            NewCategory {
                category_name: name.to_owned(),
                category_type: "Expense".to_owned(),
            },
            &conn,
        )?;
        categories.push(category.id);
    }

    println!("Creating expenses...");

    let expenses = [
        (0, Some(checking.id), None, "84.20", date!(2024 - 12 - 02), "Weekly shop"),
        (1, None, Some(card.id), "45.00", date!(2024 - 12 - 04), "Fuel"),
        (2, None, Some(card.id), "32.50", date!(2024 - 12 - 06), "Pizza"),
        (0, Some(checking.id), None, "61.95", date!(2024 - 12 - 09), "Weekly shop"),
        (1, Some(checking.id), None, "3.80", date!(2024 - 12 - 10), "Bus fare"),
        (2, None, None, "12.00", date!(2024 - 12 - 13), "Coffee and cake"),
    ];

    for (category_index, account_id, card_id, amount, date, description) in expenses {
        create_expense(
            user.id,
            NewExpense {
                account_id,
                card_id,
                category_id: categories[category_index],
                amount: money(amount)?,
                date,
                description: Some(description.to_owned()),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
