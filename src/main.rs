use std::io::{self, BufRead, Write};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use log::error;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use gradeledger::models::TermRef;
use gradeledger::utils::report::{catalog_message, cgpa_message, grade_scale_message, ledger_message, selection_message, semester_saved_message};
use gradeledger::{Config, GradeLedger, LedgerError};

/// GPA and CGPA calculator backed by the academic tools service
#[derive(Parser)]
#[command(name = "gradeledger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TermArgs {
    /// Level identifier, as known by the server
    #[arg(long)]
    level: String,
    /// Semester identifier, as known by the server
    #[arg(long)]
    semester: String,
    /// Level name used in saved semester labels (e.g. "100 Level")
    #[arg(long)]
    level_name: Option<String>,
    /// Semester name used in saved semester labels (e.g. "First Semester")
    #[arg(long)]
    semester_name: Option<String>,
}

impl TermArgs {
    fn level(&self) -> TermRef {
        TermRef { id: self.level.clone(), name: self.level_name.clone() }
    }

    fn semester(&self) -> TermRef {
        TermRef { id: self.semester.clone(), name: self.semester_name.clone() }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the grade scale
    Scale,
    /// List the courses of a level and semester
    Courses {
        #[command(flatten)]
        term: TermArgs,
        /// Only show courses whose code or title contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add catalog courses to the selection by id
    Add {
        #[command(flatten)]
        term: TermArgs,
        #[arg(required = true)]
        course_ids: Vec<u64>,
    },
    /// Remove a selected course (1-based position)
    Remove { position: usize },
    /// Assign a grade to a selected course (1-based position)
    Grade { position: usize, grade: String },
    /// Show the selection and its GPA
    Show,
    /// Save the selection as a finalized semester
    Finalize {
        #[command(flatten)]
        term: TermArgs,
    },
    /// List saved semesters and the CGPA
    Semesters,
    /// Delete a saved semester (1-based position)
    Forget { position: usize },
    /// Submit every saved semester and report the CGPA
    Cgpa,
    /// Clear the selection and every saved semester
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

// Command line positions start at 1; 0 maps to a position that never exists.
fn index(position: usize) -> usize {
    position.checked_sub(1).unwrap_or(usize::MAX)
}

// Asks the user to confirm a destructive action on stdin.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn run(command: Command, calculator: &mut GradeLedger) -> Result<()> {
    match command {
        Command::Scale => print!("{}", grade_scale_message()),
        Command::Courses { term, search } => {
            calculator.select_term(Some(term.level()), Some(term.semester())).await;
            calculator.set_search_query(search);
            print!("{}", catalog_message(&calculator.filtered_courses(), |id| calculator.is_selected(id)));
        },
        Command::Add { term, course_ids } => {
            calculator.select_term(Some(term.level()), Some(term.semester())).await;
            for course_id in course_ids {
                if !calculator.add_course_by_id(course_id)? {
                    println!("Course {} was not added (already selected or not in the catalog).", course_id);
                }
            }
            print!("{}", selection_message(calculator.selection()));
        },
        Command::Remove { position } => {
            if calculator.remove_course(index(position))?.is_none() {
                println!("No selected course at position {}.", position);
            }
            print!("{}", selection_message(calculator.selection()));
        },
        Command::Grade { position, grade } => {
            if !calculator.select_grade(index(position), &grade.to_uppercase())? {
                println!("No selected course at position {}.", position);
            }
            print!("{}", selection_message(calculator.selection()));
        },
        Command::Show => print!("{}", selection_message(calculator.selection())),
        Command::Finalize { term } => {
            calculator.set_term(Some(term.level()), Some(term.semester()));
            let report = calculator.finalize_semester().await?;
            println!("{}", semester_saved_message(&report.result, &report.sync));
        },
        Command::Semesters => print!("{}", ledger_message(calculator.ledger())),
        Command::Forget { position } => {
            if calculator.remove_saved_semester(index(position))?.is_none() {
                println!("No saved semester at position {}.", position);
            }
            print!("{}", ledger_message(calculator.ledger()));
        },
        Command::Cgpa => {
            let report = calculator.save_cgpa().await?;
            println!("{}", cgpa_message(&report.local_cgpa, &report.sync));
        },
        Command::Reset { yes } => {
            let confirmed = yes || confirm("Are you sure you want to reset all calculations? This action cannot be undone.")?;
            if calculator.reset_calculator(confirmed)? {
                println!("All calculations have been reset.");
            } else {
                println!("Reset cancelled.");
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            std::process::exit(2);
        },
    };

    // Logs to the terminal with mixed output (both stdout and stderr) and automatic color support.
    if let Err(e) = TermLogger::init(config.log_level, LogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Logging disabled: {}", e);
    }

    let mut calculator = match GradeLedger::open(&config) {
        Ok(calculator) => calculator,
        Err(e) => {
            error!("Error opening the calculator: {:#}", e);
            std::process::exit(1);
        },
    };

    if let Err(e) = run(cli.command, &mut calculator).await {
        // Validation failures are printed as plain messages.
        match e.downcast_ref::<LedgerError>() {
            Some(ledger_error) if ledger_error.is_validation() => {
                println!("{}", ledger_error);
                std::process::exit(2);
            },
            _ => {
                error!("{:#}", e);
                std::process::exit(1);
            },
        }
    }
}
