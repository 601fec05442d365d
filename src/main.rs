//! Realty Projection CLI
//!
//! Projects a deal under its scenario presets and prints cash flows and IRR

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use realty_projection::assumptions::loader::DEFAULT_SCENARIOS_PATH;
use realty_projection::deal::loader::DEFAULT_DEAL_PATH;
use realty_projection::deal::load_deal;
use realty_projection::loan::amortization_schedule;
use realty_projection::{AnnualCashflowRow, ScenarioRun, ScenarioRunner};

#[derive(Parser)]
#[command(
    name = "realty_projection",
    version,
    about = "Rental property cash-flow projection and IRR"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the deal under one or more scenarios
    Project(ProjectArgs),
    /// Print the acquisition loan's amortization schedule
    Schedule(ScheduleArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Deal record (JSON)
    #[arg(long, default_value = DEFAULT_DEAL_PATH)]
    deal: PathBuf,

    /// Scenario preset table (CSV, percent units)
    #[arg(long, default_value = DEFAULT_SCENARIOS_PATH)]
    scenarios: PathBuf,

    /// Scenario to run (repeatable); all scenarios when omitted
    #[arg(long = "scenario", short = 's')]
    names: Vec<String>,

    /// Override the deal's holding period
    #[arg(long)]
    holding_period: Option<u32>,

    /// Override the deal's refinance year
    #[arg(long)]
    refinance_year: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Also write annual detail rows to this CSV file
    #[arg(long)]
    rows_csv: Option<PathBuf>,
}

#[derive(Args)]
struct ScheduleArgs {
    /// Deal record (JSON)
    #[arg(long, default_value = DEFAULT_DEAL_PATH)]
    deal: PathBuf,

    /// Print every month instead of year-end rows
    #[arg(long)]
    monthly: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    deal: &'a realty_projection::PropertyDeal,
    generated_at: DateTime<Utc>,
    runs: &'a [ScenarioRun],
}

/// Flat CSV record for one scenario-year
#[derive(Serialize)]
struct RowRecord<'a> {
    scenario: &'a str,
    year: u32,
    vacancy_rate: f64,
    gross_potential_rent: f64,
    effective_gross_income: f64,
    operating_expenses: f64,
    net_operating_income: f64,
    opening_loan_balance: f64,
    debt_service: f64,
    dscr: Option<f64>,
    operating_cash_flow: f64,
    refinance_cash_out: f64,
    net_sale_proceeds: f64,
    total_cash_flow: f64,
}

impl<'a> RowRecord<'a> {
    fn new(scenario: &'a str, row: &AnnualCashflowRow) -> Self {
        Self {
            scenario,
            year: row.year,
            vacancy_rate: row.vacancy_rate,
            gross_potential_rent: row.gross_potential_rent,
            effective_gross_income: row.effective_gross_income,
            operating_expenses: row.operating_expenses,
            net_operating_income: row.net_operating_income,
            opening_loan_balance: row.opening_loan_balance,
            debt_service: row.debt_service,
            dscr: row.dscr,
            operating_cash_flow: row.operating_cash_flow,
            refinance_cash_out: row.refinance_cash_out,
            net_sale_proceeds: row.net_sale_proceeds,
            total_cash_flow: row.total_cash_flow,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Project(args) => run_project(args),
        Commands::Schedule(args) => run_schedule(args),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run_project(args: ProjectArgs) -> Result<()> {
    let mut runner = ScenarioRunner::from_files(&args.deal, &args.scenarios)
        .context("failed to load configuration")?;

    if let Some(years) = args.holding_period {
        runner.deal_mut().holding_period = years;
    }
    if let Some(year) = args.refinance_year {
        runner.deal_mut().refinance_year = year;
    }

    let runs = if args.names.is_empty() {
        runner.run_all()
    } else {
        runner.run_named(&args.names)?
    };

    match args.output {
        OutputFormat::Table => print_table(&runner, &runs),
        OutputFormat::Json => {
            let report = Report {
                deal: runner.deal(),
                generated_at: Utc::now(),
                runs: &runs,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(path) = &args.rows_csv {
        write_rows_csv(path, &runs)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if matches!(args.output, OutputFormat::Table) {
            println!("\nAnnual rows written to: {}", path.display());
        }
    }

    if runs.iter().any(|r| r.outcome.is_err()) {
        anyhow::bail!("one or more scenarios failed");
    }
    Ok(())
}

fn print_table(runner: &ScenarioRunner, runs: &[ScenarioRun]) {
    let deal = runner.deal();
    println!("{}", deal.name);
    println!("{}\n", "=".repeat(deal.name.len().max(20)));
    println!("  Purchase Price:   ${:.2}", deal.purchase_price);
    println!("  Equity Required:  ${:.2}", deal.equity_required());
    println!("  Loan:             {:.1}% LTV at {:.2}%, {} years", deal.loan_to_value * 100.0,
        deal.loan_interest_rate * 100.0, deal.loan_amortization_years);
    println!("  Hold / Refinance: {} years / year {}", deal.holding_period, deal.refinance_year);

    for run in runs {
        let s = &run.scenario;
        println!("\n{} Case", run.name());
        println!("  Cap Rate at Refinance: {:.2}%", s.cap_rate_refinance * 100.0);
        println!("  Cap Rate at Sale: {:.2}%", s.cap_rate_sale * 100.0);
        println!("  Year 1 Vacancy Rate: {:.2}%", s.year1_vacancy_rate * 100.0);
        println!("  Ongoing Annual Vacancy Rate: {:.2}%", s.ongoing_vacancy_rate * 100.0);
        println!("  Expense Growth Rate: {:.2}%", s.expense_growth_rate * 100.0);
        println!("  Rent Growth Rate: {:.2}%", s.rent_growth_rate * 100.0);

        let result = match &run.outcome {
            Ok(result) => result,
            Err(e) => {
                println!("  WARNING: {}", e);
                continue;
            }
        };

        println!("{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>16}",
            "Year", "GPR", "NOI", "DebtService", "RefiCashOut", "NetSale", "CashFlow");
        println!("{}", "-".repeat(98));
        println!("{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>16.2}",
            0, "", "", "", "", "", result.cash_flows.initial_outlay());
        for row in &result.rows {
            println!("{:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                row.year,
                row.gross_potential_rent,
                row.net_operating_income,
                row.debt_service,
                row.refinance_cash_out,
                row.net_sale_proceeds,
                row.total_cash_flow,
            );
        }

        let summary = result.summary();
        println!("  Equity Multiple: {:.2}x", summary.equity_multiple);
        println!("  Avg Cash-on-Cash: {:.2}%", summary.average_cash_on_cash * 100.0);
        if let Some(dscr) = summary.min_dscr {
            println!("  Min DSCR: {:.2}x", dscr);
        }
        println!("  IRR: {:.2}%", result.irr_pct);
    }
}

fn write_rows_csv(path: &Path, runs: &[ScenarioRun]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for run in runs {
        if let Ok(result) = &run.outcome {
            for row in &result.rows {
                writer.serialize(RowRecord::new(run.name(), row))?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let deal = load_deal(&args.deal)
        .with_context(|| format!("failed to load {}", args.deal.display()))?;
    let principal = deal.purchase_price * deal.loan_to_value;
    let schedule = amortization_schedule(
        principal,
        deal.loan_interest_rate,
        deal.loan_amortization_years,
    )?;

    println!("Acquisition loan: ${:.2} at {:.3}% over {} years",
        principal, deal.loan_interest_rate * 100.0, deal.loan_amortization_years);
    println!("{:>6} {:>12} {:>12} {:>12} {:>16}", "Month", "Payment", "Interest", "Principal", "Balance");
    println!("{}", "-".repeat(62));

    for row in schedule.iter().filter(|r| args.monthly || r.month % 12 == 0) {
        println!("{:>6} {:>12.2} {:>12.2} {:>12.2} {:>16.2}",
            row.month, row.payment, row.interest, row.principal, row.balance.max(0.0));
    }
    Ok(())
}
