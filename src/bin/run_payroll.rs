//! Run statutory deductions for an employee block
//!
//! Loads employees from CSV, computes all four statutory components for the
//! requested pay period in parallel, and writes per-employee results plus
//! aggregate totals. Supports JSON output for integration via --json.
//!
//! The batch starts each employee from a zero YTD snapshot (a January run);
//! mid-year recalculation with persisted YTD goes through the library API.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use statutory_engine::employee::load_employees;
use statutory_engine::engine::{PeriodInput, StatutoryResult, YtdSnapshot};
use statutory_engine::{PayrollRunner, StatutoryTables};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_payroll", about = "Batch statutory deduction run")]
struct Args {
    /// Employee CSV file
    #[arg(long, default_value = "employees.csv")]
    input: String,

    /// Output CSV file
    #[arg(long, default_value = "payroll_output.csv")]
    output: String,

    /// Pay period as YYYY-MM; selects the table versions in force
    #[arg(long)]
    period: String,

    /// Emit a JSON document to stdout instead of the summary
    #[arg(long)]
    json: bool,
}

/// Aggregated totals across the block
#[derive(Debug, Clone, Default, Serialize)]
struct BlockTotals {
    employees: usize,
    gross: f64,
    epf_employee: f64,
    epf_employer: f64,
    socso_employee: f64,
    socso_employer: f64,
    eis_employee: f64,
    eis_employer: f64,
    pcb: f64,
    total_employee_deduction: f64,
    total_employer_contribution: f64,
}

#[derive(Debug, Serialize)]
struct EmployeeRow {
    employee_id: u32,
    gross: f64,
    #[serde(flatten)]
    result: StatutoryResult,
}

#[derive(Debug, Serialize)]
struct PayrollResponse {
    period: String,
    totals: BlockTotals,
    rows: Vec<EmployeeRow>,
    execution_time_ms: u64,
}

fn parse_period(raw: &str) -> Result<(NaiveDate, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("period must be YYYY-MM, got {:?}", raw))?;
    let year: i32 = year.parse().with_context(|| format!("bad year in {:?}", raw))?;
    let month: u32 = month.parse().with_context(|| format!("bad month in {:?}", raw))?;
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("period out of range: {:?}", raw))?;
    Ok((date, month))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let (period_date, month) = parse_period(&args.period)?;

    let employees = load_employees(&args.input)
        .with_context(|| format!("loading employees from {}", args.input))?;
    if !args.json {
        println!("Loaded {} employees in {:?}", employees.len(), start.elapsed());
    }

    let tables = StatutoryTables::for_period(period_date)
        .with_context(|| format!("selecting tables for {}", period_date))?;
    let runner = PayrollRunner::with_tables(tables);

    let calc_start = Instant::now();
    let results: Vec<(u32, f64, Result<StatutoryResult, statutory_engine::EngineError>)> =
        employees
            .par_iter()
            .map(|employee| {
                let period = PeriodInput::monthly(employee.monthly_salary, month);
                let result = runner.run(employee, &period, &YtdSnapshot::default());
                (employee.employee_id, employee.monthly_salary, result)
            })
            .collect();

    // Any single failure aborts the run; a partially computed block would
    // misstate the statutory totals.
    let mut rows = Vec::with_capacity(results.len());
    for (employee_id, gross, result) in results {
        let result = result.with_context(|| format!("employee {}", employee_id))?;
        rows.push(EmployeeRow {
            employee_id,
            gross,
            result,
        });
    }

    if !args.json {
        println!("Computed {} employees in {:?}", rows.len(), calc_start.elapsed());
    }

    let mut totals = BlockTotals {
        employees: rows.len(),
        ..Default::default()
    };
    for row in &rows {
        let r = &row.result;
        totals.gross += row.gross;
        totals.epf_employee += r.epf.employee;
        totals.epf_employer += r.epf.employer;
        totals.socso_employee += r.socso.employee;
        totals.socso_employer += r.socso.employer;
        totals.eis_employee += r.eis.employee;
        totals.eis_employer += r.eis.employer;
        totals.pcb += r.pcb;
        totals.total_employee_deduction += r.total_employee_deduction;
        totals.total_employer_contribution += r.total_employer_contribution;
    }

    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output))?;
    writeln!(file, "EmployeeID,Gross,EPF_Employee,EPF_Employer,SOCSO_Employee,SOCSO_Employer,EIS_Employee,EIS_Employer,PCB,Total_Employee,Total_Employer")?;
    for row in &rows {
        let r = &row.result;
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.employee_id,
            row.gross,
            r.epf.employee,
            r.epf.employer,
            r.socso.employee,
            r.socso.employer,
            r.eis.employee,
            r.eis.employer,
            r.pcb,
            r.total_employee_deduction,
            r.total_employer_contribution,
        )?;
    }

    if args.json {
        let response = PayrollResponse {
            period: args.period.clone(),
            totals,
            rows,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Output written to {}", args.output);
        println!("\nBlock Summary ({}):", args.period);
        println!("  Employees:            {}", totals.employees);
        println!("  Gross:                RM{:.2}", totals.gross);
        println!("  EPF (ee/er):          RM{:.2} / RM{:.2}", totals.epf_employee, totals.epf_employer);
        println!("  SOCSO (ee/er):        RM{:.2} / RM{:.2}", totals.socso_employee, totals.socso_employer);
        println!("  EIS (ee/er):          RM{:.2} / RM{:.2}", totals.eis_employee, totals.eis_employer);
        println!("  PCB:                  RM{:.2}", totals.pcb);
        println!("  Employee deductions:  RM{:.2}", totals.total_employee_deduction);
        println!("  Employer cost:        RM{:.2}", totals.total_employer_contribution);
        println!("\nTotal time: {:?}", start.elapsed());
    }

    Ok(())
}
