//! Statutory Engine CLI
//!
//! Command-line demo computing a full-year statutory deduction schedule
//! for a single employee

use statutory_engine::{Employee, PayrollRunner, TaxProfile};
use statutory_engine::employee::{ResidentStatus, TaxCategory, TaxProfileInput};
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Statutory Engine v0.1.0");
    println!("=======================\n");

    // Demo employee: KB, spouse not disabled, two children (one in higher
    // education), RM5,200/month
    let profile: TaxProfile = TaxProfileInput {
        category: TaxCategory::KB,
        number_of_children: 2,
        children_in_higher_education: 1,
        disabled_self: false,
        disabled_spouse: Some(false),
        disabled_children: 0,
        resident_status: ResidentStatus::Resident,
    }
    .resolve()
    .expect("demo profile is structurally valid");

    let employee = Employee {
        employee_id: 1001,
        age: 41,
        monthly_salary: 5_200.0,
        profile,
    };

    println!("Employee: {}", employee.employee_id);
    println!("  Age: {}", employee.age);
    println!("  Category: {:?}", employee.profile.category);
    println!("  Children: {} ({} in higher education)",
        employee.profile.number_of_children,
        employee.profile.children_in_higher_education);
    println!("  Monthly salary: RM{:.2}", employee.monthly_salary);
    println!();

    let runner = PayrollRunner::new();
    let schedule = runner.run_year(&employee).expect("schedule computes");

    println!("Monthly statutory deductions:");
    println!("{:>5} {:>10} {:>10} {:>8} {:>8} {:>10} {:>12} {:>12}",
        "Month", "EPF(ee)", "EPF(er)", "SOCSO", "EIS", "PCB", "TotalEE", "TotalER");
    println!("{}", "-".repeat(82));

    for row in &schedule {
        let r = &row.result;
        println!("{:>5} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>10.2} {:>12.2} {:>12.2}",
            row.month,
            r.epf.employee,
            r.epf.employer,
            r.socso.employee,
            r.eis.employee,
            r.pcb,
            r.total_employee_deduction,
            r.total_employer_contribution,
        );
    }

    // Write the schedule to CSV
    let csv_path = "statutory_schedule.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");

    writeln!(file, "Month,EPF_Employee,EPF_Employer,SOCSO_Employee,SOCSO_Employer,EIS_Employee,EIS_Employer,PCB,Total_Employee,Total_Employer,Gross_YTD,EPF_YTD,PCB_YTD").unwrap();
    for row in &schedule {
        let r = &row.result;
        writeln!(file, "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.month,
            r.epf.employee,
            r.epf.employer,
            r.socso.employee,
            r.socso.employer,
            r.eis.employee,
            r.eis.employer,
            r.pcb,
            r.total_employee_deduction,
            r.total_employer_contribution,
            row.ytd_after.gross_ytd,
            row.ytd_after.epf_ytd,
            row.ytd_after.pcb_deducted_ytd,
        ).unwrap();
    }

    println!("\nFull schedule written to: {}", csv_path);

    // Annual summary
    let total_pcb: f64 = schedule.iter().map(|r| r.result.pcb).sum();
    let total_epf_ee: f64 = schedule.iter().map(|r| r.result.epf.employee).sum();
    let total_epf_er: f64 = schedule.iter().map(|r| r.result.epf.employer).sum();
    let total_employee: f64 = schedule.iter().map(|r| r.result.total_employee_deduction).sum();

    println!("\nAnnual Summary:");
    println!("  Gross pay: RM{:.2}", employee.monthly_salary * 12.0);
    println!("  EPF employee: RM{:.2}", total_epf_ee);
    println!("  EPF employer: RM{:.2}", total_epf_er);
    println!("  PCB withheld: RM{:.2}", total_pcb);
    println!("  Total employee deductions: RM{:.2}", total_employee);
    println!("  Net pay: RM{:.2}", employee.monthly_salary * 12.0 - total_employee);
}
