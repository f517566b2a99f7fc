//! Load employee records from CSV

use std::path::Path;

use csv::Reader;
use log::info;

use crate::error::EngineError;
use super::{Employee, ResidentStatus, TaxCategory, TaxProfileInput};

/// Raw CSV row matching the employee input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "EmployeeID")]
    employee_id: u32,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "MonthlySalary")]
    monthly_salary: f64,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Children")]
    children: u32,
    #[serde(rename = "ChildrenHigherEd")]
    children_higher_ed: u32,
    #[serde(rename = "DisabledSelf")]
    disabled_self: String,
    #[serde(rename = "DisabledSpouse")]
    disabled_spouse: String,
    #[serde(rename = "DisabledChildren")]
    disabled_children: u32,
    #[serde(rename = "Resident")]
    resident: String,
}

impl CsvRow {
    fn to_employee(self) -> Result<Employee, EngineError> {
        let category = match self.category.as_str() {
            "KA" => TaxCategory::KA,
            "KB" => TaxCategory::KB,
            "KC" => TaxCategory::KC,
            other => {
                return Err(EngineError::InvalidProfile(format!(
                    "employee {}: unknown Category: {}",
                    self.employee_id, other
                )))
            }
        };

        let resident_status = match self.resident.as_str() {
            "Y" => ResidentStatus::Resident,
            "N" => ResidentStatus::NonResident,
            other => {
                return Err(EngineError::InvalidProfile(format!(
                    "employee {}: unknown Resident flag: {}",
                    self.employee_id, other
                )))
            }
        };

        let disabled_self = parse_flag(&self.disabled_self, self.employee_id, "DisabledSelf")?;

        // Empty means "not stated"; resolve() decides whether that is
        // acceptable for the category.
        let disabled_spouse = match self.disabled_spouse.trim() {
            "" => None,
            raw => Some(parse_flag(raw, self.employee_id, "DisabledSpouse")?),
        };

        let profile = TaxProfileInput {
            category,
            number_of_children: self.children,
            children_in_higher_education: self.children_higher_ed,
            disabled_self,
            disabled_spouse,
            disabled_children: self.disabled_children,
            resident_status,
        }
        .resolve()
        .map_err(|e| match e {
            EngineError::InvalidProfile(msg) => EngineError::InvalidProfile(format!(
                "employee {}: {}",
                self.employee_id, msg
            )),
            other => other,
        })?;

        Ok(Employee {
            employee_id: self.employee_id,
            age: self.age,
            monthly_salary: self.monthly_salary,
            profile,
        })
    }
}

fn parse_flag(raw: &str, employee_id: u32, column: &str) -> Result<bool, EngineError> {
    match raw.trim() {
        "Y" => Ok(true),
        "N" => Ok(false),
        other => Err(EngineError::InvalidProfile(format!(
            "employee {}: {} must be Y or N, got {:?}",
            employee_id, column, other
        ))),
    }
}

/// Load all employees from a CSV file
pub fn load_employees<P: AsRef<Path>>(path: P) -> Result<Vec<Employee>, EngineError> {
    let mut reader = Reader::from_path(path)?;
    let mut employees = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        employees.push(row.to_employee()?);
    }

    info!("loaded {} employees", employees.len());
    Ok(employees)
}

/// Load employees from any reader (e.g. string buffer, network stream)
pub fn load_employees_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Employee>, EngineError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut employees = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        employees.push(row.to_employee()?);
    }

    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "EmployeeID,Age,MonthlySalary,Category,Children,ChildrenHigherEd,DisabledSelf,DisabledSpouse,DisabledChildren,Resident\n";

    #[test]
    fn test_load_employees() {
        let csv = format!(
            "{}1,34,3500.00,KA,0,0,N,,0,Y\n\
             2,41,5200.00,KB,2,1,N,N,0,Y\n\
             3,29,8000.00,KC,0,0,N,,0,N\n",
            HEADER
        );

        let employees = load_employees_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(employees.len(), 3);

        let e1 = &employees[0];
        assert_eq!(e1.employee_id, 1);
        assert_eq!(e1.age, 34);
        assert_eq!(e1.profile.category, TaxCategory::KA);

        let e2 = &employees[1];
        assert_eq!(e2.profile.number_of_children, 2);
        assert!(!e2.profile.disabled_spouse);

        let e3 = &employees[2];
        assert_eq!(e3.profile.resident_status, ResidentStatus::NonResident);
    }

    #[test]
    fn test_kb_with_blank_spouse_flag_rejected() {
        let csv = format!("{}7,50,4000.00,KB,0,0,N,,0,Y\n", HEADER);
        let result = load_employees_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(EngineError::InvalidProfile(_))));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let csv = format!("{}8,50,4000.00,KX,0,0,N,,0,Y\n", HEADER);
        let result = load_employees_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(EngineError::InvalidProfile(_))));
    }

    #[test]
    fn test_bad_flag_rejected() {
        let csv = format!("{}9,50,4000.00,KA,0,0,maybe,,0,Y\n", HEADER);
        let result = load_employees_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(EngineError::InvalidProfile(_))));
    }
}
