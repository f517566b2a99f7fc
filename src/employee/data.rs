//! Employee tax profile data structures
//!
//! The profile is immutable for the duration of a calculation call. Profile
//! construction goes through `TaxProfileInput::resolve`, which is where the
//! structural rules live: a KB profile must carry an explicit spouse
//! disability flag, and child counts must add up.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tax category determining which reliefs apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxCategory {
    /// Single, or spouse-relief-ineligible
    KA,
    /// Married, spouse not earning: spouse reliefs apply
    KB,
    /// Married, spouse earning: treated as KA for relief purposes
    KC,
}

impl TaxCategory {
    /// Whether spouse reliefs (and the doubled rebate) apply.
    ///
    /// KC carries no spouse relief despite its married label; the asymmetry
    /// is the documented rule, not an oversight.
    pub fn spouse_reliefs_apply(&self) -> bool {
        matches!(self, TaxCategory::KB)
    }
}

/// Residency status for tax purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidentStatus {
    Resident,
    NonResident,
}

/// An employee's tax profile, validated and ready for calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxProfile {
    pub category: TaxCategory,

    /// Total number of qualifying children
    pub number_of_children: u32,

    /// Of those, children in higher education (higher relief replaces the
    /// normal child relief for that child)
    pub children_in_higher_education: u32,

    pub disabled_self: bool,

    /// Only meaningful for KB; resolved to false for other categories
    pub disabled_spouse: bool,

    /// Number of disabled children; this relief stacks on top of the
    /// normal / higher-education relief for the same child
    pub disabled_children: u32,

    pub resident_status: ResidentStatus,
}

impl TaxProfile {
    /// Single resident with no dependants
    pub fn single_resident() -> Self {
        Self {
            category: TaxCategory::KA,
            number_of_children: 0,
            children_in_higher_education: 0,
            disabled_self: false,
            disabled_spouse: false,
            disabled_children: 0,
            resident_status: ResidentStatus::Resident,
        }
    }
}

/// Unresolved profile as supplied by a caller or parsed from reference data
///
/// `disabled_spouse` is optional here: for KB the caller must state it
/// (defaulting it silently would alter the spouse relief); for any other
/// category an unset flag resolves to false.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxProfileInput {
    pub category: TaxCategory,
    pub number_of_children: u32,
    pub children_in_higher_education: u32,
    pub disabled_self: bool,
    pub disabled_spouse: Option<bool>,
    pub disabled_children: u32,
    pub resident_status: ResidentStatus,
}

impl TaxProfileInput {
    /// Validate structure and produce a calculation-ready profile.
    pub fn resolve(self) -> Result<TaxProfile, EngineError> {
        if self.category == TaxCategory::KB && self.disabled_spouse.is_none() {
            return Err(EngineError::InvalidProfile(
                "category KB requires an explicit disabled-spouse flag".to_string(),
            ));
        }
        if self.children_in_higher_education > self.number_of_children {
            return Err(EngineError::InvalidProfile(format!(
                "{} children in higher education exceeds {} children",
                self.children_in_higher_education, self.number_of_children
            )));
        }
        if self.disabled_children > self.number_of_children {
            return Err(EngineError::InvalidProfile(format!(
                "{} disabled children exceeds {} children",
                self.disabled_children, self.number_of_children
            )));
        }

        Ok(TaxProfile {
            category: self.category,
            number_of_children: self.number_of_children,
            children_in_higher_education: self.children_in_higher_education,
            disabled_self: self.disabled_self,
            disabled_spouse: self.disabled_spouse.unwrap_or(false),
            disabled_children: self.disabled_children,
            resident_status: self.resident_status,
        })
    }
}

/// An employee record as supplied by the payroll collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier
    pub employee_id: u32,

    /// Attained age, used for contribution applicability gating
    pub age: u8,

    /// Base monthly gross salary
    pub monthly_salary: f64,

    pub profile: TaxProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(category: TaxCategory) -> TaxProfileInput {
        TaxProfileInput {
            category,
            number_of_children: 0,
            children_in_higher_education: 0,
            disabled_self: false,
            disabled_spouse: None,
            disabled_children: 0,
            resident_status: ResidentStatus::Resident,
        }
    }

    #[test]
    fn test_kb_requires_spouse_flag() {
        let result = input(TaxCategory::KB).resolve();
        assert!(matches!(result, Err(EngineError::InvalidProfile(_))));

        let mut ok = input(TaxCategory::KB);
        ok.disabled_spouse = Some(false);
        assert!(ok.resolve().is_ok());
    }

    #[test]
    fn test_ka_defaults_spouse_flag() {
        let profile = input(TaxCategory::KA).resolve().unwrap();
        assert!(!profile.disabled_spouse);
    }

    #[test]
    fn test_child_counts_must_add_up() {
        let mut bad = input(TaxCategory::KA);
        bad.number_of_children = 1;
        bad.children_in_higher_education = 2;
        assert!(matches!(bad.resolve(), Err(EngineError::InvalidProfile(_))));

        let mut bad = input(TaxCategory::KA);
        bad.number_of_children = 1;
        bad.disabled_children = 2;
        assert!(matches!(bad.resolve(), Err(EngineError::InvalidProfile(_))));
    }

    #[test]
    fn test_kc_has_no_spouse_reliefs() {
        assert!(!TaxCategory::KC.spouse_reliefs_apply());
        assert!(TaxCategory::KB.spouse_reliefs_apply());
        assert!(!TaxCategory::KA.spouse_reliefs_apply());
    }
}
