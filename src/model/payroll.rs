use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Payroll fields of an employee profile, named the way the salary form names them.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PayrollField {
    MonthlyWage,
    YearlyWage,
    BasicSalary,
    BasicSalaryPercent,
    Hra,
    HraPercent,
    StandardAllowance,
    StandardAllowancePercent,
    PerformanceBonus,
    PerformanceBonusPercent,
    Lta,
    LtaPercent,
    #[serde(rename = "employeePF")]
    #[strum(to_string = "employeePF")]
    EmployeePf,
    #[serde(rename = "employeePFPercent")]
    #[strum(to_string = "employeePFPercent")]
    EmployeePfPercent,
    #[serde(rename = "employerPF")]
    #[strum(to_string = "employerPF")]
    EmployerPf,
    #[serde(rename = "employerPFPercent")]
    #[strum(to_string = "employerPFPercent")]
    EmployerPfPercent,
    ProfessionalTax,
    FixedAllowance,
    FixedAllowancePercent,
}

/// The field a percentage is taken against.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Base {
    MonthlyWage,
    BasicSalary,
}

impl Base {
    pub fn field(self) -> PayrollField {
        match self {
            Base::MonthlyWage => PayrollField::MonthlyWage,
            Base::BasicSalary => PayrollField::BasicSalary,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PairSide {
    Amount,
    Percent,
}

/// An amount/percent pair tied together by `amount == percent / 100 * base`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ComponentPair {
    pub amount: PayrollField,
    pub percent: PayrollField,
    pub base: Base,
    /// Part of the wage composition the fixed allowance balances against.
    /// PF contributions are deductions and stay out of it.
    pub in_composition: bool,
}

impl ComponentPair {
    pub fn sibling(&self, side: PairSide) -> PayrollField {
        match side {
            PairSide::Amount => self.percent,
            PairSide::Percent => self.amount,
        }
    }
}

pub const COMPONENT_PAIRS: [ComponentPair; 7] = [
    ComponentPair {
        amount: PayrollField::BasicSalary,
        percent: PayrollField::BasicSalaryPercent,
        base: Base::MonthlyWage,
        in_composition: true,
    },
    ComponentPair {
        amount: PayrollField::Hra,
        percent: PayrollField::HraPercent,
        base: Base::BasicSalary,
        in_composition: true,
    },
    ComponentPair {
        amount: PayrollField::StandardAllowance,
        percent: PayrollField::StandardAllowancePercent,
        base: Base::MonthlyWage,
        in_composition: true,
    },
    ComponentPair {
        amount: PayrollField::PerformanceBonus,
        percent: PayrollField::PerformanceBonusPercent,
        base: Base::BasicSalary,
        in_composition: true,
    },
    ComponentPair {
        amount: PayrollField::Lta,
        percent: PayrollField::LtaPercent,
        base: Base::BasicSalary,
        in_composition: true,
    },
    ComponentPair {
        amount: PayrollField::EmployeePf,
        percent: PayrollField::EmployeePfPercent,
        base: Base::BasicSalary,
        in_composition: false,
    },
    ComponentPair {
        amount: PayrollField::EmployerPf,
        percent: PayrollField::EmployerPfPercent,
        base: Base::BasicSalary,
        in_composition: false,
    },
];

impl PayrollField {
    /// The pair this field belongs to and which side of it the field is.
    pub fn pair(self) -> Option<(ComponentPair, PairSide)> {
        COMPONENT_PAIRS.iter().find_map(|pair| {
            if pair.amount == self {
                Some((*pair, PairSide::Amount))
            } else if pair.percent == self {
                Some((*pair, PairSide::Percent))
            } else {
                None
            }
        })
    }

    pub fn is_percent(self) -> bool {
        matches!(self.pair(), Some((_, PairSide::Percent))) || self == PayrollField::FixedAllowancePercent
    }

    /// Residual fields are derived only and never accepted as edits.
    pub fn is_computed(self) -> bool {
        matches!(self, PayrollField::FixedAllowance | PayrollField::FixedAllowancePercent)
    }

    /// Column in `employee_profiles`.
    pub fn column(self) -> &'static str {
        match self {
            PayrollField::MonthlyWage => "monthly_wage",
            PayrollField::YearlyWage => "yearly_wage",
            PayrollField::BasicSalary => "basic_salary",
            PayrollField::BasicSalaryPercent => "basic_salary_percent",
            PayrollField::Hra => "hra",
            PayrollField::HraPercent => "hra_percent",
            PayrollField::StandardAllowance => "standard_allowance",
            PayrollField::StandardAllowancePercent => "standard_allowance_percent",
            PayrollField::PerformanceBonus => "performance_bonus",
            PayrollField::PerformanceBonusPercent => "performance_bonus_percent",
            PayrollField::Lta => "lta",
            PayrollField::LtaPercent => "lta_percent",
            PayrollField::EmployeePf => "employee_pf",
            PayrollField::EmployeePfPercent => "employee_pf_percent",
            PayrollField::EmployerPf => "employer_pf",
            PayrollField::EmployerPfPercent => "employer_pf_percent",
            PayrollField::ProfessionalTax => "professional_tax",
            PayrollField::FixedAllowance => "fixed_allowance",
            PayrollField::FixedAllowancePercent => "fixed_allowance_percent",
        }
    }
}

/// Payroll fields of one employee at one point in time. `None` is a blank field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[schema(example = json!({
    "monthlyWage": 50000.0,
    "yearlyWage": 600000.0,
    "basicSalary": 20000.0,
    "basicSalaryPercent": 40.0,
    "hra": 10000.0,
    "hraPercent": 50.0,
    "standardAllowance": 5000.0,
    "standardAllowancePercent": 10.0,
    "fixedAllowance": 15000.0,
    "fixedAllowancePercent": 30.0,
    "professionalTax": 200.0
}))]
pub struct PayrollSnapshot {
    pub monthly_wage: Option<f64>,
    pub yearly_wage: Option<f64>,
    pub basic_salary: Option<f64>,
    pub basic_salary_percent: Option<f64>,
    pub hra: Option<f64>,
    pub hra_percent: Option<f64>,
    pub standard_allowance: Option<f64>,
    pub standard_allowance_percent: Option<f64>,
    pub performance_bonus: Option<f64>,
    pub performance_bonus_percent: Option<f64>,
    pub lta: Option<f64>,
    pub lta_percent: Option<f64>,
    #[serde(rename = "employeePF")]
    pub employee_pf: Option<f64>,
    #[serde(rename = "employeePFPercent")]
    pub employee_pf_percent: Option<f64>,
    #[serde(rename = "employerPF")]
    pub employer_pf: Option<f64>,
    #[serde(rename = "employerPFPercent")]
    pub employer_pf_percent: Option<f64>,
    pub professional_tax: Option<f64>,
    pub fixed_allowance: Option<f64>,
    pub fixed_allowance_percent: Option<f64>,
}

impl PayrollSnapshot {
    pub fn get(&self, field: PayrollField) -> Option<f64> {
        match field {
            PayrollField::MonthlyWage => self.monthly_wage,
            PayrollField::YearlyWage => self.yearly_wage,
            PayrollField::BasicSalary => self.basic_salary,
            PayrollField::BasicSalaryPercent => self.basic_salary_percent,
            PayrollField::Hra => self.hra,
            PayrollField::HraPercent => self.hra_percent,
            PayrollField::StandardAllowance => self.standard_allowance,
            PayrollField::StandardAllowancePercent => self.standard_allowance_percent,
            PayrollField::PerformanceBonus => self.performance_bonus,
            PayrollField::PerformanceBonusPercent => self.performance_bonus_percent,
            PayrollField::Lta => self.lta,
            PayrollField::LtaPercent => self.lta_percent,
            PayrollField::EmployeePf => self.employee_pf,
            PayrollField::EmployeePfPercent => self.employee_pf_percent,
            PayrollField::EmployerPf => self.employer_pf,
            PayrollField::EmployerPfPercent => self.employer_pf_percent,
            PayrollField::ProfessionalTax => self.professional_tax,
            PayrollField::FixedAllowance => self.fixed_allowance,
            PayrollField::FixedAllowancePercent => self.fixed_allowance_percent,
        }
    }

    pub fn set(&mut self, field: PayrollField, value: Option<f64>) {
        let slot = match field {
            PayrollField::MonthlyWage => &mut self.monthly_wage,
            PayrollField::YearlyWage => &mut self.yearly_wage,
            PayrollField::BasicSalary => &mut self.basic_salary,
            PayrollField::BasicSalaryPercent => &mut self.basic_salary_percent,
            PayrollField::Hra => &mut self.hra,
            PayrollField::HraPercent => &mut self.hra_percent,
            PayrollField::StandardAllowance => &mut self.standard_allowance,
            PayrollField::StandardAllowancePercent => &mut self.standard_allowance_percent,
            PayrollField::PerformanceBonus => &mut self.performance_bonus,
            PayrollField::PerformanceBonusPercent => &mut self.performance_bonus_percent,
            PayrollField::Lta => &mut self.lta,
            PayrollField::LtaPercent => &mut self.lta_percent,
            PayrollField::EmployeePf => &mut self.employee_pf,
            PayrollField::EmployeePfPercent => &mut self.employee_pf_percent,
            PayrollField::EmployerPf => &mut self.employer_pf,
            PayrollField::EmployerPfPercent => &mut self.employer_pf_percent,
            PayrollField::ProfessionalTax => &mut self.professional_tax,
            PayrollField::FixedAllowance => &mut self.fixed_allowance,
            PayrollField::FixedAllowancePercent => &mut self.fixed_allowance_percent,
        };
        *slot = value;
    }

    /// Fields whose value differs between `self` and `other`, in declaration order.
    pub fn changed_fields(&self, other: &PayrollSnapshot) -> Vec<PayrollField> {
        PayrollField::iter()
            .filter(|field| self.get(*field) != other.get(*field))
            .collect()
    }
}
