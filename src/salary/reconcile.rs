use crate::model::payroll::{
    Base, COMPONENT_PAIRS, ComponentPair, PairSide, PayrollField, PayrollSnapshot,
};

/// HRA share of basic salary used when seeding HRA with no percentage on file.
pub const DEFAULT_HRA_PERCENT: f64 = 50.0;

/// Round to the 2-decimal precision every stored amount and percent uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Apply one field edit to `snapshot` and derive the fields that depend on it.
///
/// `value` is the already-parsed input; `None` clears the field. Fields that do
/// not depend on `changed` pass through untouched. The only field filled without
/// the user touching it or its pair is HRA, and only while it is blank.
///
/// Residual fields (`fixedAllowance`, `fixedAllowancePercent`) are never inputs:
/// an edit to either is dropped and the residual is derived again.
pub fn reconcile(
    snapshot: &PayrollSnapshot,
    changed: PayrollField,
    value: Option<f64>,
) -> PayrollSnapshot {
    let mut next = *snapshot;

    if changed.is_computed() {
        recompute_fixed_allowance(&mut next);
        return next;
    }

    next.set(changed, value.map(|v| normalize_input(changed, v)));

    match changed {
        PayrollField::MonthlyWage => {
            next.yearly_wage = next.monthly_wage.map(|wage| round2(wage * 12.0));
            // Basic follows the wage while a percent is on file, blank wage included.
            if let Some(percent) = next.basic_salary_percent {
                next.basic_salary =
                    positive(next.monthly_wage).map(|wage| round2(percent / 100.0 * wage));
                seed_hra(&mut next);
            }
            recompute_fixed_allowance(&mut next);
        }
        // Yearly is the lower-priority input: it only moves the monthly figure.
        PayrollField::YearlyWage => {
            next.monthly_wage = next.yearly_wage.map(|yearly| round2(yearly / 12.0));
        }
        PayrollField::ProfessionalTax => {}
        field => {
            if let Some((pair, side)) = field.pair() {
                derive_sibling(&mut next, pair, side);
                if pair.amount == PayrollField::BasicSalary {
                    seed_hra(&mut next);
                }
                if pair.in_composition {
                    recompute_fixed_allowance(&mut next);
                }
            }
        }
    }

    next
}

/// `monthlyWage - (basic + hra + standardAllowance + performanceBonus + lta)`,
/// blanks counted as zero. Left unset without a positive monthly wage.
pub fn recompute_fixed_allowance(snapshot: &mut PayrollSnapshot) {
    let Some(wage) = positive(snapshot.monthly_wage) else {
        snapshot.fixed_allowance = None;
        snapshot.fixed_allowance_percent = None;
        return;
    };

    let components: f64 = COMPONENT_PAIRS
        .iter()
        .filter(|pair| pair.in_composition)
        .map(|pair| snapshot.get(pair.amount).unwrap_or(0.0))
        .sum();

    let fixed = round2(wage - components);
    snapshot.fixed_allowance = Some(fixed);
    snapshot.fixed_allowance_percent = Some(round2(fixed / wage * 100.0));
}

fn normalize_input(field: PayrollField, value: f64) -> f64 {
    if field.is_percent() {
        round2(value.clamp(0.0, 100.0))
    } else {
        round2(value)
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn base_value(snapshot: &PayrollSnapshot, base: Base) -> Option<f64> {
    positive(snapshot.get(base.field()))
}

/// Recompute the other side of `pair` from the side that was just set.
/// A blank edited side or a blank/non-positive base leaves the sibling as it was.
fn derive_sibling(snapshot: &mut PayrollSnapshot, pair: ComponentPair, edited: PairSide) {
    let Some(base) = base_value(snapshot, pair.base) else {
        return;
    };
    let derived = match edited {
        PairSide::Amount => snapshot
            .get(pair.amount)
            .map(|amount| round2(amount / base * 100.0)),
        PairSide::Percent => snapshot
            .get(pair.percent)
            .map(|percent| round2(percent / 100.0 * base)),
    };
    if let Some(derived) = derived {
        snapshot.set(pair.sibling(edited), Some(derived));
    }
}

fn seed_hra(snapshot: &mut PayrollSnapshot) {
    if snapshot.hra.is_some() {
        return;
    }
    let Some(basic) = positive(snapshot.basic_salary) else {
        return;
    };

    let percent = *snapshot.hra_percent.get_or_insert(DEFAULT_HRA_PERCENT);
    snapshot.hra = Some(round2(percent / 100.0 * basic));
}
