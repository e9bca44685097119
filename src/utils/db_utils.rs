use chrono::NaiveDate;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Date(NaiveDate),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
///
/// Column names are interpolated, so they must come from a fixed whitelist,
/// never from request input. Returns `None` when there is nothing to set.
pub fn build_update_sql(
    table: &str,
    assignments: &[(&'static str, SqlValue)],
    id_column: &str,
    id_value: u64,
) -> Option<SqlUpdate> {
    if assignments.is_empty() {
        return None;
    }

    let set_clause = assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table, set_clause, id_column
    );

    let mut values = Vec::with_capacity(assignments.len() + 1);
    values.extend(assignments.iter().map(|(_, value)| value.clone()));

    // WHERE id = ?
    values.push(SqlValue::U64(id_value));

    Some(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_assignment_order() {
        let update = build_update_sql(
            "employee_profiles",
            &[
                ("monthly_wage", SqlValue::F64(50000.0)),
                ("hra", SqlValue::Null),
                ("gender", SqlValue::String("female".into())),
            ],
            "id",
            42,
        )
        .unwrap();

        assert_eq!(
            update.sql,
            "UPDATE employee_profiles SET monthly_wage = ?, hra = ?, gender = ? WHERE id = ?"
        );
        assert_eq!(
            update.values,
            vec![
                SqlValue::F64(50000.0),
                SqlValue::Null,
                SqlValue::String("female".into()),
                SqlValue::U64(42),
            ]
        );
    }

    #[test]
    fn nothing_to_set_builds_nothing() {
        assert_eq!(build_update_sql("employee_profiles", &[], "id", 1), None);
    }
}
