//! SQL text builders for the catalog tools.
//!
//! Caller-supplied names only ever reach a statement as an escaped string
//! literal or, after catalog resolution, as a quoted identifier.

use super::ControlError;

fn reject_unsafe(value: &str) -> Result<(), ControlError> {
    if value.contains('\0') {
        return Err(ControlError::InvalidInput(format!(
            "value {value:?} contains a NUL character"
        )));
    }
    if value.contains('\\') {
        return Err(ControlError::InvalidInput(format!(
            "value {value:?} contains a backslash"
        )));
    }
    Ok(())
}

/// Renders `value` as a single-quoted SQL string literal.
///
/// # Errors
/// Returns `ControlError::InvalidInput` for values containing NUL or a
/// backslash, whose meaning differs between Redshift and Postgres.
pub fn quote_literal(value: &str) -> Result<String, ControlError> {
    reject_unsafe(value)?;
    Ok(format!("'{}'", value.replace('\'', "''")))
}

/// Renders `name` as a double-quoted SQL identifier.
///
/// # Errors
/// Returns `ControlError::InvalidInput` for names containing NUL or a backslash.
pub fn quote_ident(name: &str) -> Result<String, ControlError> {
    reject_unsafe(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// # Errors
/// Returns `ControlError::InvalidInput` if the schema cannot be quoted.
pub fn list_tables_sql(schema: &str) -> Result<String, ControlError> {
    Ok(format!(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = {} AND table_type = 'BASE TABLE'",
        quote_literal(schema)?
    ))
}

/// # Errors
/// Returns `ControlError::InvalidInput` if a name cannot be quoted.
pub fn describe_table_sql(schema: &str, table: &str) -> Result<String, ControlError> {
    Ok(format!(
        "SELECT column_name, data_type, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = {} AND table_name = {} \
         ORDER BY ordinal_position",
        quote_literal(schema)?,
        quote_literal(table)?
    ))
}

/// Finds the stored spelling of a relation: the exact name or its lower-case fold.
///
/// # Errors
/// Returns `ControlError::InvalidInput` if a name cannot be quoted.
pub fn resolve_relation_sql(schema: &str, table: &str) -> Result<String, ControlError> {
    Ok(format!(
        "SELECT table_schema, table_name FROM information_schema.tables \
         WHERE table_schema IN ({schema_exact}, {schema_folded}) \
         AND table_name IN ({table_exact}, {table_folded}) \
         ORDER BY table_schema, table_name",
        schema_exact = quote_literal(schema)?,
        schema_folded = quote_literal(&schema.to_lowercase())?,
        table_exact = quote_literal(table)?,
        table_folded = quote_literal(&table.to_lowercase())?,
    ))
}

/// # Errors
/// Returns `ControlError::InvalidInput` if a name cannot be quoted.
pub fn sample_data_sql(schema: &str, table: &str, limit: u32) -> Result<String, ControlError> {
    Ok(format!(
        "SELECT * FROM {}.{} LIMIT {limit}",
        quote_ident(schema)?,
        quote_ident(table)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_double_single_quotes() {
        assert_eq!(quote_literal("public").unwrap(), "'public'");
        assert_eq!(quote_literal("x' OR '1'='1").unwrap(), "'x'' OR ''1''=''1'");
        assert_eq!(quote_literal("Monitor 27\"").unwrap(), "'Monitor 27\"'");
    }

    #[test]
    fn identifiers_double_double_quotes() {
        assert_eq!(quote_ident("users").unwrap(), "\"users\"");
        assert_eq!(quote_ident("we\"ird").unwrap(), "\"we\"\"ird\"");
    }

    #[test]
    fn nul_and_backslash_are_rejected() {
        assert!(quote_literal("a\0b").is_err());
        assert!(quote_ident("a\\b").is_err());
    }

    #[test]
    fn builders_embed_escaped_values() {
        let sql = describe_table_sql("public", "o'brien").unwrap();
        assert!(sql.contains("table_name = 'o''brien'"));
        assert!(sql.ends_with("ORDER BY ordinal_position"));

        let sql = sample_data_sql("public", "products", 3).unwrap();
        assert_eq!(sql, "SELECT * FROM \"public\".\"products\" LIMIT 3");

        let sql = resolve_relation_sql("Public", "Users").unwrap();
        assert!(sql.contains("IN ('Public', 'public')"));
        assert!(sql.contains("IN ('Users', 'users')"));
        assert!(sql.ends_with("ORDER BY table_schema, table_name"));
    }
}
