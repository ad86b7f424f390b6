//! SQL identifier utilities
//!
//! The ledger table name is configurable and ends up interpolated into DDL
//! and DML, so it is validated and quoted rather than trusted.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use mg_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("gomigrator_version"), r#""gomigrator_version""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// # Examples
/// ```
/// use mg_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("versions"), r#""versions""#);
/// assert_eq!(quote_qualified("ops.versions"), r#""ops"."versions""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Check that `name` is a plain table name, optionally schema-qualified.
///
/// Each part must start with an ASCII letter or `_` and contain only ASCII
/// letters, digits and `_`. At most one `.` is allowed.
pub fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}
