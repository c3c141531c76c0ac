//! Parse lint for the canonical schema text

use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// Parse schema text with the SQLite dialect and count its table definitions
pub fn lint_schema(content: &str) -> Result<usize, String> {
    let dialect = SQLiteDialect {};

    let statements =
        Parser::parse_sql(&dialect, content).map_err(|e| format!("SQL lint failed: {}", e))?;

    Ok(statements
        .iter()
        .filter(|s| matches!(s, Statement::CreateTable(_)))
        .count())
}
