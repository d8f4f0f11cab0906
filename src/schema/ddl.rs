//! DDL parsing for offline schema snapshots.
//!
//! Parses CREATE TABLE and ALTER TABLE statements to extract:
//! - Column definitions with raw types, nullability, uniqueness and defaults
//! - Primary key constraints (inline and table-level)
//! - Foreign key constraints (inline `REFERENCES`, table-level and ALTER TABLE)
//!
//! Every foreign key becomes a `many-to-one` relation, which is what live
//! introspection reports as well.

use super::{Column, DatabaseSchema, Dialect, Relation, RelationType, Table};
use once_cell::sync::Lazy;
use regex::Regex;

/// Table name from CREATE TABLE; handles `schema.table` and all quoting styles
static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)CREATE\s+(?:TEMP(?:ORARY)?\s+|UNLOGGED\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(.]+)[\]`"]?"#)
        .unwrap()
});

static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)ALTER\s+TABLE\s+(?:IF\s+EXISTS\s+)?(?:ONLY\s+)?(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s.]+)[\]`"]?"#)
        .unwrap()
});

/// Column name followed by its type, keeping a `(...)` length suffix and
/// multi-word types such as `character varying(100)` or `int unsigned`
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*[\[`"]?([^\[\]`"\s,]+)[\]`"]?\s+((?:double\s+precision|character\s+varying|timestamp\s+with(?:out)?\s+time\s+zone|\w+)(?:\s*\([^)]*\))?(?:\s+unsigned)?(?:\[\])?)"#)
        .unwrap()
});

static PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)").unwrap());

static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

static UNIQUE_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:CONSTRAINT\s+\S+\s+)?UNIQUE\s*(?:(?:KEY|INDEX)\s+[\[`"]?\w*[\]`"]?\s*)?\(([^)]+)\)"#)
        .unwrap()
});

static INLINE_UNIQUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bUNIQUE\b").unwrap());

static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(.]+)[\]`"]?\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Column-level `REFERENCES other(col)`
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bREFERENCES\s+(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(.]+)[\]`"]?\s*(?:\(([^)]+)\))?"#)
        .unwrap()
});

/// MySQL `KEY`/`INDEX` definition; group 1 is the first parenthesized list
static INDEX_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:KEY|INDEX)\s*(?:[\[`"]?[^\s(\[\]`"]+[\]`"]?\s*)?(?:USING\s+\w+\s*)?\(([^)]*)\)"#)
        .unwrap()
});

static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

static DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bDEFAULT\s+('(?:[^']|'')*'(?:::\w+)?|\w+\s*\([^)]*\)|[^\s,]+)").unwrap()
});

/// Builder for constructing a schema from DDL statements
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<Table>,
    relations: Vec<Relation>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed every statement of a SQL script, ignoring non-DDL statements
    pub fn parse_script(&mut self, sql: &str) {
        for stmt in split_statements(sql) {
            let head = stmt.trim_start().to_uppercase();
            if head.starts_with("CREATE") && CREATE_TABLE_NAME_RE.is_match(&stmt) {
                self.parse_create_table(&stmt);
            } else if head.starts_with("ALTER TABLE") {
                self.parse_alter_table(&stmt);
            }
        }
    }

    /// Parse a CREATE TABLE statement and add it to the schema.
    ///
    /// A table that is already known keeps its first definition.
    pub fn parse_create_table(&mut self, stmt: &str) -> Option<usize> {
        let table_name = extract_create_table_name(stmt)?;

        if let Some(idx) = self.table_index(&table_name) {
            return Some(idx);
        }

        let body = extract_table_body(stmt)?;
        let mut table = Table::new(table_name, Vec::new());
        let relations = parse_table_body(&body, &mut table);

        self.tables.push(table);
        self.relations.extend(relations);
        Some(self.tables.len() - 1)
    }

    /// Parse an ALTER TABLE statement, recording any foreign keys it adds
    pub fn parse_alter_table(&mut self, stmt: &str) -> Option<usize> {
        let table_name = extract_alter_table_name(stmt)?;
        let idx = self.table_index(&table_name)?;

        for (local_cols, ref_table, ref_cols) in parse_foreign_keys(stmt) {
            let table = &mut self.tables[idx];
            self.relations
                .extend(foreign_key_relations(table, &local_cols, &ref_table, &ref_cols));
        }

        Some(idx)
    }

    /// Finalize into a schema description
    pub fn build(self, name: Option<String>, dialect: Option<Dialect>) -> DatabaseSchema {
        DatabaseSchema {
            name,
            dialect,
            tables: self.tables,
            relations: self.relations,
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn table_index(&self, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
    }
}

pub fn extract_create_table_name(stmt: &str) -> Option<String> {
    CREATE_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_alter_table_name(stmt: &str) -> Option<String> {
    ALTER_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split a SQL script into statements on `;`, skipping quoted text and comments
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == '\\' && q == '\'' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                current.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                current.push(' ');
            }
            ';' => {
                if !current.trim().is_empty() {
                    statements.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}

/// Extract the body of a CREATE TABLE statement (between first `(` and its match)
fn extract_table_body(stmt: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;

    for (i, ch) in stmt.char_indices() {
        if ch == '\'' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }

        if ch == '(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if ch == ')' && depth > 0 {
            depth -= 1;
            if depth == 0 {
                return start.map(|s| stmt[s..i].to_string());
            }
        }
    }

    None
}

/// Parse columns and constraints into `table`, returning the relations found
fn parse_table_body(body: &str, table: &mut Table) -> Vec<Relation> {
    let mut relations = Vec::new();

    for part in split_table_body(body) {
        if is_constraint_part(&part) {
            if let Some(caps) = PRIMARY_KEY_RE.captures(&part) {
                for name in parse_column_list(&caps[1]) {
                    if let Some(col) = find_column_mut(table, &name) {
                        col.pk = true;
                        col.nullable = false;
                    }
                }
            }

            if let Some(caps) = UNIQUE_CONSTRAINT_RE.captures(&part) {
                let cols = parse_column_list(&caps[1]);
                // Only a single-column constraint makes that column unique
                if let [name] = cols.as_slice() {
                    if let Some(col) = find_column_mut(table, name) {
                        col.unique = true;
                    }
                }
            }

            for (local_cols, ref_table, ref_cols) in parse_foreign_keys(&part) {
                relations.extend(foreign_key_relations(table, &local_cols, &ref_table, &ref_cols));
            }
        } else if let Some(mut col) = parse_column_def(&part) {
            if let Some(caps) = INLINE_REFERENCES_RE.captures(&mask_string_literals(&part)) {
                let ref_table = caps[1].to_string();
                let ref_col = caps
                    .get(2)
                    .and_then(|m| parse_column_list(m.as_str()).into_iter().next())
                    .unwrap_or_else(|| "id".to_string());
                col.fk = true;
                relations.push(Relation::new(
                    table.name.clone(),
                    col.name.clone(),
                    ref_table,
                    ref_col,
                    RelationType::ManyToOne,
                ));
            }
            table.columns.push(col);
        }
    }

    relations
}

/// Table-level constraint or index, as opposed to a column definition.
///
/// `key` and `index` are legal column names, so those two prefixes only
/// count when they introduce an index over a column list.
fn is_constraint_part(part: &str) -> bool {
    let upper = part.to_uppercase();
    if ["KEY ", "KEY(", "INDEX ", "INDEX("]
        .iter()
        .any(|prefix| upper.starts_with(prefix))
    {
        return is_index_definition(part);
    }

    ["PRIMARY KEY", "CONSTRAINT", "FOREIGN KEY", "UNIQUE ", "UNIQUE(", "FULLTEXT ", "SPATIAL ", "CHECK ", "CHECK("]
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

/// `KEY idx (a, b)` lists columns; `key varchar(64)` only has a numeric length
fn is_index_definition(part: &str) -> bool {
    INDEX_DEF_RE.captures(part).is_some_and(|caps| {
        !caps[1]
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c.is_whitespace())
    })
}

/// Mark the local FK columns and pair them with the referenced columns
fn foreign_key_relations(
    table: &mut Table,
    local_cols: &[String],
    ref_table: &str,
    ref_cols: &[String],
) -> Vec<Relation> {
    let mut relations = Vec::with_capacity(local_cols.len());

    for (i, local) in local_cols.iter().enumerate() {
        let ref_col = ref_cols
            .get(i)
            .cloned()
            .unwrap_or_else(|| "id".to_string());

        let column_name = match find_column_mut(table, local) {
            Some(col) => {
                col.fk = true;
                col.name.clone()
            }
            None => local.clone(),
        };

        relations.push(Relation::new(
            table.name.clone(),
            column_name,
            ref_table.to_string(),
            ref_col,
            RelationType::ManyToOne,
        ));
    }

    relations
}

fn find_column_mut<'a>(table: &'a mut Table, name: &str) -> Option<&'a mut Column> {
    table
        .columns
        .iter_mut()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Split table body by commas, respecting nested parentheses and strings
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string = false;

    for ch in body.chars() {
        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                if !current.trim().is_empty() {
                    parts.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

fn parse_column_def(def: &str) -> Option<Column> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = caps.get(1)?.as_str().to_string();
    let col_type = normalize_whitespace(caps.get(2)?.as_str()).to_lowercase();

    // keywords inside string literals (defaults, comments) are not constraints
    let flags = mask_string_literals(def);
    let pk = INLINE_PRIMARY_KEY_RE.is_match(&flags);
    let nullable = !pk && !NOT_NULL_RE.is_match(&flags);
    let unique = !pk && INLINE_UNIQUE_RE.is_match(&flags);
    let default = DEFAULT_RE
        .captures(def)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Some(Column {
        name,
        col_type,
        pk,
        fk: false,
        unique,
        nullable,
        default,
    })
}

/// Parse every FOREIGN KEY clause as (local columns, referenced table, referenced columns)
fn parse_foreign_keys(stmt: &str) -> Vec<(Vec<String>, String, Vec<String>)> {
    FOREIGN_KEY_RE
        .captures_iter(stmt)
        .filter_map(|caps| {
            let local = parse_column_list(caps.get(1)?.as_str());
            let ref_table = caps.get(2)?.as_str().to_string();
            let ref_cols = parse_column_list(caps.get(3)?.as_str());
            (!local.is_empty() && !ref_table.is_empty()).then_some((local, ref_table, ref_cols))
        })
        .collect()
}

/// Parse a comma-separated column list, stripping quotes (backticks, double quotes, brackets)
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| {
            c.trim()
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches('[')
                .trim_matches(']')
                .to_string()
        })
        .filter(|c| !c.is_empty())
        .collect()
}

/// Blank out the contents of single-quoted literals, keeping the quotes and
/// byte offsets. A doubled `''` closes and reopens the literal, so the
/// escaped text stays masked.
fn mask_string_literals(s: &str) -> String {
    let mut masked = String::with_capacity(s.len());
    let mut in_string = false;

    for ch in s.chars() {
        if ch == '\'' {
            in_string = !in_string;
            masked.push(ch);
        } else if in_string {
            masked.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        } else {
            masked.push(ch);
        }
    }

    masked
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements_skips_comments_and_strings() {
        let sql = "-- header; comment\nCREATE TABLE a (id INT);\n/* x; y */ INSERT INTO a VALUES ('a;b');";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE a"));
        assert!(stmts[1].contains("'a;b'"));
    }

    #[test]
    fn test_column_def_keeps_length_suffix() {
        let col = parse_column_def("email VARCHAR(255) NOT NULL UNIQUE").unwrap();
        assert_eq!(col.name, "email");
        assert_eq!(col.col_type, "varchar(255)");
        assert!(!col.nullable);
        assert!(col.unique);
    }

    #[test]
    fn test_column_def_default_expression() {
        let col = parse_column_def("created_at timestamp DEFAULT now()").unwrap();
        assert_eq!(col.default.as_deref(), Some("now()"));
        assert!(col.nullable);

        let col = parse_column_def("role varchar(50) DEFAULT 'member' NOT NULL").unwrap();
        assert_eq!(col.default.as_deref(), Some("'member'"));
    }

    #[test]
    fn test_keywords_in_literals_are_not_flags() {
        let col = parse_column_def("kind varchar(20) DEFAULT 'unique primary key not null'").unwrap();
        assert!(!col.pk);
        assert!(!col.unique);
        assert!(col.nullable);
        assert_eq!(col.default.as_deref(), Some("'unique primary key not null'"));
    }

    #[test]
    fn test_mask_string_literals() {
        assert_eq!(mask_string_literals("a 'b c' d"), "a '   ' d");
        assert_eq!(mask_string_literals("x 'it''s' y"), "x '  '' ' y");
        assert_eq!(mask_string_literals("'é'").len(), "'é'".len());
    }

    #[test]
    fn test_index_definition_vs_column() {
        assert!(is_constraint_part("KEY `idx_user` (`user_id`)"));
        assert!(is_constraint_part("INDEX idx_name USING BTREE (name)"));
        assert!(is_constraint_part("KEY (a, b)"));
        assert!(is_constraint_part("KEY idx_prefix (name(10))"));
        assert!(!is_constraint_part("key varchar(64) NOT NULL"));
        assert!(!is_constraint_part("index int"));
        assert!(!is_constraint_part("key numeric(10, 2)"));
        assert!(is_constraint_part("UNIQUE (email)"));
    }

    #[test]
    fn test_multi_word_type() {
        let col = parse_column_def("name character varying(100)").unwrap();
        assert_eq!(col.col_type, "character varying(100)");
    }

    #[test]
    fn test_extract_table_names() {
        assert_eq!(
            extract_create_table_name("CREATE TABLE IF NOT EXISTS `shop`.`orders` (id int)"),
            Some("orders".to_string())
        );
        assert_eq!(
            extract_alter_table_name("ALTER TABLE ONLY public.orders ADD CONSTRAINT fk FOREIGN KEY (a) REFERENCES b(id)"),
            Some("orders".to_string())
        );
    }
}
