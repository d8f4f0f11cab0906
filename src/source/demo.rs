//! Built-in demo schema: a small multi-tenant SaaS data model.

use crate::schema::{Column, DatabaseSchema, Dialect, Relation, RelationType, Table};

pub const DEFAULT_DEMO_NAME: &str = "demo_db";

fn uuid_pk() -> Column {
    Column::new("id", "uuid").primary_key()
}

fn uuid_fk(name: &str) -> Column {
    Column::new(name, "uuid").foreign_key()
}

fn created_at() -> Column {
    Column::new("created_at", "timestamp").with_default("now()")
}

fn updated_at() -> Column {
    Column::new("updated_at", "timestamp").with_default("now()")
}

/// Six tables and six many-to-one relations, tagged with the given name and dialect
pub fn demo_schema(name: Option<&str>, dialect: Option<Dialect>) -> DatabaseSchema {
    let tables = vec![
        Table::new(
            "users",
            vec![
                uuid_pk(),
                Column::new("email", "varchar(255)").unique(),
                Column::new("username", "varchar(100)").unique(),
                Column::new("password_hash", "varchar(255)"),
                Column::new("full_name", "varchar(200)").nullable(),
                Column::new("avatar_url", "text").nullable(),
                Column::new("is_active", "boolean").with_default("true"),
                created_at(),
                updated_at(),
            ],
        ),
        Table::new(
            "organizations",
            vec![
                uuid_pk(),
                Column::new("name", "varchar(200)"),
                Column::new("slug", "varchar(100)").unique(),
                Column::new("logo_url", "text").nullable(),
                created_at(),
            ],
        ),
        Table::new(
            "organization_members",
            vec![
                uuid_pk(),
                uuid_fk("organization_id"),
                uuid_fk("user_id"),
                Column::new("role", "varchar(50)").with_default("'member'"),
                Column::new("joined_at", "timestamp").with_default("now()"),
            ],
        ),
        Table::new(
            "projects",
            vec![
                uuid_pk(),
                uuid_fk("organization_id"),
                Column::new("name", "varchar(200)"),
                Column::new("description", "text").nullable(),
                Column::new("is_public", "boolean").with_default("false"),
                uuid_fk("created_by"),
                created_at(),
                updated_at(),
            ],
        ),
        Table::new(
            "schemas",
            vec![
                uuid_pk(),
                uuid_fk("project_id"),
                Column::new("name", "varchar(100)"),
                Column::new("version", "integer").with_default("1"),
                Column::new("schema_json", "jsonb"),
                created_at(),
            ],
        ),
        Table::new(
            "connections",
            vec![
                uuid_pk(),
                uuid_fk("project_id"),
                Column::new("name", "varchar(100)"),
                Column::new("dialect", "varchar(20)"),
                Column::new("host", "varchar(255)"),
                Column::new("port", "integer"),
                Column::new("database", "varchar(100)"),
                Column::new("username", "varchar(100)"),
                Column::new("ssl_enabled", "boolean").with_default("true"),
                created_at(),
            ],
        ),
    ];

    let relations = [
        ("organization_members", "organization_id", "organizations"),
        ("organization_members", "user_id", "users"),
        ("projects", "organization_id", "organizations"),
        ("projects", "created_by", "users"),
        ("schemas", "project_id", "projects"),
        ("connections", "project_id", "projects"),
    ]
    .into_iter()
    .map(|(from, column, to)| Relation::new(from, column, to, "id", RelationType::ManyToOne))
    .collect();

    DatabaseSchema {
        name: Some(name.unwrap_or(DEFAULT_DEMO_NAME).to_string()),
        dialect: Some(dialect.unwrap_or_default()),
        tables,
        relations,
    }
}
