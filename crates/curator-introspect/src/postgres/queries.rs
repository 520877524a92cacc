use sqlx::PgPool;

use curator_core::{Error, Result};

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

pub async fn list_schemas(pool: &PgPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("select nspname::text from pg_namespace order by nspname")
        .fetch_all(pool)
        .await
        .map_err(db_error)
}

pub struct RawTable {
    pub name: String,
    pub relkind: String,
    pub comment: Option<String>,
}

pub async fn list_tables_in_schema(pool: &PgPool, schema: &str) -> Result<Vec<RawTable>> {
    let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
        r#"
        select
          c.relname::text,
          c.relkind::text,
          pg_catalog.obj_description(c.oid, 'pg_class')
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relkind in ('r','p','v','m','f')
        order by c.relname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows
        .into_iter()
        .map(|(name, relkind, comment)| RawTable {
            name,
            relkind,
            comment,
        })
        .collect())
}

pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub comment: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query_as::<_, (String, String, bool, Option<String>)>(
        r#"
        select
          a.attname::text,
          pg_catalog.format_type(a.atttypid, a.atttypmod),
          exists (
            select 1
            from pg_constraint con
            where con.conrelid = c.oid
              and con.contype = 'p'
              and a.attnum = any(con.conkey)
          ),
          pg_catalog.col_description(a.attrelid, a.attnum)
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relname = $2
          and a.attnum > 0
          and not a.attisdropped
        order by a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows
        .into_iter()
        .map(|(name, data_type, is_primary_key, comment)| RawColumn {
            name,
            data_type,
            is_primary_key,
            comment,
        })
        .collect())
}

/// Distinct non-null values of one column, rendered as text.
pub async fn sample_distinct_values(
    pool: &PgPool,
    schema: &str,
    table: &str,
    column: &str,
    limit: i64,
) -> std::result::Result<Vec<String>, sqlx::Error> {
    let column = quote_ident(column);
    let sql = format!(
        "select distinct {column}::text from {}.{} where {column} is not null order by 1 limit $1",
        quote_ident(schema),
        quote_ident(table),
    );
    sqlx::query_scalar::<_, String>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub struct RawRelationship {
    pub schema_name: String,
    pub table: String,
    pub column: String,
}

/// Declared foreign keys touching one column, in either direction, whose
/// other end has the same type. An empty `column_type` disables the type check.
pub async fn list_relationships(
    pool: &PgPool,
    schema: &str,
    table: &str,
    column: &str,
    column_type: &str,
) -> std::result::Result<Vec<RawRelationship>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String, String)>(
        r#"
        with edges as (
          select
            sn.nspname::text as src_schema,
            sc.relname::text as src_table,
            sa.attname::text as src_column,
            pg_catalog.format_type(sa.atttypid, sa.atttypmod) as src_type,
            tn.nspname::text as dst_schema,
            tc.relname::text as dst_table,
            ta.attname::text as dst_column,
            pg_catalog.format_type(ta.atttypid, ta.atttypmod) as dst_type
          from pg_constraint con
          join pg_class sc on sc.oid = con.conrelid
          join pg_namespace sn on sn.oid = sc.relnamespace
          join pg_class tc on tc.oid = con.confrelid
          join pg_namespace tn on tn.oid = tc.relnamespace
          join unnest(con.conkey, con.confkey) as k(src, dst) on true
          join pg_attribute sa on sa.attrelid = con.conrelid and sa.attnum = k.src
          join pg_attribute ta on ta.attrelid = con.confrelid and ta.attnum = k.dst
          where con.contype = 'f'
        )
        select dst_schema, dst_table, dst_column
        from edges
        where src_schema = $1 and src_table = $2 and src_column = $3
          and ($4 = '' or dst_type = $4)
        union
        select src_schema, src_table, src_column
        from edges
        where dst_schema = $1 and dst_table = $2 and dst_column = $3
          and ($4 = '' or src_type = $4)
        order by 1, 2, 3
        "#,
    )
    .bind(schema)
    .bind(table)
    .bind(column)
    .bind(column_type)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(schema_name, table, column)| RawRelationship {
            schema_name,
            table,
            column,
        })
        .collect())
}

/// Quote an identifier for interpolation into SQL text.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
