//! Renders a [`Specification`] to SQL and runs it as a list, page, or count query

use super::schema::EntityTable;
use super::types::Database;
use crate::criteria::{Join, Predicate, Specification, SqlValue};
use crate::pagination::{Page, PageRequest};
use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite};

/// Characters with special meaning inside a LIKE pattern
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &SqlValue) {
    match value {
        SqlValue::Integer(v) => qb.push_bind(*v),
        SqlValue::Text(v) => qb.push_bind(v.clone()),
        SqlValue::Date(v) => qb.push_bind(*v),
    };
}

pub(crate) fn push_predicate(qb: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            qb.push("1 = 1");
        }
        Predicate::And(parts) => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                qb.push("(");
                push_predicate(qb, part);
                qb.push(")");
            }
        }
        Predicate::Compare { column, op, value } => {
            qb.push(format!("{} {} ", column.qualified(), op.as_sql()));
            push_value(qb, value);
        }
        Predicate::In {
            values, negated, ..
        } if values.is_empty() => {
            // Nothing is in an empty list
            qb.push(if *negated { "1 = 1" } else { "1 = 0" });
        }
        Predicate::In {
            column,
            values,
            negated,
        } => {
            let keyword = if *negated { "NOT IN" } else { "IN" };
            qb.push(format!("{} {} (", column.qualified(), keyword));
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(qb, value);
            }
            qb.push(")");
        }
        Predicate::IsNull { column, negated } => {
            let check = if *negated { "IS NOT NULL" } else { "IS NULL" };
            qb.push(format!("{} {}", column.qualified(), check));
        }
        Predicate::Contains {
            column,
            needle,
            negated,
        } => {
            let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
            qb.push(format!("{} {} ", column.qualified(), keyword));
            qb.push_bind(format!("%{}%", escape_like(needle)));
            qb.push(" ESCAPE '\\'");
        }
    }
}

fn push_joins<'a>(qb: &mut QueryBuilder<'_, Sqlite>, joins: impl Iterator<Item = &'a Join>) {
    let mut seen: Vec<&str> = Vec::new();
    for join in joins {
        if seen.contains(&join.alias) {
            continue;
        }
        seen.push(join.alias);
        qb.push(format!(
            " LEFT JOIN {} AS {} ON {} = {}",
            join.table,
            join.alias,
            join.key.qualified(),
            join.owner.qualified()
        ));
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, spec: &Specification) {
    if !spec.predicate.is_unconstrained() {
        qb.push(" WHERE ");
        push_predicate(qb, &spec.predicate);
    }
}

/// SELECT for the entity's columns, with both its eager joins and the joins the specification needs
pub(crate) fn select_query<'a>(
    entity: &EntityTable,
    spec: &Specification,
    page: Option<&PageRequest>,
) -> Result<QueryBuilder<'a, Sqlite>> {
    let mut qb = QueryBuilder::new("SELECT ");
    if spec.distinct {
        qb.push("DISTINCT ");
    }
    qb.push(entity.select.join(", "));
    qb.push(format!(" FROM {}", entity.table));
    push_joins(&mut qb, entity.eager_joins.iter().chain(spec.joins.iter()));
    push_where(&mut qb, spec);

    if let Some(page) = page {
        if !page.sort.is_empty() {
            let mut clauses = Vec::with_capacity(page.sort.len());
            for order in &page.sort {
                let column = entity.sort_column(&order.property).ok_or_else(|| {
                    anyhow!(
                        "Cannot sort {} by unknown property {}",
                        entity.table,
                        order.property
                    )
                })?;
                clauses.push(format!("{} {}", column.qualified(), order.direction.as_sql()));
            }
            qb.push(" ORDER BY ");
            qb.push(clauses.join(", "));
        }
        qb.push(" LIMIT ");
        qb.push_bind(page.size as i64);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());
    }

    Ok(qb)
}

/// COUNT over the specification's joins only; distinct counts distinct primary keys
pub(crate) fn count_query<'a>(entity: &EntityTable, spec: &Specification) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT ");
    if spec.distinct {
        qb.push(format!("COUNT(DISTINCT {})", entity.id.qualified()));
    } else {
        qb.push("COUNT(*)");
    }
    qb.push(format!(" FROM {}", entity.table));
    push_joins(&mut qb, spec.joins.iter());
    push_where(&mut qb, spec);
    qb
}

impl Database {
    /// All rows matching `spec`, in store order
    pub async fn find_by_specification<T>(
        &self,
        entity: &EntityTable,
        spec: &Specification,
    ) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut qb = select_query(entity, spec, None)?;
        let rows = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// One page of rows matching `spec`, plus the total match count
    pub async fn find_page_by_specification<T>(
        &self,
        entity: &EntityTable,
        spec: &Specification,
        page: &PageRequest,
    ) -> Result<Page<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut qb = select_query(entity, spec, Some(page))?;
        let content = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        let total_elements = self.count_by_specification(entity, spec).await?;

        Ok(Page {
            content,
            total_elements,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn count_by_specification(
        &self,
        entity: &EntityTable,
        spec: &Specification,
    ) -> Result<i64> {
        let mut qb = count_query(entity, spec);
        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }
}
