use querykit::query::{self, Mutation, Statement};
use querykit::{BoundValues, Db, DbConfig, DbError, DbResult, Executor, Row, Value};
use serde::Deserialize;
use std::future::{Future, ready};
use std::sync::Mutex;

/// Executor backed by canned results; records every call.
#[derive(Default)]
struct MemoryExecutor {
    rows: Vec<Row>,
    affected: u64,
    insert_id: u64,
    fail_with: Option<&'static str>,
    calls: Mutex<Vec<(String, BoundValues)>>,
}

impl MemoryExecutor {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn record(&self, sql: &str, values: &BoundValues) -> DbResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), values.clone()));
        match self.fail_with {
            Some(code) => Err(DbError::query(sql, code, "simulated failure")),
            None => Ok(()),
        }
    }

    fn last_call(&self) -> (String, BoundValues) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

impl Executor for MemoryExecutor {
    fn query(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl Future<Output = DbResult<Vec<Row>>> + Send {
        ready(self.record(sql, values).map(|()| self.rows.clone()))
    }

    fn execute(&self, sql: &str, values: &BoundValues) -> impl Future<Output = DbResult<u64>> + Send {
        ready(self.record(sql, values).map(|()| self.affected))
    }

    fn insert(&self, sql: &str, values: &BoundValues) -> impl Future<Output = DbResult<u64>> + Send {
        ready(self.record(sql, values).map(|()| self.insert_id))
    }
}

fn page_row(id: i64, title: &str) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), Value::from(id));
    row.insert("title".to_string(), Value::from(title));
    row
}

fn pages() -> MemoryExecutor {
    MemoryExecutor::with_rows(vec![page_row(1, "Home"), page_row(2, "About")])
}

#[derive(Debug, Deserialize, PartialEq)]
struct Page {
    id: i64,
    title: String,
}

#[tokio::test]
async fn fetch_all_passes_placeholders_and_values() {
    let conn = pages();
    let rows = query::select("pages")
        .where_active()
        .fetch_all(&conn)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let (sql, values) = conn.last_call();
    assert_eq!(sql, "SELECT * FROM `pages` WHERE `is_active`=:where_is_active");
    assert_eq!(values[":where_is_active"], Value::from(1));
}

#[tokio::test]
async fn fetch_all_as_maps_rows() {
    let conn = pages();
    let pages: Vec<Page> = query::select("pages").fetch_all_as(&conn).await.unwrap();
    assert_eq!(
        pages,
        vec![
            Page {
                id: 1,
                title: "Home".to_string()
            },
            Page {
                id: 2,
                title: "About".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn fetch_one_limits_to_one_row() {
    let conn = pages();
    let mut q = query::select("pages").where_id(1);
    let row = q.fetch_one(&conn).await.unwrap().unwrap();
    assert_eq!(row["title"], Value::from("Home"));
    assert_eq!(
        q.last_sql(),
        Some("SELECT * FROM `pages` WHERE `id`=:where_id LIMIT 1")
    );

    let page: Option<Page> = query::select("pages").fetch_one_as(&conn).await.unwrap();
    assert_eq!(page.map(|p| p.id), Some(1));
}

#[tokio::test]
async fn fetch_one_on_empty_result_is_none() {
    let conn = MemoryExecutor::default();
    let row = query::select("pages").fetch_one(&conn).await.unwrap();
    assert!(row.is_none());
    let value = query::select("pages")
        .fetch_value(&conn, "title")
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn fetch_value_and_column() {
    let conn = pages();
    let title = query::select("pages")
        .fetch_value(&conn, "title")
        .await
        .unwrap();
    assert_eq!(title, Some(Value::from("Home")));

    let ids = query::select("pages")
        .columns("id")
        .fetch_column(&conn, "id")
        .await
        .unwrap();
    assert_eq!(ids, vec![Value::from(1), Value::from(2)]);

    let err = query::select("pages")
        .fetch_column(&conn, "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::MissingColumn(c) if c == "missing"));
}

#[tokio::test]
async fn fetch_pairs_keeps_row_order() {
    let conn = pages();
    let pairs = query::select("pages")
        .fetch_pairs(&conn, "id", "title")
        .await
        .unwrap();
    let collected: Vec<_> = pairs.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    assert_eq!(
        collected,
        vec![("1", Value::from("Home")), ("2", Value::from("About"))]
    );

    let err = query::select("pages")
        .fetch_pairs(&conn, "slug", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::MissingKey(k) if k == "slug"));

    let err = query::select("pages")
        .fetch_pairs(&conn, "id", "body")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::MissingColumn(c) if c == "body"));
}

#[tokio::test]
async fn fetch_pairs_on_empty_result_is_empty() {
    let conn = MemoryExecutor::default();
    let pairs = query::select("pages")
        .fetch_pairs(&conn, "id", "title")
        .await
        .unwrap();
    assert!(pairs.is_empty());
}

#[tokio::test]
async fn insert_returns_generated_key() {
    let conn = MemoryExecutor {
        insert_id: 42,
        ..MemoryExecutor::default()
    };
    let id = query::insert("pages")
        .set("title", "Hello")
        .execute(&conn)
        .await
        .unwrap();
    assert_eq!(id, 42);

    let (sql, values) = conn.last_call();
    assert_eq!(sql, "INSERT INTO `pages` (`title`) VALUES (:insert_title)");
    assert_eq!(values[":insert_title"], Value::from("Hello"));
}

#[tokio::test]
async fn mutations_return_affected_rows() {
    let conn = MemoryExecutor {
        affected: 3,
        ..MemoryExecutor::default()
    };
    let updated = query::update("pages")
        .set("title", "x")
        .where_id(1)
        .execute(&conn)
        .await
        .unwrap();
    assert_eq!(updated, 3);

    let deleted = query::delete("pages")
        .where_in("id", [1, 2, 3])
        .execute(&conn)
        .await
        .unwrap();
    assert_eq!(deleted, 3);
    let (sql, values) = conn.last_call();
    assert_eq!(
        sql,
        "DELETE FROM `pages` WHERE `id` IN (:where_id_1,:where_id_2,:where_id_3)"
    );
    assert_eq!(values.len(), 3);
}

#[tokio::test]
async fn build_errors_never_reach_the_executor() {
    let conn = MemoryExecutor::default();
    let err = query::update("pages").execute(&conn).await.unwrap_err();
    assert!(err.is_config_error());
    assert!(conn.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn shadowing_bind_never_reaches_the_executor() {
    let conn = pages();
    let err = query::select("pages")
        .where_id(12)
        .bind("where_id", 5)
        .fetch_all(&conn)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
    assert!(conn.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn query_errors_keep_native_code() {
    let conn = MemoryExecutor {
        fail_with: Some("1146"),
        ..MemoryExecutor::default()
    };
    let err = query::select("nope").fetch_all(&conn).await.unwrap_err();
    assert!(err.is_query_error());
    assert_eq!(err.code(), Some("1146"));
}

#[tokio::test]
async fn db_without_connection_fails() {
    let db: Db<MemoryExecutor> = Db::without_connection(DbConfig::new());
    let err = db.select("pages").fetch_all(&db).await.unwrap_err();
    assert!(err.is_no_connection());

    // statements still build
    assert_eq!(db.select("pages").to_sql().unwrap(), "SELECT * FROM `pages`");
}

#[tokio::test]
async fn db_applies_prefix_and_records_queries() {
    let config = DbConfig::new().prefix("yeah_").record_queries(true);
    let db = Db::new(config, pages());

    let titles = db
        .select("pages")
        .where_active()
        .fetch_column(&db, "title")
        .await
        .unwrap();
    assert_eq!(titles.len(), 2);
    db.truncate("pages").execute(&db).await.unwrap();

    assert_eq!(
        db.queries(),
        vec![
            "SELECT * FROM `yeah_pages` WHERE `is_active`=:where_is_active".to_string(),
            "TRUNCATE TABLE `yeah_pages`".to_string(),
        ]
    );
    assert_eq!(db.queries_count(), 2);
    db.clear_queries();
    assert_eq!(db.queries_count(), 0);
}

#[tokio::test]
async fn db_does_not_record_by_default() {
    let db = Db::new(DbConfig::new().no_logging(), pages());
    db.select("pages").fetch_all(&db).await.unwrap();
    assert_eq!(db.queries_count(), 0);
    assert_eq!(db.executor().map(|e| e.calls.lock().unwrap().len()), Some(1));
}

#[tokio::test]
async fn db_passes_query_errors_through() {
    let conn = MemoryExecutor {
        fail_with: Some("1064"),
        ..MemoryExecutor::default()
    };
    let db = Db::new(DbConfig::new().record_queries(true), conn);
    let err = db
        .insert("pages")
        .set("title", "x")
        .execute(&db)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("1064"));
    assert_eq!(db.queries_count(), 1);
}
