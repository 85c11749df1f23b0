//! Untyped column values.
//!
//! sqlite stores every value with one of five storage classes regardless of
//! the declared column type. A [ColumnValue] keeps the storage class and the
//! stored value exactly as read, so that writing it back produces the same
//! value in another database.
use sqlx::{
    Decode, Encode, Sqlite, Type, TypeInfo, ValueRef,
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
};
use std::fmt::Display;

/// A single value as sqlite stores it
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    /// The value as a string slice, if it is stored as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl Display for ColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl Type<Sqlite> for ColumnValue {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    // any storage class can be held
    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'r> Decode<'r, Sqlite> for ColumnValue {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::Null);
        }
        // the runtime storage class, not the declared column type
        let storage = value.type_info().name().to_string();
        match storage.as_str() {
            "INTEGER" => Ok(Self::Integer(<i64 as Decode<Sqlite>>::decode(value)?)),
            "REAL" => Ok(Self::Real(<f64 as Decode<Sqlite>>::decode(value)?)),
            "BLOB" => Ok(Self::Blob(<Vec<u8> as Decode<Sqlite>>::decode(value)?)),
            _ => Ok(Self::Text(<String as Decode<Sqlite>>::decode(value)?)),
        }
    }
}

impl<'q> Encode<'q, Sqlite> for ColumnValue {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Integer(i) => <i64 as Encode<Sqlite>>::encode_by_ref(i, buf),
            Self::Real(r) => <f64 as Encode<Sqlite>>::encode_by_ref(r, buf),
            Self::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf),
            Self::Blob(b) => <Vec<u8> as Encode<Sqlite>>::encode_by_ref(b, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Pool, Row};
    use test_log::test;

    #[test(sqlx::test(migrations = false))]
    async fn test_storage_classes_survive(pool: Pool<Sqlite>) {
        sqlx::query("CREATE TABLE t (pos INTEGER, v)")
            .execute(&pool)
            .await
            .expect("failed to create table");
        let values = vec![
            ColumnValue::Null,
            ColumnValue::Integer(2),
            ColumnValue::Real(1.5),
            ColumnValue::Text("2023-05-01 10:00:00".into()),
            ColumnValue::Text("17".into()),
            ColumnValue::Blob(vec![0, 159, 146, 150]),
        ];
        for (pos, v) in values.iter().enumerate() {
            sqlx::query("INSERT INTO t (pos, v) VALUES (?, ?)")
                .bind(pos as i64)
                .bind(v)
                .execute(&pool)
                .await
                .expect("failed to insert");
        }

        let rows = sqlx::query("SELECT v, typeof(v) AS storage FROM t ORDER BY pos")
            .fetch_all(&pool)
            .await
            .expect("failed to select");
        let read = rows
            .iter()
            .map(|row| row.try_get::<ColumnValue, _>("v"))
            .collect::<Result<Vec<_>, _>>()
            .expect("failed to decode");
        assert_eq!(read, values);
        let storage = rows
            .iter()
            .map(|row| row.get::<String, _>("storage"))
            .collect::<Vec<_>>();
        assert_eq!(storage, vec!["null", "integer", "real", "text", "text", "blob"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnValue::Null.to_string(), "");
        assert_eq!(ColumnValue::from(3i64).to_string(), "3");
        assert_eq!(ColumnValue::from("example.com").to_string(), "example.com");
        assert_eq!(ColumnValue::Blob(vec![1, 2]).to_string(), "<2 bytes>");
        assert_eq!(ColumnValue::from("x").as_text(), Some("x"));
        assert_eq!(ColumnValue::Integer(1).as_text(), None);
    }
}
