use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

use crate::encoding::text_form;
use crate::types::RowValues;

/// Borrowed Postgres parameters.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        Params {
            references: params.iter().map(|p| p as &(dyn ToSql + Sync)).collect(),
        }
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

fn is_text_type(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

fn wrong_type(ty: &Type) -> Box<dyn Error + Sync + Send> {
    Box::new(WrongType::new::<RowValues>(ty.clone()))
}

impl ToSql for RowValues {
    /// Values bind in their native encoding when the column type matches. Text columns
    /// take any scalar or structured value in its text form; other mismatches are
    /// rejected with `WrongType`.
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if is_text_type(ty) {
            return match self {
                RowValues::Null => Ok(IsNull::Yes),
                RowValues::Blob(_) => Err(wrong_type(ty)),
                other => text_form(other).unwrap_or_default().to_sql(ty, out),
            };
        }
        match (self, ty) {
            (RowValues::Null, _) => Ok(IsNull::Yes),
            (RowValues::Int(i), &Type::INT2) => i16::try_from(*i)?.to_sql(ty, out),
            (RowValues::Int(i), &Type::INT4) => i32::try_from(*i)?.to_sql(ty, out),
            (RowValues::Int(i), &Type::INT8) => i.to_sql(ty, out),
            #[allow(clippy::cast_precision_loss)]
            (RowValues::Int(i), &Type::FLOAT4 | &Type::FLOAT8) => {
                RowValues::Float(*i as f64).to_sql(ty, out)
            }
            #[allow(clippy::cast_possible_truncation)]
            (RowValues::Float(f), &Type::FLOAT4) => (*f as f32).to_sql(ty, out),
            (RowValues::Float(f), &Type::FLOAT8) => f.to_sql(ty, out),
            (RowValues::Bool(b), &Type::BOOL) => b.to_sql(ty, out),
            (RowValues::Timestamp(dt), &Type::TIMESTAMP) => dt.to_sql(ty, out),
            (RowValues::Timestamp(dt), &Type::DATE) => dt.date().to_sql(ty, out),
            (RowValues::JSON(v), &Type::JSON | &Type::JSONB) => v.to_sql(ty, out),
            (RowValues::Blob(bytes), &Type::BYTEA) => bytes.to_sql(ty, out),
            _ => Err(wrong_type(ty)),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(value: &RowValues, ty: &Type) -> Result<Vec<u8>, Box<dyn Error + Sync + Send>> {
        let mut buf = BytesMut::new();
        value.to_sql_checked(ty, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn ints_narrow_to_the_column_width() {
        assert_eq!(bind(&RowValues::Int(7), &Type::INT4).unwrap(), 7_i32.to_be_bytes());
        assert!(bind(&RowValues::Int(i64::MAX), &Type::INT2).is_err());
    }

    #[test]
    fn text_columns_take_the_text_form() {
        assert_eq!(bind(&RowValues::Bool(true), &Type::TEXT).unwrap(), b"true");
        assert_eq!(bind(&RowValues::Int(12345), &Type::VARCHAR).unwrap(), b"12345");
        assert_eq!(bind(&RowValues::Float(1.5), &Type::BPCHAR).unwrap(), b"1.5");
        assert_eq!(
            bind(&RowValues::JSON(serde_json::json!({"k": 1})), &Type::TEXT).unwrap(),
            br#"{"k":1}"#
        );
    }

    #[test]
    fn other_mismatches_are_rejected() {
        assert!(bind(&RowValues::Text("x".into()), &Type::INT4).is_err());
        assert!(bind(&RowValues::Bool(true), &Type::INT8).is_err());
        assert!(bind(&RowValues::Blob(vec![1]), &Type::TEXT).is_err());
    }

    #[test]
    fn null_binds_without_bytes() {
        let mut buf = BytesMut::new();
        let is_null = RowValues::Null.to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }
}
