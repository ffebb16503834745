use mongodb::bson::{self, Bson, RawBsonRef, RawDocument};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::utils::tag::wire_name;

/// One decodable field of a [`Record`]: its wire-mapping tag and a setter that
/// decodes a single raw value into it.
pub struct FieldDef<T> {
    pub name: &'static str,
    pub tag: &'static str,
    pub decode: fn(&mut T, RawBsonRef<'_>) -> Result<()>,
}

/// A document-shaped type a cursor can decode into.
///
/// The whole-document path goes through serde; [`Record::fields`] lists the
/// tagged fields, in declaration order, for field-by-field decoding. Usually
/// implemented with [`field_table!`](crate::field_table).
pub trait Record: DeserializeOwned + Sized + 'static {
    fn fields() -> &'static [FieldDef<Self>];
}

/// Decode one raw BSON value into `T`.
pub fn decode_value<T: DeserializeOwned>(raw: RawBsonRef<'_>) -> Result<T> {
    let value = Bson::try_from(raw)?;
    Ok(bson::from_bson(value)?)
}

pub(crate) fn decode_document<T: DeserializeOwned>(doc: &RawDocument) -> Result<T> {
    Ok(bson::from_slice(doc.as_bytes())?)
}

/// Decode every tagged field of `target` that `doc` carries, skipping fields
/// that are missing, malformed or of the wrong type. Returns the number of
/// fields written.
pub(crate) fn decode_fields<T: Record>(doc: &RawDocument, target: &mut T) -> usize {
    let mut written = 0;
    for field in T::fields() {
        let Some(wire) = wire_name(field.tag) else {
            continue;
        };
        let raw = match doc.get(wire) {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(err) => {
                tracing::debug!(field = field.name, wire, error = %err, "skipping malformed field");
                continue;
            }
        };
        match (field.decode)(target, raw) {
            Ok(()) => written += 1,
            Err(err) => {
                tracing::debug!(field = field.name, wire, error = %err, "skipping undecodable field");
            }
        }
    }
    written
}

/// Implement [`Record`] for a struct by listing its tagged fields.
///
/// ```
/// use novadb_cursor::field_table;
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct User {
///     name: String,
///     #[serde(default)]
///     age: i32,
///     #[serde(skip)]
///     cache_hits: u32,
/// }
///
/// field_table!(User {
///     name => "name,omitempty",
///     age => "age",
/// });
/// ```
#[macro_export]
macro_rules! field_table {
    ($ty:ty { $($field:ident => $tag:literal),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields() -> &'static [$crate::FieldDef<Self>] {
                const FIELDS: &[$crate::FieldDef<$ty>] = &[
                    $(
                        $crate::FieldDef {
                            name: stringify!($field),
                            tag: $tag,
                            decode: |record: &mut $ty, raw: $crate::bson::RawBsonRef<'_>| -> $crate::Result<()> {
                                record.$field = $crate::decode_value(raw)?;
                                Ok(())
                            },
                        },
                    )*
                ];
                FIELDS
            }
        }
    };
}
