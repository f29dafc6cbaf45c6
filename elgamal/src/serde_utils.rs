//! serde_with adapters writing field elements and points as decimal strings, the format circuit
//! inputs and the lookup table artifact use.

use crate::marshal::{
    decimal_to_field, field_to_decimal, point_to_string_array, string_array_to_point,
};
use alloc::string::String;
use ark_ec::twisted_edwards::{Affine, TECurveConfig};
use ark_ff::PrimeField;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// Field element as a decimal string
pub struct FieldAsDecimalString;

/// Point as `[x, y]` with decimal string coordinates. Deserialization does not check curve membership.
pub struct AffineAsDecimalStrings;

impl<F: PrimeField> SerializeAs<F> for FieldAsDecimalString {
    fn serialize_as<S>(x: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&field_to_decimal(x))
    }
}

impl<'de, F: PrimeField> DeserializeAs<'de, F> for FieldAsDecimalString {
    fn deserialize_as<D>(deserializer: D) -> Result<F, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decimal_to_field(&s).map_err(serde::de::Error::custom)
    }
}

impl<P: TECurveConfig> SerializeAs<Affine<P>> for AffineAsDecimalStrings
where
    P::BaseField: PrimeField,
{
    fn serialize_as<S>(x: &Affine<P>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        point_to_string_array(x).serialize(serializer)
    }
}

impl<'de, P: TECurveConfig> DeserializeAs<'de, Affine<P>> for AffineAsDecimalStrings
where
    P::BaseField: PrimeField,
{
    fn deserialize_as<D>(deserializer: D) -> Result<Affine<P>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let coordinates = <[String; 2]>::deserialize(deserializer)?;
        string_array_to_point(&coordinates).map_err(serde::de::Error::custom)
    }
}
