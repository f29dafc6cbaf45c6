//! Conversions between curve points / scalars and the decimal strings circuits take as witness.

use crate::error::ElGamalError;
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use ark_ec::twisted_edwards::{Affine, TECurveConfig};
use ark_ff::PrimeField;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

pub fn field_to_biguint<F: PrimeField>(f: &F) -> BigUint {
    (*f).into()
}

pub fn field_to_decimal<F: PrimeField>(f: &F) -> String {
    field_to_biguint(f).to_str_radix(10)
}

/// Fails if `value` is not a canonical field element, i.e. it is not smaller than the modulus
pub fn biguint_to_field<F: PrimeField>(value: &BigUint) -> crate::Result<F> {
    let modulus: BigUint = F::MODULUS.into();
    if value >= &modulus {
        return Err(ElGamalError::InvalidDecimal(value.to_str_radix(10)));
    }
    Ok(F::from(value.clone()))
}

/// Accepts only a non-empty string of ASCII digits whose value is below the field modulus
pub fn decimal_to_field<F: PrimeField>(s: &str) -> crate::Result<F> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ElGamalError::InvalidDecimal(s.into()));
    }
    let value =
        BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| ElGamalError::InvalidDecimal(s.into()))?;
    biguint_to_field(&value)
}

pub fn scalar_to_decimal(scalar: &BigUint) -> String {
    scalar.to_str_radix(10)
}

pub fn point_to_string_array<P: TECurveConfig>(point: &Affine<P>) -> [String; 2]
where
    P::BaseField: PrimeField,
{
    [field_to_decimal(&point.x), field_to_decimal(&point.y)]
}

/// Builds a point from its coordinates without checking curve membership, callers that go on to
/// multiply with it must validate it first.
pub fn string_array_to_point<P: TECurveConfig>(coordinates: &[String; 2]) -> crate::Result<Affine<P>>
where
    P::BaseField: PrimeField,
{
    Ok(Affine::new_unchecked(
        decimal_to_field(&coordinates[0])?,
        decimal_to_field(&coordinates[1])?,
    ))
}

pub fn point_to_bigint_array<P: TECurveConfig>(point: &Affine<P>) -> [BigUint; 2]
where
    P::BaseField: PrimeField,
{
    [field_to_biguint(&point.x), field_to_biguint(&point.y)]
}

/// Same as [`string_array_to_point`] for integer coordinates
pub fn bigint_array_to_point<P: TECurveConfig>(coordinates: &[BigUint; 2]) -> crate::Result<Affine<P>>
where
    P::BaseField: PrimeField,
{
    Ok(Affine::new_unchecked(
        biguint_to_field(&coordinates[0])?,
        biguint_to_field(&coordinates[1])?,
    ))
}

/// Nested witness object, serializes to the plain JSON circuits read inputs from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Witness<T> {
    Value(T),
    List(Vec<Witness<T>>),
    Map(BTreeMap<String, Witness<T>>),
}

impl<T> Witness<T> {
    pub fn map<U>(&self, f: &impl Fn(&T) -> U) -> Witness<U> {
        match self {
            Self::Value(v) => Witness::Value(f(v)),
            Self::List(l) => Witness::List(l.iter().map(|w| w.map(f)).collect()),
            Self::Map(m) => Witness::Map(m.iter().map(|(k, w)| (k.clone(), w.map(f))).collect()),
        }
    }
}

impl Witness<BigUint> {
    /// Converts every integer in the tree to its decimal string
    pub fn stringify(&self) -> Witness<String> {
        self.map(&scalar_to_decimal)
    }
}

impl<P: TECurveConfig> From<&Affine<P>> for Witness<BigUint>
where
    P::BaseField: PrimeField,
{
    fn from(point: &Affine<P>) -> Self {
        let [x, y] = point_to_bigint_array(point);
        Witness::List(alloc::vec![Witness::Value(x), Witness::Value(y)])
    }
}
