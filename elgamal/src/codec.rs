//! Mapping of 32-bit integers to curve points and back.
//!
//! `encode(m) = m * G`. Going back is a discrete log problem made tractable by the 32-bit bound: the
//! message is split as `m = xlo + 2^range * xhi` with `range = 32 - precompute_size`. A
//! [`LookupTable`] built once holds the x coordinate of every giant step `(xhi * 2^range) * G`, and
//! [`decode`] walks the baby steps `P - xlo * G` until one lands in the table.
//!
//! `precompute_size` trades table size `2^precompute_size` against `2^range` point subtractions per
//! decode. 19 is the usual choice.

use crate::{
    error::ElGamalError,
    marshal::{decimal_to_field, field_to_decimal},
    params::CurveParameters,
};
use alloc::{collections::BTreeMap, format, string::String, vec::Vec};
use ark_ec::{
    twisted_edwards::{Affine, Projective, TECurveConfig},
    AffineRepr, CurveGroup, Group,
};
use ark_ff::PrimeField;
use ark_std::{cfg_into_iter, cmp::min, end_timer, ops::Range, start_timer};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bit width of messages `encode` accepts
pub const MESSAGE_BITS: u32 = 32;

/// Points are normalized to affine in batches of this size, one field inversion per batch
const BATCH_SIZE: u64 = 1 << 10;

/// Immutable map from the x coordinate of a giant step to its index `xhi`. Serializes to the flat
/// JSON object `{"<decimal x>": "<lowercase hex xhi>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>",
    bound = ""
)]
pub struct LookupTable<F: PrimeField> {
    entries: BTreeMap<F, u32>,
}

impl<F: PrimeField> LookupTable<F> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, x: &F) -> Option<u32> {
        self.entries.get(x).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&F, &u32)> {
        self.entries.iter()
    }

    /// Adds the entries of another shard built by [`precompute_range`] for the same size and base
    pub fn extend(&mut self, shard: LookupTable<F>) {
        self.entries.extend(shard.entries);
    }

    /// The artifact form, keys and values as strings
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(x, xhi)| (field_to_decimal(x), format!("{:x}", xhi)))
            .collect()
    }

    /// Parses the artifact form. Keys must be canonical decimal field elements and values hex
    /// digits (no `0x`) fitting in 32 bits.
    pub fn from_string_map(map: &BTreeMap<String, String>) -> crate::Result<Self> {
        let entries = map
            .iter()
            .map(|(x, xhi)| Ok((decimal_to_field(x)?, parse_hex_index(xhi)?)))
            .collect::<crate::Result<BTreeMap<_, _>>>()?;
        Ok(Self { entries })
    }
}

fn parse_hex_index(s: &str) -> crate::Result<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ElGamalError::InvalidHex(s.into()));
    }
    u32::from_str_radix(s, 16).map_err(|_| ElGamalError::InvalidHex(s.into()))
}

impl<F: PrimeField> TryFrom<BTreeMap<String, String>> for LookupTable<F> {
    type Error = ElGamalError;

    fn try_from(map: BTreeMap<String, String>) -> crate::Result<Self> {
        Self::from_string_map(&map)
    }
}

impl<F: PrimeField> From<LookupTable<F>> for BTreeMap<String, String> {
    fn from(table: LookupTable<F>) -> Self {
        table.to_string_map()
    }
}

pub(crate) fn check_plaintext(plaintext: u64) -> crate::Result<()> {
    if plaintext >> MESSAGE_BITS != 0 {
        return Err(ElGamalError::DomainRange(plaintext as u128, MESSAGE_BITS));
    }
    Ok(())
}

/// Number of baby steps bits, `32 - precompute_size`
fn baby_step_bits(precompute_size: u8) -> crate::Result<u32> {
    if precompute_size as u32 > MESSAGE_BITS {
        return Err(ElGamalError::InvalidPrecomputeSize(precompute_size));
    }
    Ok(MESSAGE_BITS - precompute_size as u32)
}

/// `plaintext * G` for `plaintext < 2^32`. Uses variable time multiplication, the plaintext is not
/// treated as secret at this layer.
pub fn encode<P: TECurveConfig, D>(
    params: &CurveParameters<P, D>,
    plaintext: u64,
) -> crate::Result<Affine<P>> {
    check_plaintext(plaintext)?;
    Ok(params.base().mul_bigint([plaintext]).into_affine())
}

/// Splits a 64-bit value into its low and high 32-bit halves, `input = xlo + 2^32 * xhi`
pub fn split64(input: u128) -> crate::Result<(u32, u32)> {
    if input >> 64 != 0 {
        return Err(ElGamalError::DomainRange(input, 64));
    }
    let input = input as u64;
    Ok((input as u32, (input >> 32) as u32))
}

/// Inverse of [`split64`]
pub fn compose64(xlo: u32, xhi: u32) -> u64 {
    xlo as u64 + ((xhi as u64) << 32)
}

/// Builds the table of the `2^precompute_size` giant steps, see [`precompute_range`]
pub fn precompute<P: TECurveConfig, D>(
    params: &CurveParameters<P, D>,
    precompute_size: u8,
) -> crate::Result<LookupTable<P::BaseField>>
where
    P::BaseField: PrimeField,
{
    baby_step_bits(precompute_size)?;
    precompute_range(params, precompute_size, 0..1u64 << precompute_size)
}

/// Builds the entries of the table for `precompute_size` whose giant step index lies in `xhi`. Long
/// precomputations can be split into shards built separately (or resumed) and combined with
/// [`LookupTable::extend`]. Each batch starts with one scalar multiplication and walks on by adding
/// the giant step `2^range * G`.
pub fn precompute_range<P: TECurveConfig, D>(
    params: &CurveParameters<P, D>,
    precompute_size: u8,
    xhi: Range<u64>,
) -> crate::Result<LookupTable<P::BaseField>>
where
    P::BaseField: PrimeField,
{
    let range = baby_step_bits(precompute_size)?;
    let count = 1u64 << precompute_size;
    if xhi.end > count {
        return Err(ElGamalError::DomainRange(
            (xhi.end - 1) as u128,
            precompute_size as u32,
        ));
    }
    if xhi.is_empty() {
        return Ok(LookupTable {
            entries: BTreeMap::new(),
        });
    }
    let timer = start_timer!(|| format!(
        "Lookup table entries {}..{} of 2^{}",
        xhi.start, xhi.end, precompute_size
    ));
    let giant_step = params.base().mul_bigint([1u64 << range]);
    let first = xhi.start;
    let batches = (xhi.end - first + BATCH_SIZE - 1) / BATCH_SIZE;

    let batch_entries = cfg_into_iter!(0..batches)
        .map(|b| {
            let start = first + b * BATCH_SIZE;
            let end = min(start + BATCH_SIZE, xhi.end);
            let mut cur = giant_step.mul_bigint([start]);
            let mut steps = Vec::with_capacity((end - start) as usize);
            for _ in start..end {
                steps.push(cur);
                cur += giant_step;
            }
            Projective::normalize_batch(&steps)
                .into_iter()
                .zip(start..end)
                .map(|(p, xhi)| (p.x, xhi as u32))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let entries = batch_entries.into_iter().flatten().collect();
    end_timer!(timer);
    Ok(LookupTable { entries })
}

/// Recovers `m < 2^32` from `m * G` with a table built by [`precompute`] for the same
/// `precompute_size`. Fails with [`ElGamalError::DiscreteLogNotFound`] when no baby step hits the
/// table, which means the point does not encode a 32-bit value, or the table is for another size or
/// base point.
pub fn decode<P: TECurveConfig, D>(
    params: &CurveParameters<P, D>,
    point: &Affine<P>,
    precompute_size: u8,
    table: &LookupTable<P::BaseField>,
) -> crate::Result<u32>
where
    P::BaseField: PrimeField,
{
    let range = baby_step_bits(precompute_size)?;
    let timer = start_timer!(|| format!("Decode with 2^{} baby steps", range));
    let baby_steps = 1u64 << range;
    let base = params.base().into_group();
    let target = point.into_group();
    let batches = (baby_steps + BATCH_SIZE - 1) / BATCH_SIZE;

    let search_batch = |b: u64| -> Option<u32> {
        let start = b * BATCH_SIZE;
        let end = min(start + BATCH_SIZE, baby_steps);
        let mut candidate = target - base.mul_bigint([start]);
        let mut candidates = Vec::with_capacity((end - start) as usize);
        for _ in start..end {
            candidates.push(candidate);
            candidate -= base;
        }
        Projective::normalize_batch(&candidates)
            .iter()
            .zip(start..end)
            .find_map(|(c, xlo)| {
                table
                    .get(&c.x)
                    .and_then(|xhi| u32::try_from(xlo + ((xhi as u64) << range)).ok())
            })
    };

    #[cfg(feature = "parallel")]
    let found = (0..batches).into_par_iter().find_map_first(search_batch);

    #[cfg(not(feature = "parallel"))]
    let found = (0..batches).find_map(search_batch);

    end_timer!(timer);
    found.ok_or(ElGamalError::DiscreteLogNotFound)
}
