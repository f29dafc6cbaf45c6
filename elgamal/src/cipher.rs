//! ElGamal encryption of 32-bit integers, decryption to the encoded point, rerandomization and
//! homomorphic addition.
//!
//! With base point `G`, public key `Y = k * G` (`k` the formatted secret key), message `m` and nonce `r`
//! the ciphertext is `(r * G, m * G + r * Y)`. Decryption subtracts `k * (r * G)` and leaves `m * G`,
//! which [`crate::codec::decode`] turns back into `m`.

use crate::{
    codec::{check_plaintext, compose64, decode, encode, split64, LookupTable},
    keys::{FormattedSecretKey, PublicKey, SecretKey},
    marshal::Witness,
    params::{CurveParameters, Hash512},
    serde_utils::AffineAsDecimalStrings,
};
use alloc::{collections::BTreeMap, string::ToString, vec::Vec};
use ark_ec::{
    twisted_edwards::{Affine, Projective, TECurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::PrimeField;
use ark_std::{
    iter::Sum,
    ops::{Add, AddAssign},
    rand::RngCore,
    Zero,
};
use derivative::Derivative;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Randomness of one encryption or rerandomization, used as an unreduced integer multiplier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce(pub BigUint);

impl Nonce {
    pub fn to_limbs(&self) -> Vec<u64> {
        self.0.to_u64_digits()
    }
}

impl From<u64> for Nonce {
    fn from(n: u64) -> Self {
        Self(BigUint::from(n))
    }
}

impl From<FormattedSecretKey> for Nonce {
    fn from(k: FormattedSecretKey) -> Self {
        Self(k.0)
    }
}

/// A raw, unclamped scalar
impl<F: PrimeField> From<&SecretKey<F>> for Nonce {
    fn from(k: &SecretKey<F>) -> Self {
        Self(k.0.into())
    }
}

#[serde_as]
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(
    Clone(bound = ""),
    Copy(bound = ""),
    Debug(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
#[serde(
    rename_all = "camelCase",
    bound(
        serialize = "P::BaseField: PrimeField",
        deserialize = "P::BaseField: PrimeField"
    )
)]
pub struct Ciphertext<P: TECurveConfig> {
    /// `r * G`
    #[serde_as(as = "AffineAsDecimalStrings")]
    pub ephemeral_key: Affine<P>,
    /// `m * G + r * Y`
    #[serde_as(as = "AffineAsDecimalStrings")]
    pub ciphertext: Affine<P>,
}

impl<P: TECurveConfig> Ciphertext<P> {
    /// Encrypts `plaintext` with a fresh nonce, the formatted form of a newly sampled secret key.
    /// Returns the ciphertext and the nonce.
    pub fn encrypt<R: RngCore, D: Hash512>(
        rng: &mut R,
        params: &CurveParameters<P, D>,
        public_key: &PublicKey<P>,
        plaintext: u64,
    ) -> crate::Result<(Self, Nonce)> {
        public_key.validate()?;
        check_plaintext(plaintext)?;
        let salt = SecretKey::generate(rng, params);
        let nonce = Nonce::from(params.format_secret_key(&salt));
        let ciphertext = Self::encrypt_with_nonce(params, public_key, plaintext, &nonce)?;
        Ok((ciphertext, nonce))
    }

    /// Encrypts with the given nonce as is, no formatting is applied to it.
    /// Fails if the public key is the identity or off the curve, or if `plaintext >= 2^32`.
    pub fn encrypt_with_nonce<D>(
        params: &CurveParameters<P, D>,
        public_key: &PublicKey<P>,
        plaintext: u64,
        nonce: &Nonce,
    ) -> crate::Result<Self> {
        public_key.validate()?;
        let message = encode(params, plaintext)?;
        Ok(Self::mask(params, &public_key.0, &message, nonce))
    }

    /// Encrypts a point that is already an encoded message
    pub fn encrypt_point<D>(
        params: &CurveParameters<P, D>,
        public_key: &PublicKey<P>,
        message: &Affine<P>,
        nonce: &Nonce,
    ) -> crate::Result<Self> {
        public_key.validate()?;
        Ok(Self::mask(params, &public_key.0, message, nonce))
    }

    fn mask<D>(
        params: &CurveParameters<P, D>,
        public_key: &Affine<P>,
        message: &Affine<P>,
        nonce: &Nonce,
    ) -> Self {
        let limbs = nonce.to_limbs();
        let ephemeral_key = params.base().mul_bigint(&limbs);
        let masking_key = public_key.mul_bigint(&limbs);
        Self::from_projective(ephemeral_key, masking_key + *message)
    }

    fn from_projective(ephemeral_key: Projective<P>, ciphertext: Projective<P>) -> Self {
        let affine = Projective::normalize_batch(&[ephemeral_key, ciphertext]);
        Self {
            ephemeral_key: affine[0],
            ciphertext: affine[1],
        }
    }

    /// Returns the encoded message `m * G`, see [`decrypt`]
    pub fn decrypt<D: Hash512>(
        &self,
        params: &CurveParameters<P, D>,
        secret_key: &SecretKey<P::ScalarField>,
    ) -> Affine<P> {
        decrypt(params, secret_key, &self.ephemeral_key, &self.ciphertext)
    }

    /// Decrypts and solves the discrete log of the encoded message
    pub fn decrypt_and_decode<D: Hash512>(
        &self,
        params: &CurveParameters<P, D>,
        secret_key: &SecretKey<P::ScalarField>,
        precompute_size: u8,
        table: &LookupTable<P::BaseField>,
    ) -> crate::Result<u32>
    where
        P::BaseField: PrimeField,
    {
        let encoded = self.decrypt(params, secret_key);
        decode(params, &encoded, precompute_size, table)
    }

    /// Adds `r' * G` and `r' * Y` to the two components with a fresh `r'`. The result decrypts to the
    /// same message under the same key but cannot be linked to `self`.
    ///
    /// Unlike [`Self::encrypt`], the fresh nonce is a raw sampled scalar and is not formatted, no
    /// circuit recomputes it.
    pub fn rerandomize<R: RngCore, D>(
        &self,
        rng: &mut R,
        params: &CurveParameters<P, D>,
        public_key: &PublicKey<P>,
    ) -> crate::Result<(Self, Nonce)> {
        let salt = SecretKey::generate(rng, params);
        let nonce = Nonce::from(&salt);
        let rerandomized = self.rerandomize_with_nonce(params, public_key, &nonce)?;
        Ok((rerandomized, nonce))
    }

    pub fn rerandomize_with_nonce<D>(
        &self,
        params: &CurveParameters<P, D>,
        public_key: &PublicKey<P>,
        nonce: &Nonce,
    ) -> crate::Result<Self> {
        public_key.validate()?;
        let limbs = nonce.to_limbs();
        let ephemeral_key = params.base().mul_bigint(&limbs) + self.ephemeral_key;
        let ciphertext = public_key.0.mul_bigint(&limbs) + self.ciphertext;
        Ok(Self::from_projective(ephemeral_key, ciphertext))
    }

    /// Encryption of 0 with nonce 0, the neutral element of ciphertext addition
    pub fn identity() -> Self {
        Self {
            ephemeral_key: Affine::zero(),
            ciphertext: Affine::zero(),
        }
    }

    /// `{"ephemeralKey": [x, y], "ciphertext": [x, y]}` for witness generation
    pub fn to_witness(&self) -> Witness<BigUint>
    where
        P::BaseField: PrimeField,
    {
        let mut map = BTreeMap::new();
        map.insert(
            "ephemeralKey".to_string(),
            Witness::from(&self.ephemeral_key),
        );
        map.insert("ciphertext".to_string(), Witness::from(&self.ciphertext));
        Witness::Map(map)
    }
}

/// `ciphertext - k * ephemeral_key` with `k` the formatted secret key. Neither point is validated,
/// the circuit constrains them.
pub fn decrypt<P: TECurveConfig, D: Hash512>(
    params: &CurveParameters<P, D>,
    secret_key: &SecretKey<P::ScalarField>,
    ephemeral_key: &Affine<P>,
    ciphertext: &Affine<P>,
) -> Affine<P> {
    let masking_key = ephemeral_key.mul_bigint(params.format_secret_key(secret_key).to_limbs());
    (-masking_key + *ciphertext).into_affine()
}

/// Componentwise sum. For ciphertexts under the same public key it decrypts to the sum of the
/// encoded messages, which decodes only while the sum stays below `2^32`.
impl<P: TECurveConfig> Add for Ciphertext<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_projective(
            self.ephemeral_key.into_group() + rhs.ephemeral_key,
            self.ciphertext.into_group() + rhs.ciphertext,
        )
    }
}

impl<P: TECurveConfig> AddAssign for Ciphertext<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<P: TECurveConfig> Sum for Ciphertext<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let (e, c) = iter.fold(
            (Projective::<P>::zero(), Projective::<P>::zero()),
            |(e, c), ct| (e + ct.ephemeral_key, c + ct.ciphertext),
        );
        Self::from_projective(e, c)
    }
}

/// Encrypts a 64-bit value as two ciphertexts of its [`split64`] halves, low half first, each with
/// its own nonce. Sums of such pairs have to be decoded half by half.
pub fn encrypt_u64<R: RngCore, P: TECurveConfig, D: Hash512>(
    rng: &mut R,
    params: &CurveParameters<P, D>,
    public_key: &PublicKey<P>,
    value: u64,
) -> crate::Result<[Ciphertext<P>; 2]> {
    let (xlo, xhi) = split64(value as u128)?;
    let (lo, _) = Ciphertext::encrypt(rng, params, public_key, xlo as u64)?;
    let (hi, _) = Ciphertext::encrypt(rng, params, public_key, xhi as u64)?;
    Ok([lo, hi])
}

/// Inverse of [`encrypt_u64`]
pub fn decrypt_u64<P: TECurveConfig, D: Hash512>(
    halves: &[Ciphertext<P>; 2],
    params: &CurveParameters<P, D>,
    secret_key: &SecretKey<P::ScalarField>,
    precompute_size: u8,
    table: &LookupTable<P::BaseField>,
) -> crate::Result<u64>
where
    P::BaseField: PrimeField,
{
    let xlo = halves[0].decrypt_and_decode(params, secret_key, precompute_size, table)?;
    let xhi = halves[1].decrypt_and_decode(params, secret_key, precompute_size, table)?;
    Ok(compose64(xlo, xhi))
}
