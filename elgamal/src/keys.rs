//! Secret key sampling and the hash-and-clamp derivation of the scalar used in scalar multiplication.
//!
//! The raw [`SecretKey`] is never multiplied with a point directly. Every multiplication uses the
//! [`FormattedSecretKey`] obtained as follows, which is what circomlib's EdDSA key gadget does:
//!
//! 1. encode the raw key as 32 bytes, big-endian,
//! 2. hash with the 512-bit hash of the curve parameters and keep the first 32 bytes of the digest,
//! 3. prune: clear the 3 low bits of byte 0, clear the top bit and set the second highest bit of byte 31,
//! 4. read the 32 bytes as a little-endian integer and shift it right by 3.
//!
//! The result lies in `[2^251, 2^252)`, so it can exceed the subgroup order and is kept as an
//! unreduced integer.

use crate::{
    error::ElGamalError,
    params::{CurveParameters, Hash512},
    serde_utils::AffineAsDecimalStrings,
};
use alloc::{vec, vec::Vec};
use ark_ec::{
    twisted_edwards::{Affine, TECurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cmp::max, rand::RngCore};
use derivative::Derivative;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte width of the secret key encoding fed to the hash
pub const SECRET_KEY_BYTES: usize = 32;

/// Raw secret key, uniform in `[0, n)`
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
)]
pub struct SecretKey<F: PrimeField>(pub F);

/// Scalar derived from a [`SecretKey`] and used for every scalar multiplication with it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedSecretKey(pub BigUint);

#[serde_as]
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(
    Clone(bound = ""),
    Copy(bound = ""),
    Debug(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
#[serde(bound(
    serialize = "P::BaseField: PrimeField",
    deserialize = "P::BaseField: PrimeField"
))]
pub struct PublicKey<P: TECurveConfig>(#[serde_as(as = "AffineAsDecimalStrings")] pub Affine<P>);

#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
pub struct Keypair<P: TECurveConfig> {
    pub secret_key: SecretKey<P::ScalarField>,
    pub public_key: PublicKey<P>,
}

impl<F: PrimeField> SecretKey<F> {
    /// Draws 256 bit values until one is at least `(2^256 - n) mod n` and reduces it modulo `n`. The
    /// accepted range holds a whole number of copies of `[0, n)` so the result has no modulo bias.
    pub fn generate<R: RngCore, P: TECurveConfig<ScalarField = F>, D>(
        rng: &mut R,
        params: &CurveParameters<P, D>,
    ) -> Self {
        let mut bytes = [0u8; SECRET_KEY_BYTES];
        loop {
            rng.fill_bytes(&mut bytes);
            let candidate = BigUint::from_bytes_be(&bytes);
            if &candidate >= params.rejection_threshold() {
                bytes.zeroize();
                return Self(F::from(candidate % params.subgroup_order()));
            }
        }
    }

    /// Fixed width, big-endian encoding: 32 bytes, or the byte size of the scalar field when it is
    /// larger than 256 bits.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let width = max(SECRET_KEY_BYTES, (F::MODULUS_BIT_SIZE as usize + 7) / 8);
        let value: BigUint = self.0.into();
        let bytes = value.to_bytes_be();
        let mut out = vec![0u8; width];
        out[width - bytes.len()..].copy_from_slice(&bytes);
        out
    }
}

/// Clamping applied to the first half of the digest, same as EdDSA over BabyJubjub
pub fn prune_buffer(buf: &mut [u8; 32]) {
    buf[0] &= 0xF8;
    buf[31] &= 0x7F;
    buf[31] |= 0x40;
}

/// Derives the multiplication scalar from a raw secret key, see the module docs for the byte order
/// at each step. Must agree bit for bit with the in-circuit derivation, a mismatch does not fail here
/// but makes proofs fail to verify.
pub fn format_secret_key<F: PrimeField, D: Hash512>(
    secret_key: &SecretKey<F>,
) -> FormattedSecretKey {
    let mut encoded = secret_key.to_bytes_be();
    let digest = D::digest(&encoded);
    encoded.zeroize();
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&digest[..32]);
    prune_buffer(&mut buf);
    let scalar = BigUint::from_bytes_le(&buf) >> 3u32;
    buf.zeroize();
    FormattedSecretKey(scalar)
}

impl FormattedSecretKey {
    /// Little-endian 64-bit limbs, the form `mul_bigint` takes
    pub fn to_limbs(&self) -> Vec<u64> {
        self.0.to_u64_digits()
    }

    pub fn to_decimal_string(&self) -> alloc::string::String {
        self.0.to_str_radix(10)
    }
}

impl<P: TECurveConfig> PublicKey<P> {
    /// `format_secret_key(secret_key) * G`
    pub fn new<D: Hash512>(
        params: &CurveParameters<P, D>,
        secret_key: &SecretKey<P::ScalarField>,
    ) -> Self {
        let scalar = params.format_secret_key(secret_key);
        Self(params.base().mul_bigint(scalar.to_limbs()).into_affine())
    }

    /// Rejects the identity and points off the curve. Runs before any scalar multiplication touches
    /// a key received from outside, otherwise a crafted point could leak bits of the nonce or key.
    /// Subgroup membership is left to the circuit.
    pub fn validate(&self) -> crate::Result<()> {
        validate_public_key(&self.0)
    }
}

pub fn validate_public_key<P: TECurveConfig>(public_key: &Affine<P>) -> crate::Result<()> {
    if public_key.is_zero() {
        return Err(ElGamalError::PublicKeyIsIdentity);
    }
    if !public_key.is_on_curve() {
        return Err(ElGamalError::PublicKeyNotOnCurve);
    }
    Ok(())
}

impl<P: TECurveConfig> Keypair<P> {
    pub fn generate<R: RngCore, D: Hash512>(rng: &mut R, params: &CurveParameters<P, D>) -> Self {
        let secret_key = SecretKey::generate(rng, params);
        Self::from_secret_key(params, secret_key)
    }

    pub fn from_secret_key<D: Hash512>(
        params: &CurveParameters<P, D>,
        secret_key: SecretKey<P::ScalarField>,
    ) -> Self {
        let public_key = PublicKey::new(params, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        curve::{BabyJubjubConfig, BASE8_X, BASE8_Y},
        params::BabyJubjubParameters,
    };
    use ark_ed_on_bn254::Fr;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use digest::Digest;
    use sha2::Sha512;

    #[test]
    fn secret_key_encoding_is_fixed_width_big_endian() {
        let sk = SecretKey(Fr::from(7u64));
        let mut expected = [0u8; 32];
        expected[31] = 7;
        assert_eq!(sk.to_bytes_be(), expected);

        let sk = SecretKey(Fr::from(0x0102u64));
        let bytes = sk.to_bytes_be();
        assert_eq!(bytes[30..], [1, 2]);
        assert!(bytes[..30].iter().all(|b| *b == 0));

        assert_eq!(SecretKey(Fr::from(0u64)).to_bytes_be(), [0u8; 32]);

        let mut rng = StdRng::seed_from_u64(0u64);
        for _ in 0..20 {
            let sk = SecretKey(Fr::rand(&mut rng));
            let bytes = sk.to_bytes_be();
            assert_eq!(bytes.len(), SECRET_KEY_BYTES);
            assert_eq!(Fr::from_be_bytes_mod_order(&bytes), sk.0);
        }
    }

    #[test]
    fn secret_key_encoding_of_wide_scalar_field() {
        use ark_ed_on_bw6_761::Fr as WideFr;

        let width = (WideFr::MODULUS_BIT_SIZE as usize + 7) / 8;
        assert!(width > SECRET_KEY_BYTES);
        let bytes = SecretKey(WideFr::from(7u64)).to_bytes_be();
        assert_eq!(bytes.len(), width);
        assert_eq!(bytes[width - 1], 7);
        assert!(bytes[..width - 1].iter().all(|b| *b == 0));

        let mut rng = StdRng::seed_from_u64(0u64);
        let sk = SecretKey(-WideFr::rand(&mut rng));
        assert_eq!(WideFr::from_be_bytes_mod_order(&sk.to_bytes_be()), sk.0);
        // Formatting still hashes the whole encoding without panicking
        let formatted = format_secret_key::<WideFr, Sha512>(&sk);
        assert!(formatted.0 < BigUint::from(1u8) << 252u32);
    }

    #[test]
    fn format_secret_key_byte_order() {
        let sk = SecretKey(Fr::from(7u64));
        let formatted = format_secret_key::<Fr, Sha512>(&sk);

        // Redo every step by hand: hash of the BE encoding, first 32 bytes, prune, LE integer, >> 3
        let mut input = [0u8; 32];
        input[31] = 7;
        let digest = Sha512::digest(input);
        let mut buf = [0u8; 32];
        buf.copy_from_slice(&digest[..32]);
        buf[0] &= 0xF8;
        buf[31] &= 0x7F;
        buf[31] |= 0x40;
        let expected = BigUint::from_bytes_le(&buf) >> 3u32;
        assert_eq!(formatted.0, expected);

        // Reading the pruned buffer as big-endian would give a different scalar
        assert_ne!(formatted.0, BigUint::from_bytes_be(&buf) >> 3u32);
        // Hashing a minimal length encoding would give a different scalar as well
        let short = Sha512::digest([7u8]);
        let mut buf = [0u8; 32];
        buf.copy_from_slice(&short[..32]);
        prune_buffer(&mut buf);
        assert_ne!(formatted.0, BigUint::from_bytes_le(&buf) >> 3u32);
    }

    #[test]
    fn formatted_key_range() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = BabyJubjubParameters::default();
        let low = BigUint::from(1u8) << 251u32;
        let high = BigUint::from(1u8) << 252u32;
        for _ in 0..50 {
            let sk = SecretKey::generate(&mut rng, &params);
            let formatted = params.format_secret_key(&sk);
            assert!(formatted.0 >= low);
            assert!(formatted.0 < high);
            assert_eq!(formatted.to_decimal_string(), formatted.0.to_string());
        }
    }

    #[test]
    fn prune() {
        let mut buf = [0xFFu8; 32];
        prune_buffer(&mut buf);
        assert_eq!(buf[0], 0xF8);
        assert_eq!(buf[31], 0x7F);
        let mut buf = [0u8; 32];
        prune_buffer(&mut buf);
        assert_eq!(buf[0], 0);
        assert_eq!(buf[31], 0x40);
    }

    #[test]
    fn secret_keys_are_in_range_and_distinct() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = BabyJubjubParameters::default();
        let keys = (0..100)
            .map(|_| SecretKey::generate(&mut rng, &params))
            .collect::<Vec<_>>();
        for (i, k) in keys.iter().enumerate() {
            let v: BigUint = k.0.into();
            assert!(&v < params.subgroup_order());
            for other in keys[i + 1..].iter() {
                assert_ne!(k, other);
            }
        }
    }

    #[test]
    fn keypair() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = BabyJubjubParameters::default();
        let keypair = Keypair::generate(&mut rng, &params);
        let formatted = params.format_secret_key(&keypair.secret_key);
        assert_eq!(
            keypair.public_key.0,
            params.base().mul_bigint(formatted.to_limbs()).into_affine()
        );
        assert!(keypair.public_key.validate().is_ok());
        assert!(keypair.public_key.0.is_in_correct_subgroup_assuming_on_curve());

        // Deterministic given the secret key
        let again = Keypair::from_secret_key(&params, keypair.secret_key.clone());
        assert_eq!(again, keypair);

        // The raw key is not the multiplier
        let raw: BigUint = keypair.secret_key.0.into();
        assert_ne!(
            keypair.public_key.0,
            params.base().mul_bigint(raw.to_u64_digits()).into_affine()
        );
    }

    #[test]
    fn public_key_validation() {
        let identity = PublicKey::<BabyJubjubConfig>(Affine::zero());
        assert_eq!(
            identity.validate().unwrap_err(),
            ElGamalError::PublicKeyIsIdentity
        );
        let off_curve = PublicKey::<BabyJubjubConfig>(Affine::new_unchecked(BASE8_Y, BASE8_X));
        assert_eq!(
            off_curve.validate().unwrap_err(),
            ElGamalError::PublicKeyNotOnCurve
        );
        let base = PublicKey::<BabyJubjubConfig>(Affine::new_unchecked(BASE8_X, BASE8_Y));
        assert!(base.validate().is_ok());
    }

    #[test]
    fn secret_key_serialization() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = BabyJubjubParameters::default();
        let sk = SecretKey::generate(&mut rng, &params);
        let mut bytes = Vec::new();
        sk.serialize_compressed(&mut bytes).unwrap();
        let back = SecretKey::<Fr>::deserialize_compressed(&bytes[..]).unwrap();
        assert_eq!(back, sk);
    }
}
