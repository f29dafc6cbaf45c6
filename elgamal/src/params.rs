//! Curve description shared by every other module.
//!
//! Coefficients, field modulus, subgroup order and cofactor come from the arkworks curve config `P`.
//! The base point and the 512-bit hash used by key derivation are chosen here, so parameters for a
//! different curve (or a different generator on the same curve) are just another value of
//! [`CurveParameters`].

use crate::{
    curve::BabyJubjubConfig,
    error::ElGamalError,
    keys::{FormattedSecretKey, SecretKey},
};
use ark_ec::twisted_edwards::{Affine, TECurveConfig};
use ark_ff::PrimeField;
use ark_std::marker::PhantomData;
use derivative::Derivative;
use digest::{consts::U64, Digest, OutputSizeUser};
use num_bigint::BigUint;
use sha2::Sha512;

/// Hash with a 64 byte output, the only kind key derivation accepts.
pub trait Hash512: Digest + OutputSizeUser<OutputSize = U64> {}

impl<D: Digest + OutputSizeUser<OutputSize = U64>> Hash512 for D {}

/// Bit width of the random values drawn when sampling a secret key
pub const SECRET_KEY_SAMPLE_BITS: u32 = 256;

#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""), Eq(bound = ""))]
pub struct CurveParameters<P: TECurveConfig, D = Sha512> {
    base: Affine<P>,
    subgroup_order: BigUint,
    /// `(2^256 - n) mod n`, random values below it are rejected when sampling secret keys
    rejection_threshold: BigUint,
    #[derivative(Debug = "ignore")]
    _hash: PhantomData<fn() -> D>,
}

/// Parameters matching circomlib's BabyJubjub: [`BabyJubjubConfig`] with `Base8` as base point and
/// SHA-512 for key derivation.
pub type BabyJubjubParameters = CurveParameters<BabyJubjubConfig, Sha512>;

impl<P: TECurveConfig, D> CurveParameters<P, D> {
    /// Fails unless `base` is a non-identity point on the curve and in the prime order subgroup, and
    /// the subgroup order is below `2^256` so that secret keys can be sampled from 256 bit values.
    pub fn new(base: Affine<P>) -> crate::Result<Self> {
        let order_bits = <P::ScalarField as PrimeField>::MODULUS_BIT_SIZE;
        if order_bits > SECRET_KEY_SAMPLE_BITS {
            return Err(ElGamalError::SubgroupOrderTooLarge(order_bits));
        }
        if base.is_zero()
            || !base.is_on_curve()
            || !base.is_in_correct_subgroup_assuming_on_curve()
        {
            return Err(ElGamalError::InvalidBasePoint);
        }
        Ok(Self::new_unchecked(base))
    }

    fn new_unchecked(base: Affine<P>) -> Self {
        let subgroup_order: BigUint = <P::ScalarField as PrimeField>::MODULUS.into();
        let two_pow = BigUint::from(1u8) << SECRET_KEY_SAMPLE_BITS;
        let rejection_threshold = (two_pow - &subgroup_order) % &subgroup_order;
        Self {
            base,
            subgroup_order,
            rejection_threshold,
            _hash: PhantomData,
        }
    }

    pub fn base(&self) -> &Affine<P> {
        &self.base
    }

    pub fn coeff_a(&self) -> P::BaseField {
        P::COEFF_A
    }

    pub fn coeff_d(&self) -> P::BaseField {
        P::COEFF_D
    }

    /// Order `n` of the subgroup generated by the base point
    pub fn subgroup_order(&self) -> &BigUint {
        &self.subgroup_order
    }

    pub fn cofactor(&self) -> &'static [u64] {
        P::COFACTOR
    }

    pub fn rejection_threshold(&self) -> &BigUint {
        &self.rejection_threshold
    }

    /// Whether the point satisfies `a*x^2 + y^2 = 1 + d*x^2*y^2`
    pub fn is_on_curve(&self, point: &Affine<P>) -> bool {
        point.is_on_curve()
    }
}

impl<P: TECurveConfig, D> CurveParameters<P, D>
where
    P::BaseField: PrimeField,
{
    /// Modulus of the field the coordinates live in. For BabyJubjub this is the scalar field of BN254
    /// so coordinates are native circuit variables.
    pub fn field_modulus(&self) -> BigUint {
        <P::BaseField as PrimeField>::MODULUS.into()
    }
}

impl<P: TECurveConfig, D: Hash512> CurveParameters<P, D> {
    /// See [`crate::keys::format_secret_key`]
    pub fn format_secret_key(&self, secret_key: &SecretKey<P::ScalarField>) -> FormattedSecretKey {
        crate::keys::format_secret_key::<P::ScalarField, D>(secret_key)
    }
}

impl<D> Default for CurveParameters<BabyJubjubConfig, D> {
    fn default() -> Self {
        Self::new(BabyJubjubConfig::GENERATOR).expect("Base8 is a prime order point of BabyJubjub")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{BASE8_X, BASE8_Y};
    use ark_ec::{AffineRepr, CurveConfig, CurveGroup};
    use ark_ed_on_bn254::{Fq, Fr};
    use core::str::FromStr;

    #[test]
    fn babyjubjub_parameters() {
        let params = BabyJubjubParameters::default();
        assert_eq!(params.coeff_a(), Fq::from(168700u64));
        assert_eq!(params.coeff_d(), Fq::from(168696u64));
        assert_eq!(params.cofactor(), &[8]);
        assert_eq!(
            params.field_modulus(),
            BigUint::from_str(
                "21888242871839275222246405745257275088548364400416034343698204186575808495617"
            )
            .unwrap()
        );
        assert_eq!(
            params.subgroup_order(),
            &BigUint::from_str(
                "2736030358979909402780800718157159386076813972158567259200215660948447373041"
            )
            .unwrap()
        );

        // circomlib's Base8, written out rather than taken from the curve module
        let base8 = Affine::<BabyJubjubConfig>::new_unchecked(
            Fq::from_str(
                "5299619240641551281634865583518297030282874472190772894086521144482721001553",
            )
            .unwrap(),
            Fq::from_str(
                "16950150798460657717958625567821834550301663161624707787222815936182638968203",
            )
            .unwrap(),
        );
        assert_eq!(params.base(), &base8);

        // Base8 passes the same checks an injected base point has to pass
        assert!(BabyJubjubParameters::new(*params.base()).is_ok());
        assert!(params.is_on_curve(params.base()));
        assert!(params
            .base()
            .mul_bigint(<Fr as PrimeField>::MODULUS)
            .into_affine()
            .is_zero());
    }

    #[test]
    fn rejection_threshold() {
        let params = BabyJubjubParameters::default();
        let n = params.subgroup_order();
        let t = params.rejection_threshold();
        assert!(t < n);
        // Values in [t, 2^256) cover every residue mod n the same number of times
        let span = (BigUint::from(1u8) << 256u32) - t;
        assert_eq!(span % n, BigUint::from(0u8));
    }

    #[test]
    fn invalid_base_point() {
        assert_eq!(
            BabyJubjubParameters::new(Affine::zero()).unwrap_err(),
            ElGamalError::InvalidBasePoint
        );
        // Not on the curve
        let off = Affine::<BabyJubjubConfig>::new_unchecked(BASE8_X, BASE8_X);
        assert_eq!(
            BabyJubjubParameters::new(off).unwrap_err(),
            ElGamalError::InvalidBasePoint
        );
        // (0, -1) is on the curve but has order 2
        let low_order = Affine::<BabyJubjubConfig>::new_unchecked(Fq::from(0u64), -Fq::from(1u64));
        assert!(low_order.is_on_curve());
        assert_eq!(
            BabyJubjubParameters::new(low_order).unwrap_err(),
            ElGamalError::InvalidBasePoint
        );
    }

    #[test]
    fn other_base_point_on_same_curve() {
        let params = BabyJubjubParameters::default();
        let base = params.base().mul_bigint([5u64]).into_affine();
        let other = BabyJubjubParameters::new(base).unwrap();
        assert_eq!(other.base(), &base);
        assert_eq!(other.subgroup_order(), params.subgroup_order());
    }

    #[test]
    fn subgroup_order_above_256_bits() {
        use ark_ed_on_bw6_761::EdwardsConfig as Bw6Config;

        let bits = <<Bw6Config as CurveConfig>::ScalarField as PrimeField>::MODULUS_BIT_SIZE;
        assert!(bits > 256);
        let err = CurveParameters::<Bw6Config>::new(Bw6Config::GENERATOR).unwrap_err();
        assert_eq!(err, ElGamalError::SubgroupOrderTooLarge(bits));
        // Checked before the base point
        assert_eq!(
            CurveParameters::<Bw6Config>::new(Affine::zero()).unwrap_err(),
            ElGamalError::SubgroupOrderTooLarge(bits)
        );
    }
}
