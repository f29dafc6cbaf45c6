//! BabyJubjub in the form circomlib uses, `168700*x^2 + y^2 = 1 + 168696*x^2*y^2` over the scalar
//! field of BN254.
//!
//! arkworks' `ed_on_bn254::EdwardsConfig` describes the same group but rescaled to `a = 1`, so its
//! coordinates differ from the ones circuits take as witness. Only the fields are reused from it.

use ark_ec::{
    twisted_edwards::{Affine, MontCurveConfig, TECurveConfig},
    CurveConfig,
};
use ark_ed_on_bn254::{Fq, Fr};
use ark_ff::MontFp;

/// x coordinate of `Base8`, the generator of the prime order subgroup used by circomlib
pub const BASE8_X: Fq =
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553");
/// y coordinate of `Base8`
pub const BASE8_Y: Fq =
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203");

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct BabyJubjubConfig;

impl CurveConfig for BabyJubjubConfig {
    type BaseField = Fq;
    type ScalarField = Fr;

    const COFACTOR: &'static [u64] = &[8];

    /// `8^-1 mod n`
    const COFACTOR_INV: Fr =
        MontFp!("2394026564107420727433200628387514462817212225638746351800188703329891451411");
}

impl TECurveConfig for BabyJubjubConfig {
    const COEFF_A: Fq = MontFp!("168700");
    const COEFF_D: Fq = MontFp!("168696");

    const GENERATOR: Affine<Self> = Affine::new_unchecked(BASE8_X, BASE8_Y);

    type MontCurveConfig = BabyJubjubConfig;
}

/// `A = 2(a + d)/(a - d)`, `B = 4/(a - d)`
impl MontCurveConfig for BabyJubjubConfig {
    const COEFF_A: Fq = MontFp!("168698");
    const COEFF_B: Fq = MontFp!("1");

    type TECurveConfig = BabyJubjubConfig;
}
