use ark_std::rand::{rngs::StdRng, SeedableRng};
use babyjub_elgamal::{BabyJubjubParameters, Keypair, LookupTable};
use std::sync::OnceLock;

pub use ark_ed_on_bn254::{Fq, Fr};
pub use babyjub_elgamal::BabyJubjubConfig;

#[macro_use]
pub mod serialization;

/// Table size used across tests, small enough to build in well under a second and leaves
/// 2^16 baby steps per decode
pub const TEST_PRECOMPUTE_SIZE: u8 = 16;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0u64)
}

pub fn params() -> BabyJubjubParameters {
    BabyJubjubParameters::default()
}

pub fn keypair(rng: &mut StdRng) -> Keypair<BabyJubjubConfig> {
    Keypair::generate(rng, &params())
}

/// Built once per test binary and shared between tests
pub fn lookup_table() -> &'static LookupTable<Fq> {
    static TABLE: OnceLock<LookupTable<Fq>> = OnceLock::new();
    TABLE.get_or_init(|| {
        babyjub_elgamal::precompute(&params(), TEST_PRECOMPUTE_SIZE)
            .expect("test precompute size is valid")
    })
}
