#![cfg_attr(not(feature = "std"), no_std)]

//! # Exponential ElGamal over BabyJubjub
//!
//! Public key encryption of bounded integers whose host arithmetic mirrors the circom gadgets that
//! re-check it inside a proof:
//!
//! 1. [`curve`]: BabyJubjub in circomlib's coordinates. [`params`]: the curve description
//!    (coefficients from the curve config, base point and the 512-bit hash used for key derivation)
//!    as one explicit value.
//! 2. [`keys`]: rejection sampled secret keys and the EdDSA style hash-and-clamp that turns them into
//!    the scalar actually used for multiplication.
//! 3. [`codec`]: `m -> m * G` for `m < 2^32` and back, the inverse being a baby-step giant-step search
//!    over a precomputed [`LookupTable`].
//! 4. [`cipher`]: encryption, decryption, rerandomization and homomorphic addition of ciphertexts.
//! 5. [`marshal`]: conversion of points and scalars to and from decimal strings for witness generation.
//!
//! All operations are generic over the twisted Edwards curve so any `TECurveConfig` can be injected
//! through [`CurveParameters`], [`BabyJubjubParameters`] being the production choice.

extern crate alloc;

pub mod cipher;
pub mod codec;
pub mod curve;
pub mod error;
pub mod keys;
pub mod marshal;
pub mod params;
pub mod serde_utils;

pub use cipher::{decrypt, Ciphertext, Nonce};
pub use codec::{compose64, decode, encode, precompute, precompute_range, split64, LookupTable};
pub use curve::BabyJubjubConfig;
pub use error::ElGamalError;
pub use keys::{format_secret_key, FormattedSecretKey, Keypair, PublicKey, SecretKey};
pub use params::{BabyJubjubParameters, CurveParameters};

pub type Result<T> = core::result::Result<T, ElGamalError>;
