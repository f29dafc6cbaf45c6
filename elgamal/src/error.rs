use alloc::string::String;
use ark_std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElGamalError {
    /// A value does not fit in the fixed bit width of its domain. Holds the value and the width.
    DomainRange(u128, u32),
    /// The public key is the identity point
    PublicKeyIsIdentity,
    /// The public key does not satisfy the curve equation
    PublicKeyNotOnCurve,
    /// The baby step search ran through its whole range without hitting the table
    DiscreteLogNotFound,
    InvalidPrecomputeSize(u8),
    /// Base point is the identity, off the curve or outside the prime order subgroup
    InvalidBasePoint,
    /// Bit size of a subgroup order that does not fit in the 256 bit values keys are sampled from
    SubgroupOrderTooLarge(u32),
    InvalidDecimal(String),
    InvalidHex(String),
}

impl ElGamalError {
    pub fn is_domain_range(&self) -> bool {
        matches!(self, Self::DomainRange(..))
    }

    pub fn is_invalid_public_key(&self) -> bool {
        matches!(self, Self::PublicKeyIsIdentity | Self::PublicKeyNotOnCurve)
    }
}

impl Display for ElGamalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomainRange(v, bits) => write!(f, "value {} does not fit in {} bits", v, bits),
            Self::PublicKeyIsIdentity => write!(f, "public key is the identity point"),
            Self::PublicKeyNotOnCurve => write!(f, "public key is not on the curve"),
            Self::DiscreteLogNotFound => {
                write!(f, "discrete log not found in the search range")
            }
            Self::InvalidPrecomputeSize(s) => {
                write!(f, "precompute size {} is outside [0, 32]", s)
            }
            Self::InvalidBasePoint => write!(f, "base point is not a prime order curve point"),
            Self::SubgroupOrderTooLarge(bits) => {
                write!(f, "subgroup order of {} bits exceeds 256 bits", bits)
            }
            Self::InvalidDecimal(s) => write!(f, "invalid decimal field element: {:?}", s),
            Self::InvalidHex(s) => write!(f, "invalid hex table index: {:?}", s),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ElGamalError {}
