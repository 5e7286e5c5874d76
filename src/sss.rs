use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SssError};
use crate::field::{is_prime, next_prime};
use crate::polynomial::{evaluate_polynomial, generate_polynomial};

/// One point `(index, value)` on the sharing polynomial. Index 0 is never issued.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Share {
    pub index: usize,
    #[serde(with = "decimal")]
    pub value: BigUint,
}

impl Share {
    pub fn new(index: usize, value: BigUint) -> Self {
        Self { index, value }
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index, self.value)
    }
}

impl FromStr for Share {
    type Err = SssError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || SssError::MalformedShare(s.to_string());

        let mut fields = s.split_whitespace();
        let (Some(index), Some(value), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };

        Ok(Share {
            index: index.parse().map_err(|_| malformed())?,
            value: value.parse().map_err(|_| malformed())?,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ShamirSecretSharing {
    pub threshold: usize,   //k
    pub share_count: usize, //n
}

impl ShamirSecretSharing {
    pub fn new(threshold: usize, share_count: usize) -> Result<Self> {
        if threshold == 0 || threshold > share_count {
            return Err(SssError::InvalidThreshold {
                threshold,
                share_count,
            });
        }
        Ok(Self {
            threshold,
            share_count,
        })
    }
}

/// The artifact produced by a split: the modulus and every share must travel together.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SharedSecret {
    #[serde(with = "decimal")]
    pub prime: BigUint,
    pub shares: Vec<Share>,
}

// Field elements travel as decimal strings in JSON.
mod decimal {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let digits = String::deserialize(deserializer)?;
        digits.parse().map_err(D::Error::custom)
    }
}

/// Splits `secret` into `n` shares, any `k` of which recover it. Uses the OS CSPRNG.
///
/// The modulus is found by exact trial division, so runtime grows with the square
/// root of the prime. Secrets that fit in a `u64` finish quickly; much wider ones
/// do not finish in practice.
pub fn split_secret(secret: &BigUint, n: usize, k: usize) -> Result<SharedSecret> {
    split_secret_with_rng(secret, n, k, &mut OsRng)
}

/// Like [`split_secret`], drawing polynomial coefficients from `rng`.
pub fn split_secret_with_rng<R: Rng + ?Sized>(
    secret: &BigUint,
    n: usize,
    k: usize,
    rng: &mut R,
) -> Result<SharedSecret> {
    let params = ShamirSecretSharing::new(k, n)?;

    let share_count = BigUint::from(n);
    let prime = next_prime(std::cmp::max(secret, &share_count));
    ensure_modulus_fits(secret, n, &prime)?;

    Ok(deal(secret, params, prime, rng))
}

/// Splits over a caller-chosen modulus, which must be prime and exceed both `secret` and `n`.
///
/// `prime` is verified with the same trial division as [`split_secret`], so the cost
/// grows with its square root as well.
pub fn split_secret_with_prime<R: Rng + ?Sized>(
    secret: &BigUint,
    n: usize,
    k: usize,
    prime: BigUint,
    rng: &mut R,
) -> Result<SharedSecret> {
    let params = ShamirSecretSharing::new(k, n)?;
    ensure_modulus_fits(secret, n, &prime)?;
    if !is_prime(&prime) {
        return Err(SssError::CompositeModulus(prime));
    }

    Ok(deal(secret, params, prime, rng))
}

fn ensure_modulus_fits(secret: &BigUint, n: usize, prime: &BigUint) -> Result<()> {
    if prime <= secret || *prime <= BigUint::from(n) {
        return Err(SssError::ModulusTooSmall {
            modulus: prime.clone(),
        });
    }
    Ok(())
}

fn deal<R: Rng + ?Sized>(
    secret: &BigUint,
    params: ShamirSecretSharing,
    prime: BigUint,
    rng: &mut R,
) -> SharedSecret {
    debug!(
        threshold = params.threshold,
        share_count = params.share_count,
        modulus_bits = prime.bits(),
        "splitting secret"
    );

    let polynomial = generate_polynomial(secret, params.threshold, &prime, rng);

    let shares = (1..=params.share_count)
        .map(|i| Share {
            index: i,
            value: evaluate_polynomial(&polynomial, &BigUint::from(i), &prime),
        })
        .collect::<Vec<_>>();

    SharedSecret { prime, shares }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rejects_threshold_above_share_count() {
        let err = split_secret(&BigUint::from(42u32), 3, 5).unwrap_err();
        assert!(matches!(
            err,
            SssError::InvalidThreshold {
                threshold: 5,
                share_count: 3
            }
        ));
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = split_secret(&BigUint::from(42u32), 3, 0).unwrap_err();
        assert!(matches!(err, SssError::InvalidThreshold { .. }));
    }

    #[test]
    fn emits_indices_one_through_n() {
        let mut rng = StdRng::seed_from_u64(1);
        let dealt = split_secret_with_rng(&BigUint::from(1234u32), 5, 3, &mut rng).unwrap();

        assert_eq!(dealt.prime, BigUint::from(1237u32));
        let indices: Vec<usize> = dealt.shares.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(dealt.shares.iter().all(|s| s.value < dealt.prime));
    }

    #[test]
    fn modulus_exceeds_share_count_for_small_secrets() {
        let mut rng = StdRng::seed_from_u64(2);
        let dealt = split_secret_with_rng(&BigUint::from(3u32), 20, 4, &mut rng).unwrap();
        assert_eq!(dealt.prime, BigUint::from(23u32));
    }

    #[test]
    fn threshold_one_hands_out_the_secret() {
        let mut rng = StdRng::seed_from_u64(3);
        let dealt = split_secret_with_rng(&BigUint::from(99u32), 4, 1, &mut rng).unwrap();
        assert!(dealt.shares.iter().all(|s| s.value == BigUint::from(99u32)));
    }

    #[test]
    fn caller_modulus_is_checked() {
        let mut rng = StdRng::seed_from_u64(4);
        let secret = BigUint::from(100u32);

        let err = split_secret_with_prime(&secret, 5, 3, BigUint::from(97u32), &mut rng).unwrap_err();
        assert!(matches!(err, SssError::ModulusTooSmall { .. }));

        let err = split_secret_with_prime(&secret, 5, 3, BigUint::from(121u32), &mut rng).unwrap_err();
        assert!(matches!(err, SssError::CompositeModulus(_)));

        let dealt = split_secret_with_prime(&secret, 5, 3, BigUint::from(7919u32), &mut rng).unwrap();
        assert_eq!(dealt.prime, BigUint::from(7919u32));
        assert_eq!(dealt.shares.len(), 5);
    }

    #[test]
    fn share_line_format() {
        let share: Share = "3 1021".parse().unwrap();
        assert_eq!(share, Share::new(3, BigUint::from(1021u32)));
        assert_eq!(share.to_string(), "3 1021");

        let padded: Share = "  7\t 12 ".parse().unwrap();
        assert_eq!(padded, Share::new(7, BigUint::from(12u32)));
    }

    #[test]
    fn malformed_share_lines() {
        for line in ["", "3", "3 x", "-1 4", "1 2 3"] {
            let err = line.parse::<Share>().unwrap_err();
            assert!(matches!(err, SssError::MalformedShare(_)), "{line:?}");
        }
    }

    #[test]
    fn shared_secret_json_shape() {
        let dealt = SharedSecret {
            prime: BigUint::from(13u32),
            shares: vec![Share::new(1, BigUint::from(5u32))],
        };
        let json = serde_json::to_string(&dealt).unwrap();
        assert_eq!(json, r#"{"prime":"13","shares":[{"index":1,"value":"5"}]}"#);
        let back: SharedSecret = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dealt);
    }
}
