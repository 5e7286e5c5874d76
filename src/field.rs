use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Result, SssError};

/// Deterministic primality test by trial division over the 6k±1 wheel.
pub fn is_prime(n: &BigUint) -> bool {
    if let Some(small) = n.to_u64() {
        return is_prime_u64(small);
    }

    if (n % 2u32).is_zero() || (n % 3u32).is_zero() {
        return false;
    }

    let mut i = BigUint::from(5u32);
    let mut step = 2u32;
    while &i * &i <= *n {
        if (n % &i).is_zero() {
            return false;
        }
        i += step;
        step = 6 - step;
    }
    true
}

fn is_prime_u64(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5u64;
    let mut step = 2u64;
    // i <= n / i keeps i * i from overflowing near u64::MAX
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += step;
        step = 6 - step;
    }
    true
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: &BigUint) -> BigUint {
    let mut candidate = n + 1u32;
    while !is_prime(&candidate) {
        candidate += 1u32;
    }
    candidate
}

/// Returns `(g, x, y)` such that `a * x + b * y == g == gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Multiplicative inverse of `a` modulo `prime`, normalized into `[0, prime)`.
pub fn mod_inverse(a: &BigUint, prime: &BigUint) -> Result<BigUint> {
    let modulus = BigInt::from_biguint(Sign::Plus, prime.clone());
    let value = BigInt::from_biguint(Sign::Plus, a.clone());

    let (g, x, _) = extended_gcd(&value, &modulus);
    if !g.is_one() {
        return Err(SssError::NoModularInverse {
            value: a.clone(),
            modulus: prime.clone(),
        });
    }

    // mod_floor never goes negative for a positive modulus
    x.mod_floor(&modulus)
        .to_biguint()
        .ok_or_else(|| SssError::NoModularInverse {
            value: a.clone(),
            modulus: prime.clone(),
        })
}
