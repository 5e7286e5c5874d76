use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::trace;

use crate::error::{Result, SssError};
use crate::field::mod_inverse;
use crate::sss::Share;

/// Recovers the secret by Lagrange interpolation of `shares` at x = 0 over Z/prime.
///
/// The share count is not checked against the threshold used at split time. Fewer
/// shares than the threshold, or shares from different splits, produce a wrong
/// value without an error; callers must enforce the quorum themselves.
///
/// Fails with [`SssError::EmptyShareSet`] on empty input and with
/// [`SssError::NoModularInverse`] when two shares carry the same index or the
/// modulus is not prime. A modulus below 2 is reported as
/// [`SssError::CompositeModulus`].
pub fn restore_secret(shares: &[Share], prime: &BigUint) -> Result<BigUint> {
    if shares.is_empty() {
        return Err(SssError::EmptyShareSet);
    }
    if *prime <= BigUint::one() {
        return Err(SssError::CompositeModulus(prime.clone()));
    }
    trace!(share_count = shares.len(), "interpolating at zero");

    let points: Vec<BigUint> = shares.iter().map(|share| BigUint::from(share.index) % prime).collect();

    let mut secret = BigUint::zero();
    for (j, share) in shares.iter().enumerate() {
        let coefficient = lagrange_coefficient_at_zero(&points, j, prime)?;
        secret = (prime + secret + &share.value * coefficient) % prime;
    }

    Ok(secret)
}

/// L_j(0) = prod(-x_m) / prod(x_j - x_m) over every m != j, mod prime.
///
/// `points` must already be reduced modulo `prime`. Each difference adds `prime`
/// before reducing so the unsigned arithmetic never underflows.
fn lagrange_coefficient_at_zero(points: &[BigUint], j: usize, prime: &BigUint) -> Result<BigUint> {
    let xj = &points[j];
    let mut numerator = BigUint::one();
    let mut denominator = BigUint::one();

    for (m, xm) in points.iter().enumerate() {
        if m == j {
            continue;
        }
        numerator = (numerator * ((prime - xm) % prime)) % prime;
        denominator = (denominator * ((prime + xj - xm) % prime)) % prime;
    }

    Ok((numerator * mod_inverse(&denominator, prime)?) % prime)
}
