use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::Rng;

/// Samples the coefficients of a degree `threshold - 1` polynomial over Z/prime.
///
/// Coefficient 0 is the secret reduced modulo `prime`; every other coefficient is
/// drawn uniformly from `[0, prime)` using `rng`.
pub fn generate_polynomial<R: Rng + ?Sized>(
    secret: &BigUint,
    threshold: usize,
    prime: &BigUint,
    rng: &mut R,
) -> Vec<BigUint> {
    let mut coefficients = Vec::with_capacity(threshold.max(1));
    coefficients.push(secret % prime);
    for _ in 1..threshold {
        coefficients.push(rng.gen_biguint_below(prime));
    }
    coefficients
}

/// Evaluates `sum(coefficients[i] * x^i) mod prime`.
pub fn evaluate_polynomial(coefficients: &[BigUint], x: &BigUint, prime: &BigUint) -> BigUint {
    let mut result = BigUint::zero();

    for (power, coefficient) in coefficients.iter().enumerate() {
        let x_pow_i = x.modpow(&BigUint::from(power), prime);
        result = (result + coefficient * x_pow_i) % prime;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn constant_term_is_the_secret() {
        let mut rng = StdRng::seed_from_u64(7);
        let prime = BigUint::from(1237u32);
        let coefficients = generate_polynomial(&BigUint::from(1234u32), 4, &prime, &mut rng);

        assert_eq!(coefficients.len(), 4);
        assert_eq!(coefficients[0], BigUint::from(1234u32));
        assert!(coefficients.iter().all(|c| c < &prime));
    }

    #[test]
    fn secret_is_reduced_into_the_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let coefficients =
            generate_polynomial(&BigUint::from(30u32), 1, &BigUint::from(13u32), &mut rng);
        assert_eq!(coefficients, vec![BigUint::from(4u32)]);
    }

    #[test]
    fn same_seed_same_polynomial() {
        let prime = BigUint::from(7919u32);
        let secret = BigUint::from(42u32);
        let a = generate_polynomial(&secret, 5, &prime, &mut StdRng::seed_from_u64(99));
        let b = generate_polynomial(&secret, 5, &prime, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn evaluates_known_polynomial() {
        // f(x) = 5 + 3x + 2x^2 over Z/23
        let prime = BigUint::from(23u32);
        let coefficients: Vec<BigUint> = [5u32, 3, 2].iter().map(|c| BigUint::from(*c)).collect();

        assert_eq!(evaluate_polynomial(&coefficients, &BigUint::from(0u32), &prime), BigUint::from(5u32));
        assert_eq!(evaluate_polynomial(&coefficients, &BigUint::from(1u32), &prime), BigUint::from(10u32));
        assert_eq!(evaluate_polynomial(&coefficients, &BigUint::from(2u32), &prime), BigUint::from(19u32));
        // 5 + 12 + 32 = 49 = 3 (mod 23)
        assert_eq!(evaluate_polynomial(&coefficients, &BigUint::from(4u32), &prime), BigUint::from(3u32));
    }

    #[test]
    fn empty_polynomial_is_zero() {
        let value = evaluate_polynomial(&[], &BigUint::from(3u32), &BigUint::from(11u32));
        assert!(value.is_zero());
    }
}
