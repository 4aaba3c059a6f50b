use rand::Rng;

pub const CODE_LENGTH: usize = 20;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Human readable receipt code. Not a secret; uniqueness is enforced by the
/// `reservations.reservation_code` constraint, not here.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn codes_are_twenty_uppercase_alphanumerics() {
        for _ in 0..500 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert!(is_valid_code(&code));
        }
    }

    #[test]
    fn seeded_generator_is_deterministic() {
        let a = generate_code_with(&mut StdRng::seed_from_u64(42));
        let b = generate_code_with(&mut StdRng::seed_from_u64(42));
        let c = generate_code_with(&mut StdRng::seed_from_u64(43));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn every_symbol_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 36];

        for _ in 0..200 {
            for b in generate_code_with(&mut rng).bytes() {
                let idx = ALPHABET.iter().position(|&x| x == b).unwrap();
                seen[idx] = true;
            }
        }

        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn validator_rejects_bad_codes() {
        assert!(!is_valid_code("SHORT"));
        assert!(!is_valid_code("abcdefghij0123456789"));
        assert!(!is_valid_code("ABCDEFGHIJ012345678-"));
        assert!(is_valid_code("ABCDEFGHIJ0123456789"));
    }
}
