use argon2::password_hash::Output;
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::AuthError;

pub const SALT_LEN: usize = 16;

/// Password hashing seam. Hashes and salts travel as standard base64.
pub trait SecurityService: Send + Sync {
    /// Returns `(hash, salt)`.
    fn hash_password(&self, password: &str) -> Result<(String, String), AuthError>;

    /// False for blank input, undecodable base64 or a mismatch.
    fn verify_password(&self, password: &str, stored_hash: &str, stored_salt: &str) -> bool;
}

/// Raw Argon2id over a caller-supplied salt.
#[derive(Debug, Clone)]
pub struct Argon2SecurityService {
    params: Params,
}

impl Argon2SecurityService {
    pub fn new(cfg: &configs::Argon2Config) -> Result<Self, AuthError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, Some(cfg.hash_len))
            .map_err(|e| AuthError::Config(e.to_string()))?;
        Ok(Self { params })
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, AuthError> {
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let mut out = vec![0u8; self.params.output_len().unwrap_or(Params::DEFAULT_OUTPUT_LEN)];
        argon
            .hash_password_into(password, salt, &mut out)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(out)
    }
}

impl SecurityService for Argon2SecurityService {
    fn hash_password(&self, password: &str) -> Result<(String, String), AuthError> {
        if password.trim().is_empty() {
            return Err(AuthError::Hash("password must not be empty".into()));
        }
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let hash = self.derive(password.as_bytes(), &salt)?;
        Ok((STANDARD.encode(hash), STANDARD.encode(salt)))
    }

    fn verify_password(&self, password: &str, stored_hash: &str, stored_salt: &str) -> bool {
        if password.trim().is_empty() || stored_hash.trim().is_empty() || stored_salt.trim().is_empty() {
            return false;
        }
        let (Ok(salt), Ok(expected)) = (STANDARD.decode(stored_salt), STANDARD.decode(stored_hash)) else {
            return false;
        };
        let Ok(actual) = self.derive(password.as_bytes(), &salt) else {
            return false;
        };
        if actual.len() != expected.len() {
            return false;
        }
        // Output equality is constant time
        match (Output::new(&actual), Output::new(&expected)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fast_argon2 as fast_params;

    #[test]
    fn hash_then_verify() {
        let svc = Argon2SecurityService::new(&fast_params()).expect("params");
        let (hash, salt) = svc.hash_password("S3cure!pass").expect("hash");
        assert_eq!(STANDARD.decode(&salt).expect("salt").len(), SALT_LEN);
        assert_eq!(STANDARD.decode(&hash).expect("hash").len(), 32);
        assert!(svc.verify_password("S3cure!pass", &hash, &salt));
        assert!(!svc.verify_password("s3cure!pass", &hash, &salt));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let svc = Argon2SecurityService::new(&fast_params()).expect("params");
        let (h1, s1) = svc.hash_password("same").expect("hash");
        let (h2, s2) = svc.hash_password("same").expect("hash");
        assert_ne!(s1, s2);
        assert_ne!(h1, h2);
    }

    #[test]
    fn malformed_or_blank_input_never_verifies() {
        let svc = Argon2SecurityService::new(&fast_params()).expect("params");
        let (hash, salt) = svc.hash_password("pw").expect("hash");
        assert!(!svc.verify_password("", &hash, &salt));
        assert!(!svc.verify_password("pw", "", &salt));
        assert!(!svc.verify_password("pw", &hash, "not base64!!"));
        assert!(!svc.verify_password("pw", &STANDARD.encode([0u8; 16]), &salt));
        assert!(svc.hash_password("   ").is_err());
    }

    #[test]
    fn invalid_params_are_a_config_error() {
        let cfg = configs::Argon2Config { memory_kib: 1, ..fast_params() };
        assert!(matches!(Argon2SecurityService::new(&cfg), Err(AuthError::Config(_))));
    }
}
