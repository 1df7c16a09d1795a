//! Salted Argon2id password verifiers.
//!
//! A verifier is `(salt, hash)`: the salt is random per record and not secret,
//! the hash is derived from the password and that salt. Nothing here is reversible
//! and no key material lives outside the record.

use crate::config::HashingConfig;
use crate::error::StorageError;
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

pub const SALT_LEN: usize = 16;
pub const HASH_LEN: usize = 32;

/// Verifier used when the looked-up user does not exist, so that path costs one derivation too.
const ABSENT: Credential = Credential {
    salt: [0u8; SALT_LEN],
    hash: [0u8; HASH_LEN],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: [u8; SALT_LEN],
    pub hash: [u8; HASH_LEN],
}

impl Credential {
    /// Rebuild a verifier from stored columns, checking their lengths.
    pub fn from_parts(salt: &[u8], hash: &[u8]) -> Result<Self, &'static str> {
        let salt = <[u8; SALT_LEN]>::try_from(salt).map_err(|_| "salt has wrong length")?;
        let hash = <[u8; HASH_LEN]>::try_from(hash).map_err(|_| "hash has wrong length")?;
        Ok(Self { salt, hash })
    }
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cfg: &HashingConfig) -> Result<Self, StorageError> {
        let params = Params::new(
            cfg.memory_kib,
            cfg.iterations,
            cfg.parallelism,
            Some(HASH_LEN),
        )
        .map_err(StorageError::hashing)?;
        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    fn hash_with_salt(
        &self,
        password: &str,
        salt: &[u8; SALT_LEN],
    ) -> Result<[u8; HASH_LEN], StorageError> {
        let mut out = [0u8; HASH_LEN];
        self.argon
            .hash_password_into(password.as_bytes(), salt, &mut out)
            .map_err(StorageError::hashing)?;
        Ok(out)
    }

    /// New verifier with a fresh random salt.
    pub fn derive(&self, password: &str) -> Result<Credential, StorageError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let hash = self.hash_with_salt(password, &salt)?;
        Ok(Credential { salt, hash })
    }

    /// Recompute with the stored salt and compare in constant time.
    pub fn verify(&self, password: &str, credential: &Credential) -> Result<bool, StorageError> {
        let computed = self.hash_with_salt(password, &credential.salt)?;
        Ok(bool::from(computed[..].ct_eq(&credential.hash[..])))
    }

    /// Verify against `credential`, or burn one derivation and report `false` when there is none.
    pub fn verify_or_reject(
        &self,
        password: &str,
        credential: Option<&Credential>,
    ) -> Result<bool, StorageError> {
        match credential {
            Some(c) => self.verify(password, c),
            None => {
                self.verify(password, &ABSENT)?;
                Ok(false)
            }
        }
    }

    /// [`derive`](Self::derive) on the blocking pool.
    pub async fn derive_blocking(&self, password: String) -> Result<Credential, StorageError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.derive(&password)).await?
    }

    /// [`verify_or_reject`](Self::verify_or_reject) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        credential: Option<Credential>,
    ) -> Result<bool, StorageError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_or_reject(&password, credential.as_ref()))
            .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn verifies_own_password_only() {
        let hasher = cheap();
        let cred = hasher.derive("s3cr3t").unwrap();
        assert!(hasher.verify("s3cr3t", &cred).unwrap());
        assert!(!hasher.verify("S3cr3t", &cred).unwrap());
        assert!(!hasher.verify("", &cred).unwrap());
    }

    #[test]
    fn salts_differ_per_derivation() {
        let hasher = cheap();
        let a = hasher.derive("same").unwrap();
        let b = hasher.derive("same").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn deterministic_for_fixed_salt() {
        let hasher = cheap();
        let salt = [7u8; SALT_LEN];
        let h1 = hasher.hash_with_salt("pw", &salt).unwrap();
        let h2 = hasher.hash_with_salt("pw", &salt).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn absent_credential_is_rejected() {
        let hasher = cheap();
        assert!(!hasher.verify_or_reject("anything", None).unwrap());
    }

    fn fastest_of<F: FnMut()>(runs: usize, mut f: F) -> std::time::Duration {
        (0..runs)
            .map(|_| {
                let start = std::time::Instant::now();
                f();
                start.elapsed()
            })
            .min()
            .unwrap()
    }

    #[test]
    fn absent_credential_costs_a_full_derivation() {
        let hasher = PasswordHasher::new(&HashingConfig {
            memory_kib: 8 * 1024,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let cred = hasher.derive("right").unwrap();

        let wrong = fastest_of(3, || assert!(!hasher.verify("wrong", &cred).unwrap()));
        let absent = fastest_of(3, || {
            assert!(!hasher.verify_or_reject("wrong", None).unwrap())
        });

        assert!(wrong >= std::time::Duration::from_millis(1), "{wrong:?}");
        assert!(absent * 4 >= wrong, "absent {absent:?} vs wrong {wrong:?}");
    }

    #[test]
    fn from_parts_checks_lengths() {
        assert!(Credential::from_parts(&[0u8; SALT_LEN], &[0u8; HASH_LEN]).is_ok());
        assert!(Credential::from_parts(&[0u8; 8], &[0u8; HASH_LEN]).is_err());
        assert!(Credential::from_parts(&[0u8; SALT_LEN], &[]).is_err());
    }

    #[test]
    fn invalid_params_are_reported() {
        let err = PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(err, Err(StorageError::Hashing(_))));
    }
}
