use bcrypt::{hash, verify, DEFAULT_COST};

use crate::errors::ApiError;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST).map_err(|err| {
        log::error!("password hashing failed: {:?}", err);
        ApiError::Internal
    })
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, ApiError> {
    verify(password, hashed).map_err(|err| {
        log::error!("password verification failed: {:?}", err);
        ApiError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash_password("hunter2").unwrap();
        assert_ne!(hashed, "hunter2");
        assert!(verify_password("hunter2", &hashed).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &hashed).unwrap());
    }
}
