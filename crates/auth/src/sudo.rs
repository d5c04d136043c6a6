//! Shared-secret gate for destructive maintenance routes.

use crate::AuthError;

#[derive(Clone, Default)]
pub struct SudoGate {
    secret: Option<String>,
}

impl SudoGate {
    /// A blank secret counts as unconfigured, which denies every request.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|secret| !secret.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn authorize(&self, provided: Option<&str>) -> Result<(), AuthError> {
        match (self.secret.as_deref(), provided) {
            (Some(expected), Some(provided)) if constant_time_eq(expected, provided) => Ok(()),
            _ => Err(AuthError::SudoOnly),
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secret_passes() {
        let gate = SudoGate::new(Some("letmein".into()));
        assert!(gate.authorize(Some("letmein")).is_ok());
    }

    #[test]
    fn wrong_or_missing_secret_is_refused() {
        let gate = SudoGate::new(Some("letmein".into()));
        assert!(matches!(gate.authorize(Some("letmeout")), Err(AuthError::SudoOnly)));
        assert!(matches!(gate.authorize(Some("letmei")), Err(AuthError::SudoOnly)));
        assert!(matches!(gate.authorize(None), Err(AuthError::SudoOnly)));
    }

    #[test]
    fn unconfigured_gate_refuses_everything() {
        let gate = SudoGate::new(Some("   ".into()));
        assert!(!gate.is_configured());
        assert!(gate.authorize(Some("   ")).is_err());
        assert!(SudoGate::default().authorize(Some("")).is_err());
    }
}
