//! Caller identification and role checks.
//!
//! Requests carry `Authorization: Bearer <token>`. A [`CredentialVerifier`]
//! maps the token to an employee id, and [`current_employee`] loads that
//! employee and checks their role.

use std::collections::HashMap;
use std::sync::RwLock;

use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Role};
use crate::store::EmployeeRepository;

use super::state::AppState;

/// Maps bearer tokens to employee ids.
pub trait CredentialVerifier: Send + Sync {
    /// Returns the employee id the token belongs to, if any.
    fn verify(&self, token: &str) -> Option<String>;

    /// Issues a new token for `employee_id`.
    fn issue(&self, employee_id: &str) -> EngineResult<String>;
}

/// Tokens loaded from configuration plus those issued at registration.
#[derive(Debug, Default)]
pub struct TokenTable {
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenTable {
    /// Creates a table from `token -> employee id` pairs.
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl CredentialVerifier for TokenTable {
    fn verify(&self, token: &str) -> Option<String> {
        match self.tokens.read() {
            Ok(tokens) => tokens.get(token).cloned(),
            Err(poisoned) => poisoned.into_inner().get(token).cloned(),
        }
    }

    fn issue(&self, employee_id: &str) -> EngineResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens
            .write()
            .map_err(|e| EngineError::StoreUnavailable {
                message: format!("Failed to lock token table: {}", e),
            })?
            .insert(token.clone(), employee_id.to_string());
        Ok(token)
    }
}

fn bearer_token(headers: &HeaderMap) -> EngineResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| unauthenticated("missing bearer token"))?
        .to_str()
        .map_err(|_| unauthenticated("malformed authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthenticated("missing bearer token"))
}

fn unauthenticated(reason: &str) -> EngineError {
    EngineError::Unauthenticated {
        reason: reason.to_string(),
    }
}

/// Identifies the caller and checks their role.
///
/// `roles` of `None` admits any active employee.
///
/// # Errors
///
/// - `Unauthenticated` if the token is missing or unknown, or the employee
///   does not exist or is deactivated
/// - `Unauthorized` if the employee's role is not in `roles`
pub fn current_employee(
    state: &AppState,
    headers: &HeaderMap,
    roles: Option<&[Role]>,
) -> EngineResult<Employee> {
    let token = bearer_token(headers)?;
    let employee_id = state
        .credentials()
        .verify(token)
        .ok_or_else(|| unauthenticated("unknown token"))?;

    let employee = state
        .store()
        .find_employee(&employee_id)?
        .filter(|e| e.is_active)
        .ok_or_else(|| unauthenticated("account not found or inactive"))?;

    if let Some(roles) = roles {
        if !employee.has_role(roles) {
            return Err(EngineError::Unauthorized {
                role: employee.role.as_str().to_string(),
            });
        }
    }
    Ok(employee)
}

/// Checks that `caller` may act on `employee_id`'s records: either it is
/// their own, or the caller holds one of `roles`.
pub fn ensure_self_or(caller: &Employee, employee_id: &str, roles: &[Role]) -> EngineResult<()> {
    if caller.id == employee_id || caller.has_role(roles) {
        Ok(())
    } else {
        Err(EngineError::Unauthorized {
            role: caller.role.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, EngineConfig};
    use crate::models::{REVIEWER_ROLES, fixtures::employee};
    use axum::http::HeaderValue;

    fn state() -> AppState {
        let mut config = EngineConfig::default();
        let mut former = employee("EMP20240003", Role::Employee);
        former.is_active = false;
        config.seed.employees = vec![
            employee("EMP20240001", Role::Employee),
            employee("EMP20240002", Role::Manager),
            former,
        ];
        config.seed.tokens = HashMap::from([
            ("staff-token".to_string(), "EMP20240001".to_string()),
            ("manager-token".to_string(), "EMP20240002".to_string()),
            ("former-token".to_string(), "EMP20240003".to_string()),
            ("ghost-token".to_string(), "EMP20249999".to_string()),
        ]);
        AppState::new(ConfigLoader::from_config(config).unwrap()).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_token_identifies_employee() {
        let caller = current_employee(&state(), &headers("Bearer staff-token"), None).unwrap();
        assert_eq!(caller.id, "EMP20240001");
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let result = current_employee(&state(), &HeaderMap::new(), None);
        assert!(matches!(result, Err(EngineError::Unauthenticated { .. })));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthenticated() {
        let result = current_employee(&state(), &headers("Basic staff-token"), None);
        assert!(matches!(result, Err(EngineError::Unauthenticated { .. })));
    }

    #[test]
    fn test_unknown_token_and_missing_employee_are_unauthenticated() {
        let state = state();
        for token in ["Bearer nope", "Bearer ghost-token", "Bearer former-token"] {
            let result = current_employee(&state, &headers(token), None);
            assert!(matches!(result, Err(EngineError::Unauthenticated { .. })));
        }
    }

    #[test]
    fn test_role_outside_allowed_set_is_unauthorized() {
        let result = current_employee(&state(), &headers("Bearer staff-token"), Some(REVIEWER_ROLES));
        assert!(matches!(
            result,
            Err(EngineError::Unauthorized { role }) if role == "employee"
        ));
        assert!(
            current_employee(&state(), &headers("Bearer manager-token"), Some(REVIEWER_ROLES))
                .is_ok()
        );
    }

    #[test]
    fn test_issued_token_authenticates() {
        let state = state();
        let token = state.credentials().issue("EMP20240002").unwrap();
        assert_eq!(state.credentials().verify(&token).as_deref(), Some("EMP20240002"));

        let caller =
            current_employee(&state, &headers(&format!("Bearer {}", token)), None).unwrap();
        assert_eq!(caller.id, "EMP20240002");
        assert_ne!(state.credentials().issue("EMP20240002").unwrap(), token);
    }

    #[test]
    fn test_ensure_self_or() {
        let staff = employee("EMP20240001", Role::Employee);
        let manager = employee("EMP20240002", Role::Manager);
        assert!(ensure_self_or(&staff, "EMP20240001", REVIEWER_ROLES).is_ok());
        assert!(ensure_self_or(&staff, "EMP20240002", REVIEWER_ROLES).is_err());
        assert!(ensure_self_or(&manager, "EMP20240001", REVIEWER_ROLES).is_ok());
    }
}
