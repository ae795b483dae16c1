//! Permission and role evaluation rules.
//!
//! Two distinct grant rules coexist and must not be merged:
//!
//! - **Module wildcard**: holding the literal `MODULE:*` permission grants
//!   every action in that module.
//! - **Admin hierarchy**: holding `MODULE:ADMIN` satisfies any required
//!   permission in the same module, but only through the hierarchy-aware
//!   checks (`validate_permission_hierarchy`, `evaluate`). The plain
//!   action checks treat `ADMIN` as an ordinary action.

use serde::{Deserialize, Serialize};
use tracing::debug;

use sentra_entity::user::User;

use super::permission::Permission;

/// Outcome of an authorization evaluation, with enough context to log or
/// surface a useful denial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether access is granted.
    pub is_authorized: bool,
    /// Denial reason, when not authorized.
    pub reason: Option<String>,
    /// The permissions the check required.
    pub required_permissions: Vec<String>,
    /// The permissions the user holds.
    pub user_permissions: Vec<String>,
}

impl AccessDecision {
    fn granted(required: Vec<String>, held: Vec<String>) -> Self {
        Self {
            is_authorized: true,
            reason: None,
            required_permissions: required,
            user_permissions: held,
        }
    }

    fn denied(reason: String, required: Vec<String>, held: Vec<String>) -> Self {
        Self {
            is_authorized: false,
            reason: Some(reason),
            required_permissions: required,
            user_permissions: held,
        }
    }
}

fn to_strings(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(Permission::to_string).collect()
}

/// Roles rendered as `ROLE:<name>` so role decisions carry the same
/// shape as permission decisions.
fn role_strings<S: AsRef<str>>(roles: &[S]) -> Vec<String> {
    roles.iter().map(|r| format!("ROLE:{}", r.as_ref())).collect()
}

/// Evaluates a user's permissions and roles against requirements.
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// Creates a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Parses held permission strings into typed form.
    ///
    /// Malformed held strings are skipped: they can never match a
    /// requirement, and a single bad row must not poison the rest of the
    /// user's grants.
    fn parse_held(strings: &[String]) -> Vec<Permission> {
        strings
            .iter()
            .filter_map(|s| match s.parse::<Permission>() {
                Ok(p) => Some(p),
                Err(_) => {
                    debug!(permission = %s, "Skipping malformed permission");
                    None
                }
            })
            .collect()
    }

    fn held(&self, user: &User) -> Vec<Permission> {
        Self::parse_held(&user.permissions)
    }

    /// Exact or module-wildcard match, no hierarchy.
    fn grants(held: &Permission, required: &Permission) -> bool {
        held.module == required.module
            && (held.action == required.action || held.is_wildcard())
    }

    /// Like [`Self::grants`] plus the `MODULE:ADMIN` hierarchy rule.
    fn grants_with_hierarchy(held: &Permission, required: &Permission) -> bool {
        Self::grants(held, required)
            || (held.module == required.module && held.action == "ADMIN")
    }

    /// Checks the required permission (exact or wildcard, no hierarchy).
    pub fn check_action_permission(&self, user: &User, required: &Permission) -> AccessDecision {
        let required_strings = vec![required.to_string()];
        if self.held(user).iter().any(|h| Self::grants(h, required)) {
            AccessDecision::granted(required_strings, user.permissions.clone())
        } else {
            AccessDecision::denied(
                format!("Missing required permission: {required}"),
                required_strings,
                user.permissions.clone(),
            )
        }
    }

    /// Checks that the user holds at least one of the required permissions.
    pub fn has_any(&self, user: &User, required: &[Permission]) -> AccessDecision {
        let held = self.held(user);
        if required
            .iter()
            .any(|r| held.iter().any(|h| Self::grants(h, r)))
        {
            AccessDecision::granted(to_strings(required), user.permissions.clone())
        } else {
            AccessDecision::denied(
                format!(
                    "None of the required permissions held: {}",
                    to_strings(required).join(", ")
                ),
                to_strings(required),
                user.permissions.clone(),
            )
        }
    }

    /// Checks that the user holds every one of the required permissions.
    pub fn has_all(&self, user: &User, required: &[Permission]) -> AccessDecision {
        let held = self.held(user);
        let missing: Vec<String> = required
            .iter()
            .filter(|r| !held.iter().any(|h| Self::grants(h, r)))
            .map(Permission::to_string)
            .collect();

        if missing.is_empty() {
            AccessDecision::granted(to_strings(required), user.permissions.clone())
        } else {
            AccessDecision::denied(
                format!("Missing required permissions: {}", missing.join(", ")),
                to_strings(required),
                user.permissions.clone(),
            )
        }
    }

    /// Checks the literal module wildcard (`MODULE:*`).
    ///
    /// This is the module-access gate; it is deliberately narrower than
    /// the admin hierarchy and is not satisfied by `MODULE:ADMIN`. The
    /// decision reports the wildcard as required and the user's grants
    /// within the module as held.
    pub fn check_module_access(&self, user: &User, module: &str) -> AccessDecision {
        let wildcard = Permission::new(module, "*");
        let prefix = format!("{}:", wildcard.module);
        let in_module: Vec<String> = user
            .permissions
            .iter()
            .filter(|p| p.to_uppercase().starts_with(&prefix))
            .cloned()
            .collect();

        if self.held(user).iter().any(|h| *h == wildcard) {
            AccessDecision::granted(vec![wildcard.to_string()], in_module)
        } else {
            AccessDecision::denied(
                format!("Missing module access: {wildcard}"),
                vec![wildcard.to_string()],
                in_module,
            )
        }
    }

    /// Checks the required permission, honoring the `MODULE:ADMIN`
    /// hierarchy.
    pub fn validate_permission_hierarchy(&self, user: &User, required: &Permission) -> AccessDecision {
        let required_strings = vec![required.to_string()];
        if self
            .held(user)
            .iter()
            .any(|h| Self::grants_with_hierarchy(h, required))
        {
            AccessDecision::granted(required_strings, user.permissions.clone())
        } else {
            AccessDecision::denied(
                format!("Missing required permission: {required}"),
                required_strings,
                user.permissions.clone(),
            )
        }
    }

    /// Checks that the user carries the role, compared verbatim.
    pub fn check_role(&self, user: &User, role: &str) -> AccessDecision {
        self.check_roles_held(&user.roles, &[role])
    }

    /// Checks that the user carries any of the roles.
    pub fn check_any_role(&self, user: &User, roles: &[&str]) -> AccessDecision {
        self.check_roles_held(&user.roles, roles)
    }

    /// Like [`Self::check_any_role`] but over raw role strings, for
    /// callers holding token claims rather than a loaded user record.
    /// Roles appear in the decision as `ROLE:<name>`.
    pub fn check_roles_held(&self, held_roles: &[String], roles: &[&str]) -> AccessDecision {
        let required = role_strings(roles);
        let held = role_strings(held_roles);
        if roles
            .iter()
            .any(|role| held_roles.iter().any(|r| r.as_str() == *role))
        {
            AccessDecision::granted(required, held)
        } else {
            AccessDecision::denied(
                format!("Missing required role: {}", required.join(", ")),
                required,
                held,
            )
        }
    }

    /// Hierarchy-aware check of every required permission, producing a
    /// decision that names the missing grants on denial.
    pub fn evaluate(&self, user: &User, required: &[Permission]) -> AccessDecision {
        self.evaluate_held(&user.permissions, required)
    }

    /// Like [`Self::evaluate`] but over raw permission strings, for
    /// callers holding token claims rather than a loaded user record.
    pub fn evaluate_held(&self, held_strings: &[String], required: &[Permission]) -> AccessDecision {
        let held = Self::parse_held(held_strings);
        let missing: Vec<String> = required
            .iter()
            .filter(|r| !held.iter().any(|h| Self::grants_with_hierarchy(h, r)))
            .map(Permission::to_string)
            .collect();

        if missing.is_empty() {
            AccessDecision::granted(to_strings(required), held_strings.to_vec())
        } else {
            AccessDecision::denied(
                format!("Missing required permissions: {}", missing.join(", ")),
                to_strings(required),
                held_strings.to_vec(),
            )
        }
    }
}
