//! Named role policies and the policy evaluator.
//!
//! Policies are data: each names an explicit set of acceptable roles, and
//! a request is allowed iff the token's role set intersects it. There is
//! no runtime hierarchy computation; hierarchy falls out of the tables
//! themselves, because each higher-privilege policy's set is a superset
//! of the one below it.
//!
//! Signature and expiry checks are a precondition: an expired or
//! malformed token denies unconditionally and never reaches policy
//! evaluation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::token::jwt::SessionTokenClaims;
use crate::token::TokenIssuer;
use crate::types::Role;
use crate::AuthResult;

/// A named, pre-defined set of roles sufficient to authorize an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Top-authority operations only.
    RootOnly,
    /// Administrative operations.
    AdminOnly,
    /// Security-chief operations.
    SecurityChiefOnly,
    /// Security management and above.
    SecurityManagement,
    /// Security supervision and above.
    SecuritySupervision,
    /// Any member of the security organization.
    SecurityTeam,
    /// Leadership across the whole organization.
    GeneralLeadership,
    /// Any authenticated end user.
    AllUsers,
}

impl Policy {
    /// All policies, for exhaustive iteration in tests and listings.
    pub const ALL: [Policy; 8] = [
        Policy::RootOnly,
        Policy::AdminOnly,
        Policy::SecurityChiefOnly,
        Policy::SecurityManagement,
        Policy::SecuritySupervision,
        Policy::SecurityTeam,
        Policy::GeneralLeadership,
        Policy::AllUsers,
    ];

    /// The explicit role set that satisfies this policy.
    #[must_use]
    pub fn roles(&self) -> &'static [Role] {
        match self {
            Self::RootOnly => &[Role::Root],
            Self::AdminOnly => &[Role::Root, Role::Admin],
            Self::SecurityChiefOnly => &[Role::Root, Role::Admin, Role::SecurityChief],
            Self::SecurityManagement => &[
                Role::Root,
                Role::Admin,
                Role::SecurityChief,
                Role::SecurityManager,
            ],
            Self::SecuritySupervision | Self::GeneralLeadership => &[
                Role::Root,
                Role::Admin,
                Role::SecurityChief,
                Role::SecurityManager,
                Role::SecuritySupervisor,
            ],
            Self::SecurityTeam => &[
                Role::Root,
                Role::Admin,
                Role::SecurityChief,
                Role::SecurityManager,
                Role::SecuritySupervisor,
                Role::SecurityOfficer,
            ],
            Self::AllUsers => &[Role::Root, Role::Admin, Role::CommonUser],
        }
    }

    /// Returns `true` if the given role set satisfies this policy.
    ///
    /// ALLOW iff the intersection of the token's roles and the policy's
    /// role set is non-empty.
    #[must_use]
    pub fn allows(&self, roles: &BTreeSet<Role>) -> bool {
        self.roles().iter().any(|role| roles.contains(role))
    }

    /// The policy name as exposed to callers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootOnly => "RootOnly",
            Self::AdminOnly => "AdminOnly",
            Self::SecurityChiefOnly => "SecurityChiefOnly",
            Self::SecurityManagement => "SecurityManagement",
            Self::SecuritySupervision => "SecuritySupervision",
            Self::SecurityTeam => "SecurityTeam",
            Self::GeneralLeadership => "GeneralLeadership",
            Self::AllUsers => "AllUsers",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| UnknownPolicy {
                name: s.to_string(),
            })
    }
}

/// Error returned when parsing a policy name outside the fixed set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown policy: {name}")]
pub struct UnknownPolicy {
    /// The unrecognized policy name.
    pub name: String,
}

/// The allow/deny outcome of evaluating a policy against a role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The role set satisfies the policy.
    Allow,
    /// The role set does not satisfy the policy.
    Deny,
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluates named policies against verified session tokens.
pub struct PolicyEvaluator {
    issuer: Arc<TokenIssuer>,
}

impl PolicyEvaluator {
    /// Creates a new evaluator backed by the given token issuer.
    #[must_use]
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Pure policy evaluation over an already-verified role set.
    #[must_use]
    pub fn evaluate(policy: Policy, roles: &BTreeSet<Role>) -> Decision {
        if policy.allows(roles) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Verifies a bearer token, then evaluates the policy.
    ///
    /// Verification is the short-circuiting precondition: an expired or
    /// malformed token is an error here and never reaches evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::TokenExpired`] or
    /// [`crate::AuthError::TokenMalformed`] from verification.
    pub fn authorize(
        &self,
        bearer: &str,
        policy: Policy,
    ) -> AuthResult<(Decision, SessionTokenClaims)> {
        let claims = self.issuer.verify_session_token(bearer)?;
        let decision = Self::evaluate(policy, &claims.role_set());
        if !decision.is_allow() {
            tracing::debug!(
                subject = %claims.sub,
                policy = %policy,
                "request denied by policy"
            );
        }
        Ok((decision, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimSet;
    use crate::config::AuthConfig;
    use crate::error::AuthError;

    fn roles(list: &[Role]) -> BTreeSet<Role> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_allow_iff_intersection() {
        // Exhaustive: every policy against every single-role set.
        for policy in Policy::ALL {
            for role in Role::ALL {
                let set = roles(&[role]);
                let expected = policy.roles().contains(&role);
                assert_eq!(
                    policy.allows(&set),
                    expected,
                    "policy {policy} role {role}"
                );
            }
        }
    }

    #[test]
    fn test_empty_role_set_denies_everything() {
        let empty = BTreeSet::new();
        for policy in Policy::ALL {
            assert_eq!(PolicyEvaluator::evaluate(policy, &empty), Decision::Deny);
        }
    }

    #[test]
    fn test_root_satisfies_every_policy() {
        let root = roles(&[Role::Root]);
        for policy in Policy::ALL {
            assert!(policy.allows(&root), "Root must satisfy {policy}");
        }
    }

    #[test]
    fn test_hierarchy_is_superset_chain() {
        // Each security policy's set contains the one above it in
        // privilege.
        let chain = [
            Policy::RootOnly,
            Policy::AdminOnly,
            Policy::SecurityChiefOnly,
            Policy::SecurityManagement,
            Policy::SecuritySupervision,
            Policy::SecurityTeam,
        ];
        for pair in chain.windows(2) {
            let higher: BTreeSet<Role> = pair[0].roles().iter().copied().collect();
            let lower: BTreeSet<Role> = pair[1].roles().iter().copied().collect();
            assert!(
                higher.is_subset(&lower),
                "{} must be a superset of {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_officer_scope() {
        let officer = roles(&[Role::SecurityOfficer]);
        assert!(Policy::SecurityTeam.allows(&officer));
        assert!(!Policy::SecuritySupervision.allows(&officer));
        assert!(!Policy::AllUsers.allows(&officer));
    }

    #[test]
    fn test_common_user_scope() {
        let common = roles(&[Role::CommonUser]);
        assert!(Policy::AllUsers.allows(&common));
        assert!(!Policy::SecurityTeam.allows(&common));
        assert!(!Policy::AdminOnly.allows(&common));
    }

    #[test]
    fn test_policy_name_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>().unwrap(), policy);
        }
        assert!("NoSuchPolicy".parse::<Policy>().is_err());
    }

    fn issuer() -> Arc<TokenIssuer> {
        let mut config = AuthConfig::default();
        config.session.key = "session-test-key".to_string();
        config.secret_delivery.key = "secret-delivery-test-key".to_string();
        Arc::new(TokenIssuer::from_config(&config).unwrap())
    }

    fn session_token(issuer: &TokenIssuer, role_list: &[Role]) -> String {
        let claims = ClaimSet {
            subject: "id-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: roles(role_list),
            profile: None,
        };
        issuer.issue_session_token(&claims).unwrap().token
    }

    #[test]
    fn test_authorize_allows_admin() {
        let issuer = issuer();
        let evaluator = PolicyEvaluator::new(issuer.clone());
        let token = session_token(&issuer, &[Role::Admin]);

        let (decision, claims) = evaluator.authorize(&token, Policy::AdminOnly).unwrap();
        assert!(decision.is_allow());
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_authorize_denies_out_of_scope_role() {
        let issuer = issuer();
        let evaluator = PolicyEvaluator::new(issuer.clone());
        let token = session_token(&issuer, &[Role::CommonUser]);

        let (decision, _) = evaluator.authorize(&token, Policy::SecurityTeam).unwrap();
        assert_eq!(decision, Decision::Deny);
    }

    #[test]
    fn test_authorize_rejects_garbage_before_evaluation() {
        let evaluator = PolicyEvaluator::new(issuer());
        let err = evaluator
            .authorize("not-a-token", Policy::AllUsers)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenMalformed { .. }));
    }

    #[test]
    fn test_authorize_rejects_secret_token() {
        let issuer = issuer();
        let evaluator = PolicyEvaluator::new(issuer.clone());
        let secret = issuer.issue_secret_token("otp").unwrap();

        let err = evaluator
            .authorize(&secret.token, Policy::AllUsers)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenMalformed { .. }));
    }
}
