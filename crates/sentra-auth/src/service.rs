//! Login, registration, and seeded-account provisioning.
//!
//! `AuthService` wires the leaf components together: verifier →
//! assembler → issuer for login, and the generate/create/retry loop for
//! bulk provisioning. All collaborators are explicit: there is no
//! ambient registry; the process builds one service at startup and shares
//! it.

use std::sync::Arc;

use crate::claims::{ClaimSet, ClaimsAssembler};
use crate::credential::{hash_password, CredentialVerifier};
use crate::error::AuthError;
use crate::seed::SeedIdentityGenerator;
use crate::storage::{IdentityStorage, ProfileStorage};
use crate::token::{SignedToken, TokenIssuer};
use crate::types::{ExtendedProfile, Identity, Role};
use crate::AuthResult;

/// Retry budget for username collisions during seeded provisioning.
///
/// The six-digit suffix space makes exhaustion implausible; the cap turns
/// a pathological storage state into an error instead of a spin.
const MAX_USERNAME_ATTEMPTS: usize = 16;

/// A successful login: the signed session token plus the claim set it
/// carries.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The signed session token.
    pub token: SignedToken,
    /// The claim set embedded in the token.
    pub claims: ClaimSet,
}

/// Request to provision a seeded account.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Role assigned to the new account.
    pub role: Role,
    /// Email address for the new account.
    pub email: String,
    /// Given name for the extended profile, when the role bears one.
    pub first_name: Option<String>,
    /// Family name for the extended profile, when the role bears one.
    pub last_name: Option<String>,
}

/// A provisioned seeded account.
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    /// The created identity.
    pub identity: Identity,
    /// Secret-delivery token wrapping the generated one-time password.
    pub password_token: SignedToken,
}

/// Orchestrates authentication flows over explicit collaborators.
pub struct AuthService {
    verifier: CredentialVerifier,
    assembler: ClaimsAssembler,
    issuer: Arc<TokenIssuer>,
    identities: Arc<dyn IdentityStorage>,
    profiles: Arc<dyn ProfileStorage>,
    generator: SeedIdentityGenerator,
}

impl AuthService {
    /// Creates the service over the given stores and token issuer.
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityStorage>,
        profiles: Arc<dyn ProfileStorage>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            verifier: CredentialVerifier::new(identities.clone()),
            assembler: ClaimsAssembler::new(identities.clone(), profiles.clone()),
            issuer,
            identities,
            profiles,
            generator: SeedIdentityGenerator::new(),
        }
    }

    /// The token issuer, for request-path verification.
    #[must_use]
    pub fn issuer(&self) -> Arc<TokenIssuer> {
        self.issuer.clone()
    }

    /// Authenticates a username/password pair and issues a session token.
    ///
    /// The claims assembler runs here, once per login; the token carries
    /// the claim set from then on.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on verification failure,
    /// [`AuthError::ProfileInconsistent`] on a provisioning gap, or a
    /// storage error.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginOutcome> {
        let identity = self.verifier.verify(username, password).await?;
        let claims = self.assembler.assemble(&identity).await?;
        let token = self.issuer.issue_session_token(&claims)?;

        tracing::info!(username = %identity.username, "login succeeded");
        Ok(LoginOutcome { token, claims })
    }

    /// Registers a self-service account with the `CommonUser` role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUsername`] if the username is taken,
    /// or a storage error.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<Identity> {
        let identity = Identity::builder(username, email)
            .password_hash(hash_password(password)?)
            .build();
        self.identities.create(&identity).await?;
        self.identities
            .assign_role(&identity.id, Role::CommonUser)
            .await?;

        tracing::info!(username = %identity.username, "account registered");
        Ok(identity)
    }

    /// Provisions a seeded account with generated credentials.
    ///
    /// Loops on username collisions: generate, attempt creation, and on
    /// [`AuthError::DuplicateUsername`] regenerate and retry. Any other
    /// creation failure aborts the loop and surfaces unchanged. The
    /// generated password is returned wrapped in a secret-delivery token,
    /// never in the clear.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the retry budget is exhausted, a
    /// profile-storage error for qualifying roles, or any non-duplicate
    /// creation failure.
    pub async fn provision(&self, request: &ProvisionRequest) -> AuthResult<ProvisionedAccount> {
        let role_name = request.role.as_str();
        let password = self.generator.generate_password(role_name);
        let password_hash = hash_password(&password)?;

        let mut attempts = 0;
        let identity = loop {
            attempts += 1;
            let username = self.generator.generate_username(role_name);
            let candidate = Identity::builder(&username, &request.email)
                .password_hash(password_hash.clone())
                .email_confirmed(true)
                .build();

            match self.identities.create(&candidate).await {
                Ok(()) => break candidate,
                Err(AuthError::DuplicateUsername { .. }) if attempts < MAX_USERNAME_ATTEMPTS => {
                    tracing::debug!(
                        username = %username,
                        attempt = attempts,
                        "seeded username collided, regenerating"
                    );
                }
                Err(AuthError::DuplicateUsername { .. }) => {
                    return Err(AuthError::internal(format!(
                        "username generation exhausted after {MAX_USERNAME_ATTEMPTS} attempts \
                         for role {role_name}"
                    )));
                }
                Err(other) => return Err(other),
            }
        };

        self.identities
            .assign_role(&identity.id, request.role)
            .await?;

        if request.role.bears_profile() {
            let profile = ExtendedProfile::new(
                &identity.id,
                request.first_name.clone().unwrap_or_default(),
                request.last_name.clone().unwrap_or_default(),
            );
            self.profiles.create(&profile).await?;
        }

        let password_token = self.issuer.issue_secret_token(&password)?;
        tracing::info!(
            username = %identity.username,
            role = %request.role,
            "seeded account provisioned"
        );

        Ok(ProvisionedAccount {
            identity,
            password_token,
        })
    }
}
