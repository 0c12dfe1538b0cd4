use tracing::{info, instrument, warn};

use fauxrest_auth::{
    AuthError, IssuedToken, RevocationList, TokenStatus, check_token, create_token, revoke_token,
};
use fauxrest_config::JwtConfig;
use fauxrest_core::AppError;
use fauxrest_store::UserLookup;

use super::model::Credentials;

pub struct TokenService;

impl TokenService {
    /// Checks the credentials and signs a token for the matching user.
    ///
    /// Unknown users and wrong passwords fail identically.
    #[instrument(skip(users, jwt_config))]
    pub async fn create<L>(
        users: &L,
        credentials: &Credentials,
        jwt_config: &JwtConfig,
    ) -> Result<IssuedToken, AppError>
    where
        L: UserLookup,
    {
        let user = users
            .find_by_username(&credentials.username)
            .await?
            .filter(|user| user.verify_password(&credentials.password))
            .ok_or_else(|| {
                warn!(username = %credentials.username, "Rejected credentials");
                AuthError::InvalidCredentials
            })?;

        let issued = create_token(&user.slug, jwt_config)?;
        info!(user = %user.slug, token.jti = %issued.claims.jti, "Token issued");
        Ok(issued)
    }

    pub fn check(
        token: Option<&str>,
        jwt_config: &JwtConfig,
        revocations: &dyn RevocationList,
    ) -> TokenStatus {
        match token {
            Some(token) => check_token(token, jwt_config, revocations),
            None => TokenStatus::invalid(&AuthError::MissingToken),
        }
    }

    #[instrument(skip_all)]
    pub fn revoke(
        token: Option<&str>,
        jwt_config: &JwtConfig,
        revocations: &dyn RevocationList,
    ) -> Result<(), AppError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let claims = revoke_token(token, jwt_config, revocations).inspect_err(|err| {
            warn!(reason = %err, "Rejected revocation");
        })?;
        info!(user = %claims.sub, token.jti = %claims.jti, "Token revoked");
        Ok(())
    }
}
