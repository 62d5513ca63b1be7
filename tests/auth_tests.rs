
use buildethiopia_api::{
    auth::{jwt::JwtService, password::hash_password},
    entities::{
        oauth::{OAuthCallbackQuery, OAuthProviderKind, OAuthUserInfo},
        profile::ProfileRole,
        user::{LoginUser, NewUser},
    },
    errors::{AppError, AuthError},
    repositories::token::TokenServiceRepository,
    use_cases::{auth::AuthHandler, oauth::OAuthHandler},
};
use fakes::*;

const PASSWORD: &str = "Gebeta#Lalibela42Tej";

fn auth_handler(users: InMemoryUserRepo, revocations: MemoryRevocations) -> AuthHandler<InMemoryUserRepo, JwtService, MemoryRevocations> {
    AuthHandler::new(users, JwtService::new(&test_config()), revocations)
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        email: format!("{username}@buildethiopia.dev"),
        password: PASSWORD.to_string(),
        username: username.to_string(),
        name: "Abebe Kebede".to_string(),
        role: ProfileRole::Developer,
    }
}

fn login_for(username: &str, password: &str) -> LoginUser {
    LoginUser {
        email: format!("{username}@buildethiopia.dev"),
        password: password.to_string(),
    }
}

#[actix_rt::test]
async fn register_then_login_issues_tokens_for_the_account() {
    let users = InMemoryUserRepo::default();
    let handler = auth_handler(users.clone(), MemoryRevocations::default());

    let registered = handler.register(new_user("abebe")).await.unwrap();
    let stored = users.user(&registered.id).unwrap();
    assert_ne!(stored.password_hash.as_deref(), Some(PASSWORD));
    assert!(!stored.is_admin);

    let tokens = handler.login(login_for("abebe", PASSWORD)).await.unwrap();
    assert_eq!(tokens.token_type, "Bearer");

    let claims = handler.token_service.decode_jwt(&tokens.access_token).unwrap().claims;
    assert_eq!(claims.sub, registered.id.to_string());
    assert_eq!(claims.username, "abebe");
    assert!(!claims.admin);
}

#[actix_rt::test]
async fn register_rejects_duplicate_accounts() {
    let handler = auth_handler(InMemoryUserRepo::default(), MemoryRevocations::default());
    handler.register(new_user("abebe")).await.unwrap();

    let err = handler.register(new_user("abebe")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_rt::test]
async fn register_rejects_weak_passwords() {
    let handler = auth_handler(InMemoryUserRepo::default(), MemoryRevocations::default());
    let request = NewUser {
        password: "password".to_string(),
        ..new_user("abebe")
    };

    let err = handler.register(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[actix_rt::test]
async fn login_with_wrong_password_is_rejected() {
    let handler = auth_handler(InMemoryUserRepo::default(), MemoryRevocations::default());
    handler.register(new_user("abebe")).await.unwrap();

    let err = handler.login(login_for("abebe", "Wrong#Password99")).await.unwrap_err();
    assert!(matches!(err, AuthError::WrongCredentials));

    let err = handler.login(login_for("nobody", PASSWORD)).await.unwrap_err();
    assert!(matches!(err, AuthError::WrongCredentials));
}

#[actix_rt::test]
async fn oauth_only_accounts_cannot_use_password_login() {
    let user = sample_user("abebe", ProfileRole::Developer, false);
    let handler = auth_handler(InMemoryUserRepo::with_users(vec![user]), MemoryRevocations::default());

    let err = handler.login(login_for("abebe", PASSWORD)).await.unwrap_err();
    assert!(matches!(err, AuthError::WrongCredentials));
}

#[actix_rt::test]
async fn refresh_rotates_and_rejects_reuse() {
    let mut user = sample_user("abebe", ProfileRole::Developer, false);
    user.password_hash = Some(hash_password(PASSWORD).unwrap());
    let handler = auth_handler(InMemoryUserRepo::with_users(vec![user]), MemoryRevocations::default());

    let tokens = handler.login(login_for("abebe", PASSWORD)).await.unwrap();
    let rotated = handler.refresh_token(&tokens.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let err = handler.refresh_token(&tokens.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));

    assert!(handler.refresh_token(&rotated.refresh_token).await.is_ok());
}

#[actix_rt::test]
async fn access_tokens_are_not_refresh_tokens() {
    let user = sample_user("abebe", ProfileRole::Developer, false);
    let handler = auth_handler(InMemoryUserRepo::with_users(vec![user.clone()]), MemoryRevocations::default());

    let tokens = handler.create_auth_response(&user).unwrap();
    assert!(handler.refresh_token(&tokens.access_token).await.is_err());
}

#[actix_rt::test]
async fn logout_revokes_both_tokens() {
    let user = sample_user("abebe", ProfileRole::Developer, false);
    let revocations = MemoryRevocations::default();
    let handler = auth_handler(InMemoryUserRepo::with_users(vec![user.clone()]), revocations.clone());

    let tokens = handler.create_auth_response(&user).unwrap();
    let access = handler.token_service.decode_jwt(&tokens.access_token).unwrap().claims;
    let refresh = handler.token_service.decode_refresh_jwt(&tokens.refresh_token).unwrap().claims;

    handler.logout(&access, &tokens.refresh_token).await.unwrap();

    assert!(revocations.contains(&access.jti));
    assert!(revocations.contains(&refresh.jti));
    assert!(handler.is_revoked(&access.jti).await.unwrap());

    let err = handler.refresh_token(&tokens.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));
}

#[actix_rt::test]
async fn logout_with_someone_elses_refresh_token_fails() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let selam = sample_user("selam", ProfileRole::Developer, false);
    let revocations = MemoryRevocations::default();
    let handler = auth_handler(
        InMemoryUserRepo::with_users(vec![abebe.clone(), selam.clone()]),
        revocations.clone(),
    );

    let selam_tokens = handler.create_auth_response(&selam).unwrap();
    let err = handler.logout(&claims_for(&abebe), &selam_tokens.refresh_token).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken));
    let refresh = handler.token_service.decode_refresh_jwt(&selam_tokens.refresh_token).unwrap().claims;
    assert!(!revocations.contains(&refresh.jti));
}

fn github_user(email: Option<&str>, email_verified: bool) -> OAuthUserInfo {
    OAuthUserInfo {
        provider: OAuthProviderKind::Github,
        provider_user_id: "4242".to_string(),
        email: email.map(str::to_string),
        email_verified,
        name: Some("Abebe Kebede".to_string()),
        login: Some("Abebe-K".to_string()),
        avatar_url: Some("https://avatars.example.com/u/4242".to_string()),
        profile_url: Some("https://github.com/Abebe-K".to_string()),
    }
}

fn github_client(info: OAuthUserInfo) -> MockOAuth {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|_| true);
    client
        .expect_fetch_user()
        .returning(move |_, _| Ok(info.clone()));
    client
}

fn callback_query(state: String) -> OAuthCallbackQuery {
    OAuthCallbackQuery {
        code: Some("provider-code".to_string()),
        state: Some(state),
        error: None,
        error_description: None,
    }
}

#[actix_rt::test]
async fn oauth_callback_creates_a_linked_account() {
    let users = InMemoryUserRepo::default();
    let jwt = JwtService::new(&test_config());
    let state = jwt.create_oauth_state("github").unwrap();
    let handler = OAuthHandler::new(
        users.clone(),
        jwt,
        github_client(github_user(Some("Abebe@BuildEthiopia.dev"), true)),
    );

    let tokens = handler.callback("github", callback_query(state)).await.unwrap();
    let claims = handler.token_service.decode_jwt(&tokens.access_token).unwrap().claims;

    let user_id = users.identity_owner("github", "4242").unwrap();
    assert_eq!(claims.sub, user_id.to_string());

    let user = users.user(&user_id).unwrap();
    assert_eq!(user.email, "abebe@buildethiopia.dev");
    assert_eq!(user.username, "abebe_k");
    assert!(user.password_hash.is_none());
    assert!(user.is_verified);
}

#[actix_rt::test]
async fn oauth_callback_reuses_a_linked_identity() {
    let users = InMemoryUserRepo::default();
    let jwt = JwtService::new(&test_config());
    let handler = OAuthHandler::new(
        users.clone(),
        jwt.clone(),
        github_client(github_user(Some("abebe@buildethiopia.dev"), true)),
    );

    handler.callback("github", callback_query(jwt.create_oauth_state("github").unwrap())).await.unwrap();
    handler.callback("github", callback_query(jwt.create_oauth_state("github").unwrap())).await.unwrap();

    assert_eq!(users.len(), 1);
}

#[actix_rt::test]
async fn oauth_links_existing_account_by_verified_email() {
    let existing = sample_user("abebe", ProfileRole::Developer, false);
    let users = InMemoryUserRepo::with_users(vec![existing.clone()]);
    let jwt = JwtService::new(&test_config());
    let state = jwt.create_oauth_state("github").unwrap();
    let handler = OAuthHandler::new(users.clone(), jwt, github_client(github_user(Some(&existing.email), true)));

    let tokens = handler.callback("github", callback_query(state)).await.unwrap();
    let claims = handler.token_service.decode_jwt(&tokens.access_token).unwrap().claims;

    assert_eq!(claims.sub, existing.id.to_string());
    assert_eq!(users.identity_owner("github", "4242"), Some(existing.id));
    assert_eq!(users.len(), 1);
}

#[actix_rt::test]
async fn oauth_with_unverified_email_of_existing_account_conflicts() {
    let existing = sample_user("abebe", ProfileRole::Developer, false);
    let users = InMemoryUserRepo::with_users(vec![existing.clone()]);
    let jwt = JwtService::new(&test_config());
    let state = jwt.create_oauth_state("github").unwrap();
    let handler = OAuthHandler::new(users.clone(), jwt, github_client(github_user(Some(&existing.email), false)));

    let err = handler.callback("github", callback_query(state)).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert!(users.identity_owner("github", "4242").is_none());
}

#[actix_rt::test]
async fn oauth_username_collisions_get_a_suffix() {
    let taken = sample_user("abebe_k", ProfileRole::Developer, false);
    let users = InMemoryUserRepo::with_users(vec![taken]);
    let jwt = JwtService::new(&test_config());
    let state = jwt.create_oauth_state("github").unwrap();
    let handler = OAuthHandler::new(
        users.clone(),
        jwt,
        github_client(github_user(Some("another@buildethiopia.dev"), true)),
    );

    handler.callback("github", callback_query(state)).await.unwrap();

    let user_id = users.identity_owner("github", "4242").unwrap();
    let username = users.user(&user_id).unwrap().username;
    assert!(username.starts_with("abebe_k_"));
}

#[actix_rt::test]
async fn oauth_callback_rejects_forged_state() {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|_| true);
    client.expect_fetch_user().never();
    let handler = OAuthHandler::new(InMemoryUserRepo::default(), JwtService::new(&test_config()), client);

    let err = handler.callback("github", callback_query("forged".to_string())).await.unwrap_err();
    assert!(matches!(err, AppError::UnauthorizedAccess));
}

#[actix_rt::test]
async fn oauth_state_is_bound_to_its_provider() {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|_| true);
    client.expect_fetch_user().never();
    let jwt = JwtService::new(&test_config());
    let state = jwt.create_oauth_state("google").unwrap();
    let handler = OAuthHandler::new(InMemoryUserRepo::default(), jwt, client);

    let err = handler.callback("github", callback_query(state)).await.unwrap_err();
    assert!(matches!(err, AppError::UnauthorizedAccess));
}

#[actix_rt::test]
async fn oauth_provider_refusal_is_unauthorized() {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|_| true);
    client.expect_fetch_user().never();
    let handler = OAuthHandler::new(InMemoryUserRepo::default(), JwtService::new(&test_config()), client);

    let query = OAuthCallbackQuery {
        code: None,
        state: None,
        error: Some("access_denied".to_string()),
        error_description: Some("The user denied access".to_string()),
    };
    let err = handler.callback("github", query).await.unwrap_err();
    assert!(matches!(err, AppError::UnauthorizedAccess));
}

#[actix_rt::test]
async fn disabled_providers_are_not_found() {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|provider| provider == OAuthProviderKind::Google);
    let handler = OAuthHandler::new(InMemoryUserRepo::default(), JwtService::new(&test_config()), client);

    assert!(matches!(handler.start("github"), Err(AuthError::UnsupportedProvider(_))));
    assert!(matches!(handler.start("gitlab"), Err(AuthError::UnsupportedProvider(_))));
}

#[actix_rt::test]
async fn oauth_start_signs_a_state_for_the_provider() {
    let mut client = MockOAuth::new();
    client.expect_is_enabled().returning(|_| true);
    client
        .expect_authorize_url()
        .returning(|provider, state| Ok(format!("https://{provider}.example.com/authorize?state={state}")));
    let handler = OAuthHandler::new(InMemoryUserRepo::default(), JwtService::new(&test_config()), client);

    let url = handler.start("GitHub").unwrap();
    let state = url.split("state=").nth(1).unwrap();

    assert!(url.starts_with("https://github.example.com/authorize"));
    assert!(handler.token_service.verify_oauth_state(state, "github").is_ok());
}
