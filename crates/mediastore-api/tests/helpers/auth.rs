use mediastore_api::auth::JwtService;

/// Signing secret of the test config (at least 32 characters).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Default user the tests upload as.
pub const TEST_USER_ID: &str = "42";

/// Test user: id plus a bearer token signed with the test secret.
pub struct TestUser {
    pub user_id: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn test_user(user_id: &str) -> TestUser {
    let token = JwtService::new(TEST_JWT_SECRET, 24)
        .issue(user_id, "test@example.com", "user")
        .expect("Failed to issue test token");
    TestUser {
        user_id: user_id.to_string(),
        token,
    }
}

/// Token that expired an hour ago.
pub fn expired_token(user_id: &str) -> String {
    JwtService::new(TEST_JWT_SECRET, -1)
        .issue(user_id, "test@example.com", "user")
        .expect("Failed to issue expired token")
}

/// Token signed with a different secret.
pub fn foreign_token(user_id: &str) -> String {
    JwtService::new("another-secret-that-is-also-32-characters", 24)
        .issue(user_id, "test@example.com", "user")
        .expect("Failed to issue foreign token")
}
