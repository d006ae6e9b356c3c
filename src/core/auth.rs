use std::time::Duration;

use reqwest::Method;
use serde_json::json;

use crate::core::cache::{Tag, TagKind};
use crate::core::client::Acadify;
use crate::error::AcadifyError;
use crate::model::response::ApiMessage;
use crate::model::user::{
    LoginResponse, ProfileResponse, ProfileUpdate, RegisterPayload, ResetPasswordPayload, User,
};

/// Delay between a confirmed logout and the cache wipe, so in-flight
/// requests still riding the old session settle first.
pub const LOGOUT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Client-side session state. Starts in `is_loading` until the first
/// profile reload resolves, so a restored cookie session is not
/// mistaken for a guest.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        AuthState {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn logged_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.is_loading = false;
    }

    pub fn logged_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.is_loading = false;
    }

    pub fn finish_loading(&mut self) {
        self.is_loading = false;
    }
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState::new()
    }
}

impl Acadify {
    pub fn auth_state(&self) -> AuthState {
        self.auth.lock().expect("auth lock poisoned").clone()
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<ApiMessage, AcadifyError> {
        self.mutate(Method::POST, "user/register", Some(payload), &[])
            .await
    }

    /// Login: on success the auth state flips first, then the profile
    /// query is force-refetched because the login reply does not carry
    /// role/entitlement data. A failed login changes nothing.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AcadifyError> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .mutate(Method::POST, "user/login", Some(&body), &[])
            .await?;

        self.auth
            .lock()
            .expect("auth lock poisoned")
            .logged_in(response.user.clone());

        self.cache.invalidate(&[Tag::list(TagKind::User)]);
        if let Err(err) = self.load_user().await {
            log::debug!("profile reload after login failed: {}", err);
        }

        Ok(response.user)
    }

    /// Logout clears local auth state even when the network call
    /// fails, so the UI cannot stay "logged in" after an error. Only a
    /// confirmed logout wipes the cache, and only after a short settle
    /// delay.
    pub async fn logout(&self) -> Result<(), AcadifyError> {
        let result: Result<ApiMessage, AcadifyError> = self
            .mutate(Method::POST, "user/logout", None::<&serde_json::Value>, &[])
            .await;

        self.auth.lock().expect("auth lock poisoned").logged_out();

        match result {
            Ok(_) => {
                tokio::time::sleep(LOGOUT_SETTLE_DELAY).await;
                self.cache.reset();
                Ok(())
            }
            Err(err) => {
                log::warn!("logout request failed, local state cleared anyway: {}", err);
                Err(err)
            }
        }
    }

    /// Background profile reload; a guest (401) is a normal outcome,
    /// not an error.
    pub async fn load_user(&self) -> Result<Option<User>, AcadifyError> {
        let fetched: Result<ProfileResponse, AcadifyError> = self
            .get_cached("user/profile", vec![Tag::list(TagKind::User)])
            .await;

        let mut auth = self.auth.lock().expect("auth lock poisoned");
        match fetched {
            Ok(response) => {
                auth.logged_in(response.user.clone());
                Ok(Some(response.user))
            }
            Err(err) => {
                auth.finish_loading();
                log::debug!("no active session: {}", err);
                Ok(None)
            }
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AcadifyError> {
        let response: ProfileResponse = self
            .mutate(
                Method::PUT,
                "user/profile",
                Some(update),
                &[Tag::list(TagKind::User)],
            )
            .await?;

        self.auth
            .lock()
            .expect("auth lock poisoned")
            .logged_in(response.user.clone());
        Ok(response.user)
    }

    pub async fn send_otp(&self, email: &str) -> Result<ApiMessage, AcadifyError> {
        let body = json!({ "email": email });
        self.mutate(Method::POST, "user/send-otp", Some(&body), &[])
            .await
    }

    pub async fn reset_password(
        &self,
        payload: &ResetPasswordPayload,
    ) -> Result<ApiMessage, AcadifyError> {
        self.mutate(Method::POST, "user/reset-password", Some(payload), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::Role;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            role: Role::Student,
            photo_url: None,
            enrolled_courses: Vec::new(),
        }
    }

    #[test]
    fn starts_loading_and_unauthenticated() {
        let state = AuthState::new();
        assert!(!state.is_authenticated);
        assert!(state.is_loading);
        assert!(state.user.is_none());
    }

    #[test]
    fn login_then_logout_round_trip() {
        let mut state = AuthState::new();
        state.logged_in(user());
        assert!(state.is_authenticated);
        assert!(!state.is_loading);

        state.logged_out();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn failed_login_leaves_state_untouched() {
        // the login path only applies `logged_in` after the mutation
        // succeeds; a failure must leave the default state
        let mut state = AuthState::new();
        state.finish_loading();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn logout_clears_even_without_server_confirmation() {
        // the failed-logout fallback applies the same transition
        let mut state = AuthState::new();
        state.logged_in(user());
        state.logged_out();
        assert!(!state.is_authenticated);
    }
}
