//! Access decisions for protected screens and endpoints.

use serde::{Deserialize, Serialize};

/// Snapshot of the identity provider's state for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user_id: Option<String>,
    /// Identity provider has not resolved the session yet
    pub loading: bool,
    pub profile_complete: bool,
}

impl AuthState {
    pub fn signed_in(user_id: &str, profile_complete: bool) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            loading: false,
            profile_complete,
        }
    }
}

/// What a protected screen requires of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    SignedIn,
    ProfileComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    /// Show the loading screen until the session resolves
    Loading,
    RedirectToSignIn,
    RedirectToOnboarding,
    Allow,
}

pub fn evaluate(state: &AuthState, requirement: Requirement) -> GuardDecision {
    if state.loading {
        return GuardDecision::Loading;
    }
    if state.user_id.is_none() {
        return GuardDecision::RedirectToSignIn;
    }
    if requirement == Requirement::ProfileComplete && !state.profile_complete {
        return GuardDecision::RedirectToOnboarding;
    }
    GuardDecision::Allow
}
