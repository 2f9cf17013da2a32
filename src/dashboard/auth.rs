//! Login and signup
//!
//! These run before a [`super::Dashboard`] exists, so they take the gateway,
//! the session store and the notifier directly.

use tracing::{info, warn};

use super::{DashboardError, DashboardResult, Notice, Notifier, Outcome};
use crate::api::dto::SignupRequest;
use crate::api::{ApiClient, Transport};
use crate::session::{KeyValueStorage, Session, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> DashboardResult<(&str, &str)> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(DashboardError::validation("Please fill in all fields"));
        }
        Ok((email, &self.password))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `student` or `teacher`
    pub role: String,
}

impl SignupForm {
    fn validate(&self) -> DashboardResult<SignupRequest> {
        let name = self.name.trim();
        let email = self.email.trim();
        let role = self.role.trim();
        if name.is_empty() || email.is_empty() || self.password.is_empty() || role.is_empty() {
            return Err(DashboardError::validation("Please fill in all fields"));
        }

        // the backend spells the student role "user"
        let role = match role.to_ascii_lowercase().as_str() {
            "student" | "user" => "user",
            "teacher" => "teacher",
            _ => return Err(DashboardError::validation("Role must be student or teacher")),
        };

        Ok(SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role: role.to_string(),
        })
    }
}

/// Log in and persist `{token, user}`; the client carries the token afterwards
pub async fn login<T, S, N>(
    client: &mut ApiClient<T>,
    store: &mut SessionStore<S>,
    notifier: &N,
    form: &LoginForm,
) -> DashboardResult<Outcome>
where
    T: Transport,
    S: KeyValueStorage,
    N: Notifier,
{
    let (email, password) = match form.validate() {
        Ok(credentials) => credentials,
        Err(e) => {
            notifier.notify(Notice::warning(e.to_string()));
            return Ok(Outcome::Invalid);
        }
    };

    let response = match client.login(email, password).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Login failed: {}", e);
            notifier.notify(Notice::error(e.user_message(
                "Invalid email or password",
                "Server error. Please try again later.",
            )));
            return Ok(Outcome::Failed);
        }
    };

    let session = Session::new(response.token, response.user);
    store.save(&session)?;
    client.set_token(Some(session.token));

    info!(user_id = session.user.id, role = %session.user.role, "Logged in");
    notifier.notify(Notice::success(format!("Logged in as {}", session.user.email)));
    Ok(Outcome::Applied)
}

/// Create an account
///
/// The backend answers with a bare token and no profile. Storing it would
/// leave a half session, so nothing is persisted and the user logs in next.
pub async fn signup<T, N>(client: &ApiClient<T>, notifier: &N, form: &SignupForm) -> Outcome
where
    T: Transport,
    N: Notifier,
{
    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            notifier.notify(Notice::warning(e.to_string()));
            return Outcome::Invalid;
        }
    };

    match client.signup(&request).await {
        Ok(_) => {
            info!(email = %request.email, role = %request.role, "Account created");
            notifier.notify(Notice::success("Account created. Please log in."));
            Outcome::Applied
        }
        Err(e) => {
            warn!("Signup failed: {}", e);
            notifier.notify(Notice::error(
                e.user_message("Signup failed", "Connection error. Please try again."),
            ));
            Outcome::Failed
        }
    }
}
