//! Login / register dialog
//!
//! One form shared by both modes. States:
//! `Closed -> Open(Login) <-> Open(Register) -> Closed`.

use crate::api::Api;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::ui::{Notifications, GENERIC_ERROR};

const LOGIN_OK: &str = "Signed in";
const REGISTER_OK: &str = "Account created";

/// Which form the dialog shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    fn other(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Dialog visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(AuthMode),
}

/// Form fields; `name` is only used when registering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    /// Required-field check for `mode`
    pub fn validate(&self, mode: AuthMode) -> Result<(), &'static str> {
        if mode == AuthMode::Register && self.name.trim().is_empty() {
            return Err("Name is required");
        }
        if self.email.trim().is_empty() {
            return Err("Email is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        Ok(())
    }
}

/// Auth dialog state
#[derive(Debug, Clone, Default)]
pub struct AuthDialog {
    state: DialogState,
    pub form: AuthForm,
    /// Message of the last failed submit
    pub error: Option<String>,
}

impl AuthDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    /// Mode of the open dialog
    pub fn mode(&self) -> Option<AuthMode> {
        match self.state {
            DialogState::Open(mode) => Some(mode),
            DialogState::Closed => None,
        }
    }

    pub fn open(&mut self, mode: AuthMode) {
        self.state = DialogState::Open(mode);
        self.error = None;
    }

    /// Flip between login and register; no effect while closed
    pub fn switch_mode(&mut self) {
        if let DialogState::Open(mode) = self.state {
            self.state = DialogState::Open(mode.other());
            self.error = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Submit the form for the current mode
    ///
    /// Returns the auth response on success, after which the dialog is closed
    /// and the form cleared. On failure the dialog stays open with `error` set.
    pub async fn submit(&mut self, api: &Api, notices: &mut Notifications) -> Option<AuthResponse> {
        let mode = self.mode()?;

        if let Err(msg) = self.form.validate(mode) {
            self.fail(msg.to_string(), notices);
            return None;
        }

        let result = match mode {
            AuthMode::Login => {
                api.public
                    .login(&LoginRequest {
                        email: self.form.email.clone(),
                        password: self.form.password.clone(),
                    })
                    .await
            }
            AuthMode::Register => {
                api.public
                    .register(&RegisterRequest {
                        name: self.form.name.clone(),
                        email: self.form.email.clone(),
                        password: self.form.password.clone(),
                    })
                    .await
            }
        };

        match result {
            Ok(response) => {
                notices.success(match mode {
                    AuthMode::Login => LOGIN_OK,
                    AuthMode::Register => REGISTER_OK,
                });
                self.form = AuthForm::default();
                self.error = None;
                self.state = DialogState::Closed;
                Some(response)
            }
            Err(e) => {
                tracing::error!(error = %e, ?mode, "authentication failed");
                let msg = e.detail().unwrap_or(GENERIC_ERROR).to_string();
                self.fail(msg, notices);
                None
            }
        }
    }

    fn fail(&mut self, msg: String, notices: &mut Notifications) {
        notices.error(msg.clone());
        self.error = Some(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine() {
        let mut dialog = AuthDialog::new();
        assert_eq!(dialog.state(), DialogState::Closed);

        dialog.switch_mode();
        assert_eq!(dialog.state(), DialogState::Closed);

        dialog.open(AuthMode::Login);
        assert_eq!(dialog.mode(), Some(AuthMode::Login));
        dialog.switch_mode();
        assert_eq!(dialog.mode(), Some(AuthMode::Register));
        dialog.switch_mode();
        assert_eq!(dialog.mode(), Some(AuthMode::Login));

        dialog.dismiss();
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_validate_required_fields() {
        let mut form = AuthForm {
            name: String::new(),
            email: "a@b.c".into(),
            password: "pw".into(),
        };
        assert!(form.validate(AuthMode::Login).is_ok());
        assert_eq!(form.validate(AuthMode::Register), Err("Name is required"));

        form.name = "Ann".into();
        assert!(form.validate(AuthMode::Register).is_ok());

        form.password.clear();
        assert_eq!(form.validate(AuthMode::Login), Err("Password is required"));
    }

    #[test]
    fn test_form_survives_dismiss() {
        let mut dialog = AuthDialog::new();
        dialog.open(AuthMode::Register);
        dialog.form.email = "a@b.c".into();
        dialog.dismiss();
        dialog.open(AuthMode::Login);
        assert_eq!(dialog.form.email, "a@b.c");
    }
}
