//! Admin sign-in.

use crate::client::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};
use ayura_core::{AdminProfile, Session};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

const LOGIN_PATH: &str = "api/admin/login";

#[derive(Serialize)]
struct LoginReq<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginRes {
    token: String,
    #[serde(default, alias = "user", alias = "adminData")]
    admin: Option<AdminProfile>,
}

impl ApiClient {
    /// Exchange credentials for a token and start a persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidCredentials`] when the backend rejects
    /// the credentials, or the underlying network, decode or session storage
    /// error.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginReq {
            email: email.trim(),
            password,
        };

        let res: LoginRes = match self
            .send_for_item(Method::POST, LOGIN_PATH, Some(&body), Auth::Anonymous)
            .await
        {
            Ok(res) => res,
            Err(ClientError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST =>
            {
                return Err(ClientError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if res.token.trim().is_empty() {
            return Err(ClientError::InvalidCredentials);
        }

        let session = Session::new(res.token, res.admin);
        self.session().begin(session.clone())?;
        Ok(session)
    }

    /// Forget the current session locally.
    pub fn logout(&self) -> ClientResult<()> {
        self.session().end()?;
        Ok(())
    }
}
