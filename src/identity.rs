use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::models::UserId;

/// Header set by the authenticating proxy in front of this service.
pub(crate) const USER_HEADER: &str = "X-User-Id";

/// The user the request was made for, `None` for anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CurrentUser(pub Option<UserId>);

impl CurrentUser {
    pub(crate) fn id(&self) -> Option<UserId> {
        self.0
    }

    pub(crate) fn required(&self) -> Result<UserId, AppError> {
        self.0.ok_or(AppError::Unauthenticated)
    }

    fn from_header(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(CurrentUser(None)),
            Some(raw) => raw
                .parse::<UserId>()
                .map(|id| CurrentUser(Some(id)))
                .map_err(|_| AppError::InvalidUser(raw.to_string())),
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req.headers().get(USER_HEADER);
        let value = match header.map(|value| value.to_str()) {
            None => None,
            Some(Ok(value)) => Some(value),
            Some(Err(_)) => return ready(Err(AppError::InvalidUser("<non-ascii>".to_string()))),
        };
        ready(CurrentUser::from_header(value))
    }
}
