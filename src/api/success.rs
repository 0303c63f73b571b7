use actix_web::HttpResponse;
use std::borrow::Cow;

/// Body written when a message accompanies the payload. The payload's own fields sit next to
/// `message` at the top level, so `T` must serialize as a map.
#[derive(serde::Serialize)]
pub struct SuccessData<'a, T: serde::Serialize> {
    pub message: &'a str,
    #[serde(flatten)]
    pub data: &'a T,
}

pub struct Success<T: serde::Serialize> {
    pub status: actix_web::http::StatusCode,
    pub data: T,
    pub message: Option<Cow<'static, str>>,
}

impl<T: serde::Serialize> Success<T> {
    pub fn ok(data: T) -> Self {
        Self { status: actix_web::http::StatusCode::OK, data, message: None }
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        self.message = Some(msg.into());
        self
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        match &self.message {
            Some(message) => response.json(SuccessData { message, data: &self.data }),
            None => response.json(&self.data),
        }
    }
}
