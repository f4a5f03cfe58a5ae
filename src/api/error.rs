use crate::model::MetricKind;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub enum Error {
    LoginError(String),
    ApiError(String),
    /// Response body and the reason it could not be decoded.
    InvalidResponse(String, String),
    EmptyData(MetricKind),
    RateExceeded(String),
    FormatError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LoginError(s) => write!(f, "authentication failed: {}", s),
            Error::ApiError(s) => write!(f, "API request failed: {}", s),
            Error::InvalidResponse(body, reason) => {
                write!(f, "unexpected API response ({}): {}", reason, body)
            }
            Error::EmptyData(kind) => write!(f, "no {} readings in the requested window", kind),
            Error::RateExceeded(s) => write!(f, "API rate limit exceeded: {}", s),
            Error::FormatError => f.write_str("unable to format metrics"),
        }
    }
}

impl std::error::Error for Error {}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let error = format!(
            "<html><body><h3>Internal error</h3><code>{}</code></body></html>",
            self
        );
        Response::build()
            .status(Status::InternalServerError)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_data_names_the_metric() {
        let error = Error::EmptyData(MetricKind::TotalEnergy);
        assert_eq!("no total_energy readings in the requested window", error.to_string());
    }

    #[test]
    fn invalid_response_keeps_body() {
        let error = Error::InvalidResponse("{}".to_string(), "missing field `Readings`".to_string());
        assert!(error.to_string().contains("missing field `Readings`"));
        assert!(error.to_string().ends_with("{}"));
    }

    #[rocket::get("/metrics")]
    fn broken_metrics() -> Result<String, Error> {
        Err(Error::FormatError)
    }

    #[rocket::async_test]
    async fn responds_with_internal_server_error() {
        let rocket = rocket::build().mount("/", rocket::routes![broken_metrics]);
        let client = rocket::local::asynchronous::Client::tracked(rocket).await.unwrap();

        let response = client.get("/metrics").dispatch().await;
        assert_eq!(Status::InternalServerError, response.status());
        assert!(response.content_type().map_or(false, |c| c.is_html()));
        let body = response.into_string().await.unwrap();
        assert!(body.contains("unable to format metrics"));
    }
}
