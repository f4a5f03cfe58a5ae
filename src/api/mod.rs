pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
pub use error::Error;
use reqwest::{Client, Response};
use response::{EnergySensorData, Token};
use serde::de::DeserializeOwned;

use std::collections::HashMap;

pub fn api(api_url: String, username: String, password: String, installation_id: String) -> model::Api {
    model::Api {
        api_url,
        username,
        password,
        installation_id,
    }
}

/// Map non-2xx API response to Error
fn map_api_err(error: reqwest::Error) -> Error {
    match error.status() {
        Some(http::StatusCode::TOO_MANY_REQUESTS) => Error::RateExceeded(error.to_string()),
        Some(http::StatusCode::UNAUTHORIZED) => Error::LoginError(error.to_string()),
        _ => Error::ApiError(error.to_string()),
    }
}

/// Read the body of a successful response and decode it into `T`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let url = response.url().to_owned();
    let text = response
        .text()
        .await
        .map_err(|e| Error::ApiError(format!("Error reading API response: {}", e)))?;

    log::trace!("url: {}, response_text: {}", url, text);

    serde_json::from_str::<T>(&text).map_err(|e| Error::InvalidResponse(text, e.to_string()))
}

/// Obtain a fresh bearer token with the password grant.
pub async fn authenticate(client: &Client, api: &model::Api) -> Result<model::AccessToken, Error> {
    let url = format!("{}{}", api.api_url, endpoint::TOKEN);

    let request_body = HashMap::from([
        ("grant_type", "password"),
        ("username", api.username.as_str()),
        ("password", api.password.as_str()),
    ]);

    let response = client
        .post(url)
        .form(&request_body)
        .send()
        .await
        .map_err(|e| Error::LoginError(e.to_string()))?
        .error_for_status()
        .map_err(|e| match map_api_err(e) {
            Error::ApiError(s) => Error::LoginError(s),
            other => other,
        })?;

    decode::<Token>(response)
        .await
        .map(|token| model::AccessToken(token.access_token))
}

/// Fetch the installation's energy sensor data within `window`.
pub async fn energy_sensor_data(
    client: &Client,
    api: &model::Api,
    token: &model::AccessToken,
    window: &model::TelemetryWindow,
) -> Result<EnergySensorData, Error> {
    let url = format!(
        "{}{}",
        api.api_url,
        endpoint::energy_sensor_data(&api.installation_id)
    );

    log::debug!(
        "Fetching energy sensor data of installation {} from {} to {}",
        api.installation_id,
        window.from_param(),
        window.to_param()
    );

    let response = client
        .get(url)
        .query(&[("from", window.from_param()), ("to", window.to_param())])
        .bearer_auth(&token.0)
        .send()
        .await
        .map_err(map_api_err)?
        .error_for_status()
        .map_err(map_api_err)?;

    decode::<EnergySensorData>(response).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::response::test::read_resource;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server, ServerGuard};

    fn test_api(server: &ServerGuard) -> model::Api {
        api(
            server.url(),
            "user@example.com".to_string(),
            "secret".to_string(),
            "inst-1".to_string(),
        )
    }

    fn window() -> model::TelemetryWindow {
        model::TelemetryWindow::ending_at(Utc.with_ymd_and_hms(2021, 11, 14, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn authenticate_posts_password_grant() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "password".into()),
                Matcher::UrlEncoded("username".into(), "user@example.com".into()),
                Matcher::UrlEncoded("password".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(read_resource("token.json"))
            .create_async()
            .await;

        let token = authenticate(&Client::new(), &test_api(&server)).await.unwrap();
        assert_eq!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.payload.signature", token.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn authenticate_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth/token")
            .with_status(400)
            .with_body(read_resource("token_missing_access_token.json"))
            .create_async()
            .await;

        let result = authenticate(&Client::new(), &test_api(&server)).await;
        assert!(matches!(result, Err(Error::LoginError(_))));
    }

    #[tokio::test]
    async fn authenticate_without_access_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(read_resource("token_missing_access_token.json"))
            .create_async()
            .await;

        let result = authenticate(&Client::new(), &test_api(&server)).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_, _))));
    }

    #[tokio::test]
    async fn energy_sensor_data_sends_window_and_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/installation/inst-1/energySensorData".to_string()),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "2021-11-14T09:00:00.000Z".into()),
                Matcher::UrlEncoded("to".into(), "2021-11-14T12:00:00.000Z".into()),
            ]))
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(read_resource("energySensorData.json"))
            .create_async()
            .await;

        let token = model::AccessToken("abc".to_string());
        let data = energy_sensor_data(&Client::new(), &test_api(&server), &token, &window())
            .await
            .unwrap();
        assert_eq!(5, data.readings.len());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn energy_sensor_data_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/installation/inst-1/energySensorData".to_string()),
            )
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let token = model::AccessToken("expired".to_string());
        let result = energy_sensor_data(&Client::new(), &test_api(&server), &token, &window()).await;
        assert!(matches!(result, Err(Error::LoginError(_))));
    }

    #[tokio::test]
    async fn energy_sensor_data_rate_exceeded() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/installation/inst-1/energySensorData".to_string()),
            )
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let token = model::AccessToken("abc".to_string());
        let result = energy_sensor_data(&Client::new(), &test_api(&server), &token, &window()).await;
        assert!(matches!(result, Err(Error::RateExceeded(_))));
    }

    #[tokio::test]
    async fn energy_sensor_data_malformed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/installation/inst-1/energySensorData".to_string()),
            )
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(read_resource("energySensorData_missing_total_energy.json"))
            .create_async()
            .await;

        let token = model::AccessToken("abc".to_string());
        let result = energy_sensor_data(&Client::new(), &test_api(&server), &token, &window()).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_, _))));
    }
}
