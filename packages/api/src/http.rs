//! `reqwest`-backed implementation of [`RestaurantApi`].
//!
//! Each call is a single HTTP attempt. Any non-2xx status is an error and
//! is never retried here.

use async_trait::async_trait;
use restaurant_map_restaurant_models::{
    CreateRestaurant, CreateRestaurantResponse, ListRestaurantsResponse, Restaurant,
};

use crate::{ApiConfig, ApiError, RestaurantApi};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// HTTP client for the restaurants service.
#[derive(Debug, Clone)]
pub struct HttpRestaurantApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpRestaurantApi {
    /// Builds a client for the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying HTTP client cannot be
    /// constructed (e.g. TLS backend initialization fails).
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("restaurant-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the config this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl RestaurantApi for HttpRestaurantApi {
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.config.restaurants_url();
        log::debug!("GET {url}");
        let body = send_json(self.client.get(&url)).await?;
        parse_list(body)
    }

    async fn create_restaurant(
        &self,
        input: &CreateRestaurant,
    ) -> Result<CreateRestaurantResponse, ApiError> {
        let url = self.config.restaurants_url();
        log::debug!("POST {url} name={:?} at {}", input.name, input.coordinate());
        let body = send_json(self.client.post(&url).json(input)).await?;
        parse_create(body)
    }
}

/// Sends `request` once and parses the body as JSON.
async fn send_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, ApiError> {
    let response = request.send().await?;

    let url = response.url().to_string();
    let status = response.status();
    if !status.is_success() {
        log::warn!("HTTP {status} from {url}");
        return Err(ApiError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::warn!(
            "JSON parse failed.\n  \
             url: {url}\n  \
             status: {status}\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {preview}",
            text.len(),
        );
        ApiError::Parse {
            message: format!("JSON parse failed: {e} (status={status})"),
        }
    })
}

/// Extracts the restaurant list from a `{ data: [...] }` envelope.
fn parse_list(body: serde_json::Value) -> Result<Vec<Restaurant>, ApiError> {
    serde_json::from_value::<ListRestaurantsResponse>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| ApiError::Parse {
            message: format!("unexpected list envelope: {e}"),
        })
}

/// Parses a `{ data, success, message }` create envelope.
///
/// An accepted create must carry the created record.
fn parse_create(body: serde_json::Value) -> Result<CreateRestaurantResponse, ApiError> {
    let envelope: CreateRestaurantResponse =
        serde_json::from_value(body).map_err(|e| ApiError::Parse {
            message: format!("unexpected create envelope: {e}"),
        })?;

    if envelope.success && envelope.data.is_none() {
        return Err(ApiError::Parse {
            message: "create succeeded without returning the restaurant".to_string(),
        });
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_body() {
        let body = serde_json::json!({
            "data": [
                {
                    "id": "1",
                    "name": "Pasta Place",
                    "description": "Fresh pasta",
                    "category": "italian",
                    "rating": 4.5,
                    "latitude": 40.71,
                    "longitude": -74.0,
                    "created_at": "2024-03-01T12:00:00Z"
                },
                {
                    "id": "2",
                    "name": "Taco Town",
                    "description": "",
                    "category": "mexican",
                    "rating": 3.8,
                    "latitude": 40.72,
                    "longitude": -73.99,
                    "created_at": "2024-03-02T12:00:00Z"
                }
            ]
        });
        let restaurants = parse_list(body).unwrap();
        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].description(), Some("Fresh pasta"));
        assert_eq!(restaurants[1].description(), None);
    }

    #[test]
    fn list_without_data_is_parse_error() {
        let body = serde_json::json!({ "items": [] });
        assert!(matches!(parse_list(body), Err(ApiError::Parse { .. })));
    }

    #[test]
    fn parses_accepted_create() {
        let body = serde_json::json!({
            "data": {
                "id": "9",
                "name": "New Spot",
                "description": "",
                "category": "american",
                "rating": 5,
                "latitude": 40.0,
                "longitude": -73.9,
                "created_at": "2024-03-03T08:30:00Z"
            },
            "success": true,
            "message": "Restaurant created"
        });
        let resp = parse_create(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap().id, "9");
        assert_eq!(resp.message, "Restaurant created");
    }

    #[test]
    fn accepted_create_without_record_is_parse_error() {
        let body = serde_json::json!({ "data": null, "success": true, "message": "ok" });
        assert!(matches!(parse_create(body), Err(ApiError::Parse { .. })));
    }

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
        };
        let api = HttpRestaurantApi::new(config).unwrap();
        assert!(matches!(
            api.fetch_restaurants().await,
            Err(ApiError::Http(_))
        ));
    }
}
