//! Wire formats of the storefront REST API.
//!
//! Every response is an envelope `{ data, error }`. These types stay private
//! to the transport; callers only see `usercart_core` types.

use serde::{Deserialize, Serialize};
use usercart_core::{CartId, CartItem, ItemId, UserId, UserProfile};

use super::ApiError;

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload, absent on failure.
    pub data: Option<T>,
    /// Error value; `null` or absent on success.
    pub error: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    /// Fail if the envelope carries an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Remote` when `error` is present and not `null`.
    pub fn check(&self) -> Result<(), ApiError> {
        match &self.error {
            None | Some(serde_json::Value::Null) => Ok(()),
            Some(value) => Err(ApiError::Remote(describe_error(value))),
        }
    }

    /// Extract the payload.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Remote` when the envelope carries an error or has
    /// no data.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.check()?;
        self.data
            .ok_or_else(|| ApiError::Remote("response has no data".to_string()))
    }
}

/// Render an error value for messages: strings as-is, objects by their
/// `message` field, anything else as JSON.
fn describe_error(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| value.to_string(), str::to_string),
        other => other.to_string(),
    }
}

/// `data` of `GET /v2/user/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub cart_id: String,
}

/// One element of `data` in `GET /v2/cart/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemData {
    pub id: String,
    pub name: String,
}

impl From<UserData> for UserProfile {
    fn from(data: UserData) -> Self {
        Self::new(UserId::from(data.id), data.name, CartId::from(data.cart_id))
    }
}

impl From<CartItemData> for CartItem {
    fn from(data: CartItemData) -> Self {
        Self::new(ItemId::from(data.id), data.name)
    }
}

/// Response of the profile endpoint.
pub type UserResponse = Envelope<UserData>;

/// Response of the cart endpoint.
pub type CartResponse = Envelope<Vec<CartItemData>>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_maps_cart_id() {
        let body = r#"{"data":{"id":"u1","name":"Ann","cart_id":"c1"},"error":null}"#;
        let response: UserResponse = serde_json::from_str(body).unwrap();
        let profile = UserProfile::from(response.into_data().unwrap());

        assert_eq!(profile.id.as_str(), "u1");
        assert_eq!(profile.display_name, "Ann");
        assert_eq!(profile.cart_id.as_str(), "c1");
    }

    #[test]
    fn test_cart_response_preserves_order() {
        let body = r#"{"data":[{"id":"p1","name":"Shoes"},{"id":"p2","name":"Shirt"}]}"#;
        let response: CartResponse = serde_json::from_str(body).unwrap();
        let items: Vec<CartItem> = response
            .into_data()
            .unwrap()
            .into_iter()
            .map(CartItem::from)
            .collect();

        assert_eq!(
            items,
            vec![CartItem::new("p1", "Shoes"), CartItem::new("p2", "Shirt")]
        );
    }

    #[test]
    fn test_error_string_is_remote_error() {
        let body = r#"{"data":null,"error":"user suspended"}"#;
        let response: UserResponse = serde_json::from_str(body).unwrap();
        let err = response.into_data().unwrap_err();
        assert!(matches!(err, ApiError::Remote(msg) if msg == "user suspended"));
    }

    #[test]
    fn test_error_object_uses_message() {
        let body = r#"{"data":[],"error":{"message":"cart expired","code":410}}"#;
        let response: CartResponse = serde_json::from_str(body).unwrap();
        let err = response.into_data().unwrap_err();
        assert!(matches!(err, ApiError::Remote(msg) if msg == "cart expired"));
    }

    #[test]
    fn test_error_without_message_is_serialized() {
        let value = serde_json::json!({ "code": 7 });
        assert_eq!(describe_error(&value), r#"{"code":7}"#);
    }

    #[test]
    fn test_missing_data_is_remote_error() {
        let response: CartResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(response.into_data(), Err(ApiError::Remote(_))));
    }
}
