//! Integration tests for Clearspring.
//!
//! These tests drive a running `clearspring-web` server over HTTP. They are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server with staff accounts configured
//! ADMIN_USERNAME=boss ADMIN_PASSWORD=secret \
//! MANAGER_USERNAME=mgr1 MANAGER_PASSWORD=pw \
//!     cargo run -p clearspring-web
//!
//! # In another shell, with the same credentials exported
//! cargo test -p clearspring-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `CLEARSPRING_TEST_URL` - Server under test (default: `http://localhost:5000`)
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Admin account on that server
//! - `MANAGER_USERNAME` / `MANAGER_PASSWORD` - Manager account on that server

use reqwest::{Client, Response, header};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CLEARSPRING_TEST_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Staff credentials read from `<PREFIX>_USERNAME` / `<PREFIX>_PASSWORD`.
#[must_use]
pub fn staff_credentials(prefix: &str) -> Option<(String, String)> {
    let username = std::env::var(format!("{prefix}_USERNAME")).ok()?;
    let password = std::env::var(format!("{prefix}_PASSWORD")).ok()?;
    Some((username, password))
}

/// A phone number no other test run will have used.
#[must_use]
pub fn unique_phone() -> String {
    let id: String = uuid::Uuid::new_v4().simple().to_string().chars().take(12).collect();
    format!("test-{id}")
}

/// The `Location` header of a redirect response, or an empty string.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Order IDs linked from a page (`href="/orders/<id>"`), in page order.
#[must_use]
pub fn linked_order_ids(body: &str) -> Vec<i64> {
    body.split("href=\"/orders/")
        .skip(1)
        .filter_map(|rest| rest.split('"').next()?.parse().ok())
        .collect()
}

/// A browser-like client: keeps cookies, does not follow redirects.
pub struct Browser {
    client: Client,
    base_url: String,
}

impl Browser {
    /// Create a client with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(),
        })
    }

    /// `GET` a path on the server under test.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the request fails.
    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
    }

    /// `POST` a url-encoded form to a path on the server under test.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the request fails.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
    }

    /// Start a customer session for `phone`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the request fails.
    pub async fn continue_as(&self, phone: &str) -> Result<Response, reqwest::Error> {
        self.post_form("/continue", &[("phone", phone)]).await
    }

    /// Log in as a staff member.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the request fails.
    pub async fn staff_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Response, reqwest::Error> {
        self.post_form(
            "/staff/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Place an order from the customer dashboard form.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the request fails.
    pub async fn place_order(&self, address: &str, cans: &str) -> Result<Response, reqwest::Error> {
        self.post_form(
            "/customer/orders",
            &[
                ("address", address),
                ("cans", cans),
                ("payment_method", "offline"),
            ],
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_order_ids() {
        let body = r#"<a href="/orders/12">12</a> <a href="/staff">x</a> <a href="/orders/7">7</a>"#;
        assert_eq!(linked_order_ids(body), vec![12, 7]);
        assert!(linked_order_ids("<p>No orders yet.</p>").is_empty());
    }

    #[test]
    fn test_unique_phone_is_short_and_unique() {
        let a = unique_phone();
        assert!(a.len() <= 30);
        assert_ne!(a, unique_phone());
    }
}
