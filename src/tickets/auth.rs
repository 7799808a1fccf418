//! OAuth-style token exchange for the ticketing API.
//!
//! Supports client-credentials and password grants; which one to use is
//! deployment configuration. A non-success response becomes a descriptive
//! `TokenRejected` error — no token is never a crash.

use crate::types::{GrantType, TicketsConfig};

use super::{BearerToken, TicketApiError};

/// Exchange configured credentials for a bearer token.
pub async fn exchange_token(
    client: &reqwest::Client,
    config: &TicketsConfig,
) -> Result<BearerToken, TicketApiError> {
    let mut form: Vec<(&str, &str)> = vec![
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];
    match config.grant_type {
        GrantType::ClientCredentials => {
            form.push(("grant_type", "client_credentials"));
        }
        GrantType::Password => {
            form.push(("grant_type", "password"));
            form.push(("username", config.username.as_deref().unwrap_or_default()));
            form.push(("password", config.password.as_deref().unwrap_or_default()));
        }
    }

    let resp = client.post(&config.token_url).form(&form).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(TicketApiError::TokenRejected(format!(
            "HTTP {} from {}: {}",
            status,
            config.token_url,
            body.chars().take(200).collect::<String>()
        )));
    }

    let body: serde_json::Value = resp.json().await?;
    parse_token_response(&body)
}

/// Pull `access_token` out of a token response.
pub fn parse_token_response(body: &serde_json::Value) -> Result<BearerToken, TicketApiError> {
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| TicketApiError::InvalidResponse("no access_token in response".into()))?
        .to_string();
    Ok(BearerToken { access_token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn tickets_config(token_url: String, grant_type: GrantType) -> TicketsConfig {
        TicketsConfig {
            base_url: "https://api.tickets.example.com".to_string(),
            token_url,
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            grant_type,
            username: Some("svc".to_string()),
            password: Some("pw".to_string()),
            page_size: 100,
        }
    }

    #[test]
    fn test_parse_token_response() {
        let body = serde_json::json!({ "access_token": "abc123", "expires_in": 3600 });
        let token = parse_token_response(&body).unwrap();
        assert_eq!(token.access_token, "abc123");
    }

    #[test]
    fn test_parse_token_response_missing_token() {
        let body = serde_json::json!({ "error": "invalid_client" });
        let err = parse_token_response(&body).unwrap_err();
        assert!(matches!(err, TicketApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_rejected_exchange_is_descriptive() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf);
                let body = r#"{"error":"invalid_client"}"#;
                let response = format!(
                    "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        let config = tickets_config(format!("http://{}/token", addr), GrantType::ClientCredentials);
        let client = reqwest::Client::new();
        match exchange_token(&client, &config).await {
            Err(TicketApiError::TokenRejected(msg)) => {
                assert!(msg.contains("401"), "{}", msg);
                assert!(msg.contains("invalid_client"), "{}", msg);
            }
            other => panic!("expected TokenRejected, got {:?}", other.map(|t| t.access_token)),
        }
    }
}
