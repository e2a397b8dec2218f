use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use volo_shared::{CruiseOffer, FlightOffer};

const SYSTEM_PROMPT: &str = "You are a travel deal validator. Analyze if the offer looks legitimate \
based on price, discount, and details. Respond only with 'valid' or 'suspicious'.";

/// The parts of an offer a classifier gets to see.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferDigest {
    pub summary: String,
    pub original_price: f64,
    pub current_price: f64,
    pub discount_percentage: f64,
}

impl OfferDigest {
    pub fn prompt(&self) -> String {
        format!(
            "Validate this offer: {}, Original: ${:.2}, Current: ${:.2}, Discount: {:.1}%",
            self.summary, self.original_price, self.current_price, self.discount_percentage
        )
    }
}

impl From<&FlightOffer> for OfferDigest {
    fn from(offer: &FlightOffer) -> Self {
        Self {
            summary: format!(
                "{} {} from {} to {}",
                offer.airline, offer.flight_number, offer.departure_airport, offer.arrival_airport
            ),
            original_price: offer.original_price,
            current_price: offer.current_price,
            discount_percentage: offer.discount_percentage,
        }
    }
}

impl From<&CruiseOffer> for OfferDigest {
    fn from(offer: &CruiseOffer) -> Self {
        Self {
            summary: format!(
                "{} {} from {}, {} nights, {} cabin",
                offer.cruise_line, offer.ship_name, offer.departure_port, offer.duration_nights, offer.cabin_type
            ),
            original_price: offer.original_price,
            current_price: offer.current_price,
            discount_percentage: offer.discount_percentage,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier api error status={status} body={body}")]
    Api { status: u16, body: String },

    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),
}

/// Best-effort authenticity check for a single offer.
#[async_trait]
pub trait AuthenticityValidator: Send + Sync {
    async fn classify(&self, digest: &OfferDigest) -> Result<bool, ValidationError>;
}

/// Result-or-default: a failed classification counts as authentic.
pub async fn authenticity_or_default(validator: &dyn AuthenticityValidator, digest: &OfferDigest) -> bool {
    match validator.classify(digest).await {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!("Authenticity validation failed: {}, defaulting to authentic", e);
            true
        }
    }
}

/// Used when no classifier is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

#[async_trait]
impl AuthenticityValidator for AcceptAll {
    async fn classify(&self, _digest: &OfferDigest) -> Result<bool, ValidationError> {
        Ok(true)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Classifier backed by an OpenAI-compatible chat-completions endpoint.
pub struct ChatClassifier {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClassifier {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self, ValidationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl AuthenticityValidator for ChatClassifier {
    async fn classify(&self, digest: &OfferDigest) -> Result<bool, ValidationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: digest.prompt() },
            ],
            max_tokens: 10,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ValidationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ValidationError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ValidationError::InvalidResponse("empty choices".to_string()))?;

        Ok(parse_verdict(&content))
    }
}

/// Authentic when the reply says "valid" and not "invalid".
fn parse_verdict(reply: &str) -> bool {
    reply.trim().to_lowercase().contains("valid") && !reply.to_lowercase().contains("invalid")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    #[async_trait]
    impl AuthenticityValidator for Unreachable {
        async fn classify(&self, _digest: &OfferDigest) -> Result<bool, ValidationError> {
            Err(ValidationError::InvalidResponse("connection refused".to_string()))
        }
    }

    struct Suspicious;

    #[async_trait]
    impl AuthenticityValidator for Suspicious {
        async fn classify(&self, _digest: &OfferDigest) -> Result<bool, ValidationError> {
            Ok(false)
        }
    }

    fn digest() -> OfferDigest {
        OfferDigest {
            summary: "Delta DL123 from JFK to LAX".to_string(),
            original_price: 1200.0,
            current_price: 300.0,
            discount_percentage: 75.0,
        }
    }

    #[tokio::test]
    async fn test_failed_classification_defaults_to_authentic() {
        assert!(authenticity_or_default(&Unreachable, &digest()).await);
    }

    #[tokio::test]
    async fn test_verdict_passes_through() {
        assert!(!authenticity_or_default(&Suspicious, &digest()).await);
        assert!(authenticity_or_default(&AcceptAll, &digest()).await);
    }

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict("valid"));
        assert!(parse_verdict(" Valid.\n"));
        assert!(!parse_verdict("suspicious"));
        assert!(!parse_verdict("invalid"));
    }

    #[test]
    fn test_prompt_format() {
        assert_eq!(
            digest().prompt(),
            "Validate this offer: Delta DL123 from JFK to LAX, Original: $1200.00, Current: $300.00, Discount: 75.0%"
        );
    }
}
