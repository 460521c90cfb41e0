//! # Exchange-Rate Gateway
//!
//! Fetches the current dollar sell quote stamped on lote lines.
//!
//! ```text
//! ┌──────────────┐   GET (no auth, no retry)   ┌──────────────────────────┐
//! │ LoteWorkflow │ ──────────────────────────► │ quote endpoint           │
//! │              │ ◄────────────────────────── │ {"venta": 13.57, ...}    │
//! └──────────────┘        Quote / error        └──────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use inventario_core::ExchangeRate;

/// One quote as published by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Sell price, the value lote lines are stamped with.
    pub venta: f64,

    #[serde(default)]
    pub compra: Option<f64>,

    #[serde(default)]
    pub moneda: String,

    #[serde(default)]
    pub casa: String,

    #[serde(default)]
    pub nombre: String,

    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Quote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Quote endpoint returned status {0}")]
    Status(u16),

    #[error("Quote body could not be decoded: {0}")]
    Decode(String),

    #[error("Quote value {0} is not a usable rate")]
    InvalidQuote(f64),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait ExchangeRateGateway: Send + Sync {
    async fn fetch_quote(&self) -> GatewayResult<Quote>;

    /// Sell price as a rate in hundredths.
    async fn fetch_rate(&self) -> GatewayResult<ExchangeRate> {
        let quote = self.fetch_quote().await?;
        ExchangeRate::from_quote(quote.venta).ok_or(GatewayError::InvalidQuote(quote.venta))
    }
}

// =============================================================================
// HTTP gateway
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpExchangeRateGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpExchangeRateGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpExchangeRateGateway {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExchangeRateGateway for HttpExchangeRateGateway {
    async fn fetch_quote(&self) -> GatewayResult<Quote> {
        debug!(url = %self.url, "Fetching exchange-rate quote");

        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Quote endpoint error");
            return Err(GatewayError::Status(status.as_u16()));
        }

        let quote = resp
            .json::<Quote>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        debug!(venta = quote.venta, casa = %quote.casa, "Quote received");
        Ok(quote)
    }
}

// =============================================================================
// Fixed gateway
// =============================================================================

/// In-process gateway with a settable quote. Counts calls.
#[derive(Debug)]
pub struct FixedExchangeRate {
    venta_bits: AtomicU64,
    available: AtomicBool,
    calls: AtomicUsize,
}

impl FixedExchangeRate {
    pub fn new(venta: f64) -> Self {
        FixedExchangeRate {
            venta_bits: AtomicU64::new(venta.to_bits()),
            available: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// A gateway whose every fetch fails.
    pub fn unavailable() -> Self {
        let gateway = Self::new(0.0);
        gateway.set_available(false);
        gateway
    }

    pub fn set_venta(&self, venta: f64) {
        self.venta_bits.store(venta.to_bits(), Ordering::SeqCst);
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateGateway for FixedExchangeRate {
    async fn fetch_quote(&self) -> GatewayResult<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(GatewayError::Status(503));
        }

        Ok(Quote {
            venta: f64::from_bits(self.venta_bits.load(Ordering::SeqCst)),
            compra: None,
            moneda: "USD".to_string(),
            casa: "fixed".to_string(),
            nombre: "Fixed".to_string(),
            fecha_actualizacion: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn gateway(base: &str, path: &str) -> HttpExchangeRateGateway {
        HttpExchangeRateGateway::new(format!("{base}{path}"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_http_quote_ok() {
        let router = Router::new().route(
            "/v1/dolares/binance",
            get(|| async {
                axum::Json(serde_json::json!({
                    "moneda": "USD",
                    "casa": "binance",
                    "nombre": "Binance",
                    "compra": 13.4,
                    "venta": 13.57,
                    "fechaActualizacion": "2024-12-01T12:00:00.000Z"
                }))
            }),
        );
        let base = serve(router).await;
        let gw = gateway(&base, "/v1/dolares/binance");

        let quote = gw.fetch_quote().await.unwrap();
        assert_eq!(quote.casa, "binance");
        assert_eq!(quote.compra, Some(13.4));
        assert_eq!(gw.fetch_rate().await.unwrap(), ExchangeRate::from_hundredths(1357));
    }

    #[tokio::test]
    async fn test_http_server_error() {
        let router = Router::new().route(
            "/q",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(router).await;

        let err = gateway(&base, "/q").fetch_quote().await.unwrap_err();
        assert!(matches!(err, GatewayError::Status(500)));
    }

    #[tokio::test]
    async fn test_http_bad_body() {
        let router = Router::new().route("/q", get(|| async { "{\"precio\": 1}" }));
        let base = serve(router).await;

        let err = gateway(&base, "/q").fetch_quote().await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_positive_quote_rejected() {
        let gw = FixedExchangeRate::new(0.0);
        assert!(matches!(
            gw.fetch_rate().await,
            Err(GatewayError::InvalidQuote(_))
        ));
    }

    #[tokio::test]
    async fn test_fixed_gateway_counts_calls() {
        let gw = FixedExchangeRate::new(6.96);
        assert_eq!(gw.fetch_rate().await.unwrap(), ExchangeRate::from_hundredths(696));

        gw.set_available(false);
        assert!(gw.fetch_quote().await.is_err());
        assert_eq!(gw.calls(), 2);
    }
}
