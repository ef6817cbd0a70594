//! REST client for the external record service

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

use crate::config::RecordServiceSettings;
use crate::traits::*;
use crate::types::*;

/// Record service backed by the back-office REST API
///
/// No request is retried; failures surface to the caller as
/// [`ReceivingError::Transport`].
#[derive(Debug, Clone)]
pub struct HttpRecordService {
    client: Client,
    base_url: Url,
}

fn transport_error(url: &Url, error: reqwest::Error) -> ReceivingError {
    tracing::error!(url = %url, error = %error, "record service request failed");
    ReceivingError::Transport(format!("request to {} failed: {}", url, error))
}

/// Turn a non-success response into a transport error carrying the body
async fn check_status(url: &Url, response: Response) -> ReceivingResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(url = %url, status = %status, "record service returned an error");
    Err(ReceivingError::Transport(format!(
        "{} returned {}: {}",
        url, status, body
    )))
}

impl HttpRecordService {
    /// Create a client for the configured backend
    pub fn new(settings: &RecordServiceSettings) -> ReceivingResult<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ReceivingError::InvalidField(format!(
                "Invalid record service URL '{}': {}",
                settings.base_url, e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ReceivingError::InvalidField(format!(
                "Record service URL '{}' cannot be used as a base",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ReceivingError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each segment
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn get_purchase_order(&self, po_number: &str) -> ReceivingResult<Option<PurchaseOrder>> {
        let url = self.endpoint(&["purchase-orders", po_number]);
        tracing::debug!(url = %url, "fetching purchase order");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let purchase_order = check_status(&url, response)
            .await?
            .json::<PurchaseOrder>()
            .await
            .map_err(|e| transport_error(&url, e))?;

        Ok(Some(purchase_order))
    }

    async fn list_receipt_documents(
        &self,
        po_number: &str,
    ) -> ReceivingResult<Vec<ReceiptDocument>> {
        let url = self.endpoint(&["receipt-documents"]);
        tracing::debug!(url = %url, po_number = %po_number, "listing receipt documents");

        let response = self
            .client
            .get(url.clone())
            .query(&[("poNumber", po_number)])
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        check_status(&url, response)
            .await?
            .json::<Vec<ReceiptDocument>>()
            .await
            .map_err(|e| transport_error(&url, e))
    }

    async fn create_receipt_document(
        &mut self,
        document: &ReceiptDocument,
    ) -> ReceivingResult<ReceiptDocument> {
        let url = self.endpoint(&["receipt-documents"]);

        let response = self
            .client
            .post(url.clone())
            .json(document)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        // The backend repeats the remaining-quantity check at write time
        if response.status() == StatusCode::CONFLICT {
            let reason = response.text().await.unwrap_or_default();
            tracing::warn!(
                po_number = %document.po_number,
                document_number = %document.document_number,
                "record service rejected receipt as stale"
            );
            return Err(ReceivingError::StaleRemainingQuantity {
                po_number: document.po_number.clone(),
                reason,
            });
        }

        check_status(&url, response)
            .await?
            .json::<ReceiptDocument>()
            .await
            .map_err(|e| transport_error(&url, e))
    }

    async fn get_receipt_document(
        &self,
        document_number: &str,
    ) -> ReceivingResult<Option<ReceiptDocument>> {
        let url = self.endpoint(&["receipt-documents", document_number]);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document = check_status(&url, response)
            .await?
            .json::<ReceiptDocument>()
            .await
            .map_err(|e| transport_error(&url, e))?;

        Ok(Some(document))
    }

    async fn update_receipt_metadata(
        &mut self,
        document_number: &str,
        metadata: &ReceiptMetadata,
    ) -> ReceivingResult<ReceiptDocument> {
        let url = self.endpoint(&["receipt-documents", document_number]);

        let response = self
            .client
            .patch(url.clone())
            .json(metadata)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReceivingError::ReceiptNotFound(document_number.to_string()));
        }

        check_status(&url, response)
            .await?
            .json::<ReceiptDocument>()
            .await
            .map_err(|e| transport_error(&url, e))
    }
}
