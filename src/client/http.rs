//! Typed client for the JSON API.

use crate::{
    api::Resource,
    client::form::{FormMode, GuruInput, JadwalInput, ProductInput, TransactionInput},
    entities::{guru, product},
    errors::{Error, Result},
    models::{ApiMessage, JadwalDetail, TransactionDetail},
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
struct FailureBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for one API deployment, e.g. `http://localhost:8080/api`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the API route at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// The API route this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, resource: Resource, id: Option<i64>) -> RequestBuilder {
        let mut query = vec![("endpoint", resource.endpoint().to_string())];
        if let Some(id) = id {
            query.push(("id", id.to_string()));
        }
        self.http.request(method, &self.base_url).query(&query)
    }

    /// Sends a request and decodes a success body.
    ///
    /// A non-2xx answer becomes [`Error::Api`] carrying the server's `error`,
    /// else its `message`, else the status text.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<FailureBody>().await.unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
        debug!(status = status.as_u16(), %message, "API request failed");
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        self.send(self.request(Method::GET, resource, None)).await
    }

    async fn get<T: DeserializeOwned>(&self, resource: Resource, id: i64) -> Result<T> {
        self.send(self.request(Method::GET, resource, Some(id))).await
    }

    #[instrument(skip(self, body), fields(endpoint = resource.endpoint()))]
    async fn save<B: Serialize + Sync>(
        &self,
        resource: Resource,
        mode: FormMode,
        body: &B,
    ) -> Result<ApiMessage> {
        let request = match mode {
            FormMode::Create => self.request(Method::POST, resource, None),
            FormMode::Update(id) => self.request(Method::PUT, resource, Some(id)),
        };
        self.send(request.json(body)).await
    }

    #[instrument(skip(self), fields(endpoint = resource.endpoint()))]
    async fn delete(&self, resource: Resource, id: i64) -> Result<ApiMessage> {
        self.send(self.request(Method::DELETE, resource, Some(id)))
            .await
    }

    /// All products, newest first.
    pub async fn list_products(&self) -> Result<Vec<product::Model>> {
        self.list(Resource::Products).await
    }

    /// One product.
    pub async fn get_product(&self, id: i64) -> Result<product::Model> {
        self.get(Resource::Products, id).await
    }

    /// Creates or updates a product.
    pub async fn save_product(&self, mode: FormMode, input: &ProductInput) -> Result<ApiMessage> {
        self.save(Resource::Products, mode, input).await
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: i64) -> Result<ApiMessage> {
        self.delete(Resource::Products, id).await
    }

    /// All transactions with product name and price.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionDetail>> {
        self.list(Resource::Transactions).await
    }

    /// One transaction.
    pub async fn get_transaction(&self, id: i64) -> Result<TransactionDetail> {
        self.get(Resource::Transactions, id).await
    }

    /// Creates or updates a transaction.
    pub async fn save_transaction(
        &self,
        mode: FormMode,
        input: &TransactionInput,
    ) -> Result<ApiMessage> {
        self.save(Resource::Transactions, mode, input).await
    }

    /// Deletes a transaction.
    pub async fn delete_transaction(&self, id: i64) -> Result<ApiMessage> {
        self.delete(Resource::Transactions, id).await
    }

    /// All teachers.
    pub async fn list_gurus(&self) -> Result<Vec<guru::Model>> {
        self.list(Resource::Guru).await
    }

    /// One teacher.
    pub async fn get_guru(&self, id: i64) -> Result<guru::Model> {
        self.get(Resource::Guru, id).await
    }

    /// Creates or updates a teacher.
    pub async fn save_guru(&self, mode: FormMode, input: &GuruInput) -> Result<ApiMessage> {
        self.save(Resource::Guru, mode, input).await
    }

    /// Deletes a teacher.
    pub async fn delete_guru(&self, id: i64) -> Result<ApiMessage> {
        self.delete(Resource::Guru, id).await
    }

    /// All schedule slots with teacher names.
    pub async fn list_jadwal(&self) -> Result<Vec<JadwalDetail>> {
        self.list(Resource::Jadwal).await
    }

    /// One schedule slot.
    pub async fn get_jadwal(&self, id: i64) -> Result<JadwalDetail> {
        self.get(Resource::Jadwal, id).await
    }

    /// Creates or updates a schedule slot.
    pub async fn save_jadwal(&self, mode: FormMode, input: &JadwalInput) -> Result<ApiMessage> {
        self.save(Resource::Jadwal, mode, input).await
    }

    /// Deletes a schedule slot.
    pub async fn delete_jadwal(&self, id: i64) -> Result<ApiMessage> {
        self.delete(Resource::Jadwal, id).await
    }
}
