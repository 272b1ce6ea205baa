use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::client::ApiClient;
use crate::envelope::ApiEnvelope;
use crate::error::ClientError;
use crate::transport::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Clients,
    Invoices,
    Payments,
    Schools,
    JobSheets,
    ForeignStudyPartners,
    Travels,
    Notifications,
}

impl Resource {
    pub const ALL: &'static [Resource] = &[
        Resource::Users,
        Resource::Clients,
        Resource::Invoices,
        Resource::Payments,
        Resource::Schools,
        Resource::JobSheets,
        Resource::ForeignStudyPartners,
        Resource::Travels,
        Resource::Notifications,
    ];

    /// Collection path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Clients => "clients",
            Resource::Invoices => "invoices",
            Resource::Payments => "payments",
            Resource::Schools => "schools",
            Resource::JobSheets => "job-sheets",
            Resource::ForeignStudyPartners => "foreign-study-partners",
            Resource::Travels => "travels",
            Resource::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .iter()
            .copied()
            .find(|resource| resource.path() == wanted)
            .ok_or_else(|| ClientError::UnknownResource(s.to_string()))
    }
}

/// CRUD calls for one resource; every method is a single client call.
#[derive(Debug, Clone, Copy)]
pub struct ResourceApi<'a> {
    client: &'a ApiClient,
    resource: Resource,
}

impl ApiClient {
    pub fn resource(&self, resource: Resource) -> ResourceApi<'_> {
        ResourceApi {
            client: self,
            resource,
        }
    }
}

impl<'a> ResourceApi<'a> {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub async fn list(&self) -> ApiEnvelope {
        self.call(HttpMethod::Get, None, None).await
    }

    pub async fn show(&self, id: &str) -> ApiEnvelope {
        self.call(HttpMethod::Get, Some(id), None).await
    }

    pub async fn create(&self, body: Value) -> ApiEnvelope {
        self.call(HttpMethod::Post, None, Some(body)).await
    }

    pub async fn update(&self, id: &str, body: Value) -> ApiEnvelope {
        self.call(HttpMethod::Put, Some(id), Some(body)).await
    }

    pub async fn remove(&self, id: &str) -> ApiEnvelope {
        self.call(HttpMethod::Delete, Some(id), None).await
    }

    pub fn url(&self, id: Option<&str>) -> Result<url::Url, ClientError> {
        match id {
            Some(id) => self.client.endpoint(&[self.resource.path(), id]),
            None => self.client.endpoint(&[self.resource.path()]),
        }
    }

    async fn call(&self, method: HttpMethod, id: Option<&str>, body: Option<Value>) -> ApiEnvelope {
        match self.url(id) {
            Ok(url) => self.client.request(method, url.as_str(), body).await,
            Err(e) => {
                tracing::error!(resource = %self.resource, "{}", e);
                ApiEnvelope::network_failure()
            }
        }
    }
}
