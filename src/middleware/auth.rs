use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Authenticated caller, partitioned by silo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Back-office: approves, rejects, reports
    Admin,
    /// Event organizer or transport partner, scoped to its own id
    Organizer(String),
}

impl Principal {
    pub fn require_admin(&self) -> crate::core::Result<()> {
        match self {
            Principal::Admin => Ok(()),
            Principal::Organizer(_) => Err(AppError::forbidden("admin access required")),
        }
    }

    /// Organizer id of the caller; admins have none
    pub fn require_organizer(&self) -> crate::core::Result<&str> {
        match self {
            Principal::Organizer(id) => Ok(id),
            Principal::Admin => Err(AppError::forbidden("organizer access required")),
        }
    }

    /// Admins see everything, organizers only their own records
    pub fn require_access_to(&self, organizer_id: &str) -> crate::core::Result<()> {
        match self {
            Principal::Admin => Ok(()),
            Principal::Organizer(id) if id == organizer_id => Ok(()),
            Principal::Organizer(_) => Err(AppError::forbidden(
                "payout request belongs to another organizer",
            )),
        }
    }
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Missing X-API-Key header")),
        )
    }
}

/// API keys by SHA-256 digest; raw keys are never kept in memory
#[derive(Debug, Default)]
pub struct ApiKeyStore {
    keys: HashMap<String, Principal>,
}

impl ApiKeyStore {
    pub fn new(admin_key: &str, organizer_keys: &[(String, String)]) -> Self {
        let mut keys = HashMap::new();
        keys.insert(hash_api_key(admin_key), Principal::Admin);
        for (key, organizer_id) in organizer_keys {
            keys.insert(hash_api_key(key), Principal::Organizer(organizer_id.clone()));
        }
        Self { keys }
    }

    pub fn resolve(&self, api_key: &str) -> Option<Principal> {
        self.keys.get(&hash_api_key(api_key)).cloned()
    }
}

/// Hex-encoded SHA-256 digest of an API key
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

/// API Key authentication middleware
pub struct ApiKeyAuth {
    store: Arc<ApiKeyStore>,
}

impl ApiKeyAuth {
    pub fn new(store: Arc<ApiKeyStore>) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            store: self.store.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    store: Arc<ApiKeyStore>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let store = self.store.clone();

        Box::pin(async move {
            if req.path() == "/health" {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            let principal = store.resolve(api_key).ok_or_else(|| {
                tracing::warn!(path = %req.path(), "Rejected unknown API key");
                Error::from(AppError::unauthorized("Invalid API key"))
            })?;

            req.extensions_mut().insert(principal);

            svc.call(req).await
        })
    }
}
