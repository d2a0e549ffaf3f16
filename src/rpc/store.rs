//! Store Query Client
//!
//! Builds namespaced keys and dispatches them to the right primitive:
//!     Account / Tokens  — key-value lookup in the `acc` / `tokens` store
//!     Params / Custom   — custom ABCI path (+ optional request payload)
//!
//! No retries and no caching at this layer; transport errors pass through.

use super::transport::{NodeTransport, QueryResult};
use crate::error::TransportError;
use crate::types::AccAddress;
use tracing::trace;

pub const ACCOUNT_STORE_NAME: &str = "acc";
pub const TOKEN_STORE_NAME: &str = "tokens";
pub const PARAM_ABCI_PREFIX: &str = "param";

const ACCOUNT_KEY_PREFIX: &[u8] = b"account:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Account,
    Tokens,
    Params,
    Custom,
}

/// Namespace + raw key. For `Params`/`Custom` the raw key is the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey {
    namespace: Namespace,
    raw_key: Vec<u8>,
}

impl StoreKey {
    /// `"account:" + address bytes`
    pub fn account(addr: &AccAddress) -> Self {
        let mut raw_key = ACCOUNT_KEY_PREFIX.to_vec();
        raw_key.extend_from_slice(addr.as_bytes());
        Self {
            namespace: Namespace::Account,
            raw_key,
        }
    }

    /// Upper-cased symbol
    pub fn token(symbol: &str) -> Self {
        Self {
            namespace: Namespace::Tokens,
            raw_key: symbol.to_uppercase().into_bytes(),
        }
    }

    /// `{PARAM_ABCI_PREFIX}/{suffix}`, e.g. `param/fees`
    pub fn params(suffix: &str) -> Self {
        Self {
            namespace: Namespace::Params,
            raw_key: format!("{}/{}", PARAM_ABCI_PREFIX, suffix).into_bytes(),
        }
    }

    pub fn custom(path: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::Custom,
            raw_key: path.into().into_bytes(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn raw_key(&self) -> &[u8] {
        &self.raw_key
    }

    fn store_name(&self) -> Option<&'static str> {
        match self.namespace {
            Namespace::Account => Some(ACCOUNT_STORE_NAME),
            Namespace::Tokens => Some(TOKEN_STORE_NAME),
            Namespace::Params | Namespace::Custom => None,
        }
    }

    /// ABCI path this key is dispatched to
    pub fn path(&self) -> String {
        match self.store_name() {
            Some(store) => store_path(store),
            None => String::from_utf8_lossy(&self.raw_key).into_owned(),
        }
    }
}

pub fn store_path(store: &str) -> String {
    format!("/store/{}/key", store)
}

/// Read-only handle over a transport. Safe to share between callers.
#[derive(Debug, Clone)]
pub struct StoreQueryClient<T> {
    transport: T,
}

impl<T: NodeTransport> StoreQueryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch a namespaced key. `request` is the custom-query payload and
    /// is ignored for key-value namespaces.
    pub async fn query(
        &self,
        key: &StoreKey,
        request: Option<&[u8]>,
    ) -> Result<QueryResult, TransportError> {
        match key.store_name() {
            Some(store) => self.query_store(key.raw_key(), store).await,
            None => self.abci_query(&key.path(), request.unwrap_or_default()).await,
        }
    }

    /// Key-value lookup in a named store
    pub async fn query_store(&self, key: &[u8], store: &str) -> Result<QueryResult, TransportError> {
        trace!("query_store: store={} key={}", store, hex::encode(key));
        self.transport.abci_query(&store_path(store), key, false).await
    }

    /// Custom path query
    pub async fn abci_query(&self, path: &str, data: &[u8]) -> Result<QueryResult, TransportError> {
        trace!("abci_query: path={} data_len={}", path, data.len());
        self.transport.abci_query(path, data, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockTransport;
    use std::sync::Arc;

    #[test]
    fn test_account_key_prefix() {
        let addr = AccAddress([0xAB; 20]);
        let key = StoreKey::account(&addr);
        assert_eq!(key.namespace(), Namespace::Account);
        assert!(key.raw_key().starts_with(b"account:"));
        assert_eq!(&key.raw_key()[8..], addr.as_bytes());
        assert_eq!(key.path(), "/store/acc/key");
    }

    #[test]
    fn test_token_key_is_uppercased() {
        let key = StoreKey::token("xyz-000");
        assert_eq!(key.raw_key(), b"XYZ-000");
        assert_eq!(key.path(), "/store/tokens/key");
    }

    #[test]
    fn test_params_and_custom_paths() {
        assert_eq!(StoreKey::params("fees").path(), "param/fees");
        assert_eq!(StoreKey::custom("custom/gov/proposals").path(), "custom/gov/proposals");
    }

    #[tokio::test]
    async fn test_dispatch_by_namespace() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("/store/tokens/key", b"BNB", Some(vec![1]));
        mock.respond("custom/gov/proposal", b"{}", Some(vec![2]));
        let client = StoreQueryClient::new(Arc::clone(&mock));

        let res = client.query(&StoreKey::token("bnb"), Some(b"ignored")).await.unwrap();
        assert_eq!(res.bytes, Some(vec![1]));

        let res = client
            .query(&StoreKey::custom("custom/gov/proposal"), Some(b"{}"))
            .await
            .unwrap();
        assert_eq!(res.bytes, Some(vec![2]));

        let calls = mock.calls();
        assert_eq!(calls[0], ("/store/tokens/key".to_string(), b"BNB".to_vec()));
        assert_eq!(calls[1], ("custom/gov/proposal".to_string(), b"{}".to_vec()));
    }

    #[tokio::test]
    async fn test_absent_key_is_not_an_error() {
        let mock = MockTransport::new();
        let client = StoreQueryClient::new(mock);
        let res = client.query_store(b"missing", TOKEN_STORE_NAME).await.unwrap();
        assert!(res.bytes.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mock = MockTransport::new();
        mock.fail("param/fees", b"", TransportError::Http("connection refused".into()));
        let client = StoreQueryClient::new(mock);
        let err = client.query(&StoreKey::params("fees"), None).await.unwrap_err();
        assert_eq!(err, TransportError::Http("connection refused".into()));
    }
}
