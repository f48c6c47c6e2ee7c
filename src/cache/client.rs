//! Capability contract for injected key/value cache clients.

// std
use std::{future::Future, pin::Pin};
// crates.io
#[cfg(feature = "redis")] use redis::AsyncCommands;
// self
use crate::_prelude::*;

/// Boxed future returned by [`CacheClient`] operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wire protocol spoken by an injected cache client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheProtocol {
	/// Redis or any Redis-protocol compatible store.
	Redis,
	/// Memcached or any Memcached-protocol compatible store.
	Memcached,
}
impl CacheProtocol {
	/// Label used in logs.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Redis => "redis",
			Self::Memcached => "memcached",
		}
	}
}

/// Minimal get/save capability required from a Redis or Memcached client.
///
/// The client is owned by the caller and may be shared by many configurations; the crate never
/// opens or closes connections on its behalf. Errors are reported but never fatal: the cache
/// adapter downgrades them to misses or dropped writes.
pub trait CacheClient: Debug + Send + Sync {
	/// Protocol this client speaks; checked against the configured cache type.
	fn protocol(&self) -> CacheProtocol;

	/// Read the payload stored under `key`, `None` on a miss.
	fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>>;

	/// Store `value` under `key`, replacing any previous payload.
	fn save<'a>(&'a self, key: &'a str, value: &'a [u8]) -> BoxFuture<'a, Result<()>>;
}

#[cfg(feature = "redis")]
impl CacheClient for redis::Client {
	fn protocol(&self) -> CacheProtocol {
		CacheProtocol::Redis
	}

	fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>> {
		Box::pin(async move {
			let mut conn = self.get_multiplexed_async_connection().await?;
			let value: Option<Vec<u8>> = conn.get(key).await?;

			Ok(value)
		})
	}

	fn save<'a>(&'a self, key: &'a str, value: &'a [u8]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut conn = self.get_multiplexed_async_connection().await?;

			conn.set::<_, _, ()>(key, value).await?;

			Ok(())
		})
	}
}
