//! Shared blocking pool for file IO and decoding.

use std::sync::OnceLock;

use halcyon_core::AssetError;
use tokio::runtime::{Builder, Runtime};

fn get_asset_runtime() -> Result<&'static Runtime, AssetError> {
    static RUNTIME: OnceLock<std::io::Result<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| {
            Builder::new_multi_thread()
                .thread_name("halcyon-assets")
                .build()
        })
        .as_ref()
        .map_err(|e| AssetError::Io(format!("asset runtime unavailable: {e}")))
}

/// Runs `job` on the asset runtime's blocking pool and awaits its result.
///
/// The returned future can be polled from any executor.
pub(crate) async fn offload<T, F>(label: String, job: F) -> Result<T, AssetError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AssetError> + Send + 'static,
{
    let handle = get_asset_runtime()?.spawn_blocking(job);
    handle
        .await
        .map_err(|e| AssetError::Cancelled(format!("{label}: {e}")))?
}
