//! Local package metadata with a process-lifetime cache

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::prompt::effects::PackageInfoProvider;
use crate::prompt::error::PackageInfoError;

/// Metadata of the running build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Build version, e.g. "1.2.3+45"
    pub version: String,
    /// Store package id, e.g. "com.example.app"
    pub package_id: String,
}

impl PackageInfo {
    pub fn new(version: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            package_id: package_id.into(),
        }
    }
}

/// Provider returning fixed metadata
pub struct StaticPackageInfo {
    info: PackageInfo,
}

impl StaticPackageInfo {
    pub fn new(info: PackageInfo) -> Self {
        Self { info }
    }
}

#[async_trait::async_trait]
impl PackageInfoProvider for StaticPackageInfo {
    async fn package_info(&self) -> Result<PackageInfo, PackageInfoError> {
        Ok(self.info.clone())
    }
}

/// Write-once cache in front of a `PackageInfoProvider`.
///
/// Concurrent first callers share a single provider call. A failed load is
/// not cached and the next caller retries; a successful one is never
/// invalidated.
pub struct CachedPackageInfo {
    provider: Arc<dyn PackageInfoProvider>,
    cell: OnceCell<PackageInfo>,
}

impl CachedPackageInfo {
    pub fn new(provider: Arc<dyn PackageInfoProvider>) -> Self {
        Self {
            provider,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&PackageInfo, PackageInfoError> {
        self.cell
            .get_or_try_init(|| async {
                let info = self.provider.package_info().await?;
                debug!("Loaded package info {} {}", info.package_id, info.version);
                Ok::<_, PackageInfoError>(info)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::effects::MockPackageInfoProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn get_loads_metadata_once() {
        let mut provider = MockPackageInfoProvider::new();
        provider
            .expect_package_info()
            .times(1)
            .returning(|| Ok(PackageInfo::new("1.2.3", "com.example.app")));
        let cache = CachedPackageInfo::new(Arc::new(provider));

        let first = cache.get().await.unwrap().clone();
        let second = cache.get().await.unwrap().clone();

        assert_eq!(first, PackageInfo::new("1.2.3", "com.example.app"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_retries_after_failure() {
        let mut provider = MockPackageInfoProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_package_info()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(PackageInfoError::Unavailable("not ready".to_string())));
        provider
            .expect_package_info()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(PackageInfo::new("2.0.0", "com.example.app")));
        let cache = CachedPackageInfo::new(Arc::new(provider));

        assert!(cache.get().await.is_err());
        assert_eq!(cache.get().await.unwrap().version, "2.0.0");
    }

    struct SlowProvider {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PackageInfoProvider for SlowProvider {
        async fn package_info(&self) -> Result<PackageInfo, PackageInfoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(PackageInfo::new("1.0.0", "com.example.app"))
        }
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_load() {
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = CachedPackageInfo::new(provider.clone());

        let (a, b, c) = tokio::join!(cache.get(), cache.get(), cache.get());

        assert_eq!(a.unwrap().version, "1.0.0");
        assert_eq!(b.unwrap().version, "1.0.0");
        assert_eq!(c.unwrap().version, "1.0.0");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
