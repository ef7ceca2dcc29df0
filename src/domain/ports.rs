use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_path(&self) -> &str;
    fn dataset_name(&self) -> &str;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
}

/// HTTP 層與 recommender 之間的 k-similar 查詢介面
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn find_ksimilar(
        &self,
        query: Option<&str>,
        k: usize,
        field: &str,
    ) -> Result<Vec<serde_json::Value>>;
}
