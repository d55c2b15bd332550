use crate::domain::model::{ColumnDescriptor, Dataset, ReportOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Empty means "take the columns from the input".
    fn columns(&self) -> &[ColumnDescriptor];
    fn title(&self) -> &str;
    fn base_filename(&self) -> &str;
    fn table_id(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, dataset: Dataset) -> Result<ReportOutput>;
    async fn load(&self, output: ReportOutput) -> Result<Vec<String>>;
}
