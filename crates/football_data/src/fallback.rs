use anyhow::{Context, Result};
use async_trait::async_trait;
use football_types::Dataset;

use crate::source::DataSource;

const EMBEDDED: &str = include_str!("../data/fallback.json");

/// Sample content compiled into the binary, served when the live source is
/// unreachable or has nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn embedded() -> Result<Self> {
        let dataset =
            Dataset::from_json_str(EMBEDDED).context("embedded fallback dataset is invalid")?;
        Ok(Self { dataset })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }
}
