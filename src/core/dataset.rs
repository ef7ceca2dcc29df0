use crate::core::{Record, Storage};
use crate::utils::error::{RecommenderError, Result};

/// 從 CSV 載入的資料表
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage.read_file(path).await?;
        let dataset = Self::from_csv_bytes(&bytes)?;
        tracing::info!(
            "📥 Loaded {} records with columns [{}] from {}",
            dataset.len(),
            dataset.columns.join(", "),
            path
        );
        Ok(dataset)
    }

    /// 解析有標頭列的 CSV，所有欄位都存成字串
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(RecommenderError::DatasetError {
                message: "CSV header row is missing".to_string(),
            });
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record = columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.clone(), value.to_string()))
                .collect::<Record>();
            records.push(record);
        }

        if records.is_empty() {
            return Err(RecommenderError::DatasetError {
                message: "dataset has no rows".to_string(),
            });
        }

        Ok(Self { columns, records })
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c == field)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
