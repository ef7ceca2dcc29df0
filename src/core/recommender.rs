use crate::core::dataset::Dataset;
use crate::core::tfidf::{cosine_similarity, SparseVector, TfidfIndex};
use crate::core::{SimilaritySearch, Storage};
use crate::utils::error::{RecommenderError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// 以內容相似度推薦的 recommender
#[derive(Debug, Clone)]
pub struct Recommender {
    name: String,
    dataset: Dataset,
    index: Option<ContentIndex>,
}

#[derive(Debug, Clone)]
struct ContentIndex {
    index_field: String,
    content_field: String,
    tfidf: TfidfIndex,
    // 小寫的 index_field 值 -> 第一個出現的列
    lookup: HashMap<String, usize>,
}

impl Recommender {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
            index: None,
        }
    }

    pub async fn from_storage<S: Storage>(storage: &S, path: &str, name: &str) -> Result<Self> {
        let dataset = Dataset::load(storage, path).await?;
        Ok(Self::new(name, dataset))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 對 content_field 建 TF-IDF 索引，重複呼叫會覆蓋舊索引
    pub fn setup(&mut self, index_field: &str, content_field: &str) -> Result<()> {
        self.ensure_column(index_field)?;
        self.ensure_column(content_field)?;

        let documents: Vec<String> = self
            .dataset
            .records
            .iter()
            .map(|r| r.text(content_field).unwrap_or_default())
            .collect();
        let tfidf = TfidfIndex::fit(&documents);

        let mut lookup = HashMap::new();
        for (row, record) in self.dataset.records.iter().enumerate() {
            if let Some(key) = record.text(index_field) {
                lookup.entry(normalize_key(&key)).or_insert(row);
            }
        }

        tracing::info!(
            "🔧 Indexed '{}' on {} ({} rows, {} terms), keyed by {}",
            self.name,
            content_field,
            documents.len(),
            tfidf.vocabulary_size(),
            index_field
        );

        self.index = Some(ContentIndex {
            index_field: index_field.to_string(),
            content_field: content_field.to_string(),
            tfidf,
            lookup,
        });
        Ok(())
    }

    /// 回傳最相似的 k 筆 field 值；query 對到 index_field 時用該列內容並排除自己
    pub fn find_ksimilar(&self, query: Option<&str>, k: usize, field: &str) -> Result<Vec<Value>> {
        let index = self.index.as_ref().ok_or(RecommenderError::NotIndexed)?;
        self.ensure_column(field)?;

        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(RecommenderError::EmptyQuery)?;

        let (query_vector, exclude) = match index.lookup.get(&normalize_key(query)) {
            Some(&row) => (index.tfidf.row(row).cloned().unwrap_or_default(), Some(row)),
            None => (index.tfidf.transform(query), None),
        };

        let ranked = rank(&query_vector, index.tfidf.rows(), exclude);
        tracing::debug!(
            "🔎 '{}' -> {} candidates (matched {}: {})",
            query,
            ranked.len(),
            index.index_field,
            exclude.is_some()
        );

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(row, _)| {
                self.dataset.records[row]
                    .get(field)
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect())
    }

    fn ensure_column(&self, field: &str) -> Result<()> {
        if self.dataset.has_column(field) {
            Ok(())
        } else {
            Err(RecommenderError::UnknownField {
                field: field.to_string(),
            })
        }
    }
}

#[async_trait]
impl SimilaritySearch for Recommender {
    async fn find_ksimilar(&self, query: Option<&str>, k: usize, field: &str) -> Result<Vec<Value>> {
        Recommender::find_ksimilar(self, query, k, field)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// 依分數由高到低排序，同分保持資料集順序
fn rank(query: &SparseVector, rows: &[SparseVector], exclude: Option<usize>) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .filter(|(row, _)| Some(*row) != exclude)
        .map(|(row, vector)| (row, cosine_similarity(query, vector)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
}
