use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("ingest error: {0}")]
    Ingest(#[from] hypewatch_ingest::IngestError),
}
