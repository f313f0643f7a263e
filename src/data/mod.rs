// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Two flows pass through this layer:
//
//   Training data                 Uploaded document
//       │                                │
//       ▼                                ▼
//   dataset::load_raw_rows        DocumentLoader
//       │  (CSV → RawRow)                │  (pdf/docx/txt → text)
//       ▼                                ▼
//   Preprocessor                  summarizer::summarize
//       │  (RawRow → TrainingRecord)     │  (first 500 chars + "...")
//       ▼                                ▼
//   splitter::split_train_test     report layer
//       │  (seeded 80/20)
//       ▼
//   ml layer
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads the historical games CSV into raw rows
pub mod dataset;

/// Coerces raw rows into typed records, counting drops
pub mod preprocessor;

/// Seeded train/holdout split
pub mod splitter;

/// Extracts text from PDF, Word and plain-text uploads
pub mod loader;

/// Truncation-based document summary
pub mod summarizer;
