// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain structs, enums and traits describing the system:
// dataset rows, the submission form, extracted documents and
// reports. No file I/O and no model code lives here.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Dataset rows, feature vectors and the column schema
pub mod record;

// The analysis form as one immutable value
pub mod submission;

// Text extracted from an uploaded file
pub mod document;

// The analysis result and generated files
pub mod report;

// Core abstractions (traits) that other layers implement
pub mod traits;
