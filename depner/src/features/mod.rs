//! Feature extraction.
//!
//! Features are extracted in two steps. `FeatureTemplates` instantiate
//! context strings from a parser state. `FeatureExtractor` conjoins each
//! context string with a candidate transition and maps the result to a
//! feature number.

mod extractor;
pub use self::extractor::{FeatureExtractor, FeatureVector, UNKNOWN_FEATURE};

mod templates;
pub use self::templates::{DefaultTemplates, FeatureTemplates};
