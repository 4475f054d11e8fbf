pub mod classify;
pub mod config;
pub mod dom;
pub mod partition;
pub mod text;
pub mod tree;
pub mod types;

pub use classify::{Classification, NarrativeHeuristic, SentenceShape, TextClassifier};
pub use config::PartitionConfig;
pub use dom::parse_html;
pub use partition::{partition_html, PartitionError, Partitioned, Partitioner};
pub use text::normalize_text;
pub use tree::{MarkupNode, MarkupTree, NodeId};
pub use types::{Annotation, AnnotationKey, ConsolidatedAnnotation, Element, ElementType};
