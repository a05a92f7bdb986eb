//! # typescout index
//!
//! The searchable side of typescout: types are described by
//! [`TypeMetadata`], labelled with [`Tag`]s, stored as immutable
//! [`RegisteredType`] snapshots in a [`TypeRegistry`], and retrieved either
//! by filtered [`TypeRegistry::search`] or by the additive relevance score in
//! [`relevance`].
//!
//! The registry never introspects anything itself. Metadata comes from a
//! [`MetadataExtractor`], from a type implementing [`Indexable`], or from a
//! [`Catalog`] file.

pub mod catalog;
pub mod error;
pub mod metadata;
pub mod registered_type;
pub mod registry;
pub mod relevance;
pub mod tag;

pub use catalog::{Catalog, DescriptorExtractor, TypeDescriptor};
pub use error::IndexError;
pub use metadata::{
    AttributeInfo, Indexable, MetadataExtractor, MethodInfo, PropertyInfo, TypeMetadata,
    TypeMetadataBuilder,
};
pub use registered_type::RegisteredType;
pub use registry::TypeRegistry;
pub use relevance::{DEFAULT_RANK_LIMIT, ScoredType, fallback_keywords, rank, score};
pub use tag::Tag;
