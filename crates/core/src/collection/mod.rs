//! Collection naming and partition-key policy.

mod descriptor;

pub use descriptor::{
    simple_type_name, CollectionCreation, CollectionDescriptor, HASHED, IDENTITY_FIELD,
};
