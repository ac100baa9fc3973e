pub mod emit;
pub mod etl;
pub mod filter;
pub mod pipeline;
pub mod render;
#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{OutputRecord, ReleaseItem, Snapshot};
pub use crate::domain::ports::{CatalogApi, ConfigProvider, Emitter, Pipeline, Storage};
pub use crate::utils::error::Result;
