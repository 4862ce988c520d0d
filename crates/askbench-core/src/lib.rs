pub mod error;
pub mod message;
pub mod model;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{BenchError, DatasetError, ModelError, Result};
    pub use crate::message::Message;
    pub use crate::model::ChatModel;
}
