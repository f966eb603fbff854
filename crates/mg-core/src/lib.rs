pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod scene;
pub mod seed;
pub mod similarity;
pub mod snapshot;
pub mod viewport;

pub use config::{CanvasConfig, GraphConfig};
pub use entity::{Entity, EntitySource};
pub use error::{SceneError, SnapshotError};
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use scene::SceneModel;
pub use seed::build_scene;
pub use snapshot::Snapshot;
pub use viewport::{Viewport, screen_to_world, world_to_screen};
