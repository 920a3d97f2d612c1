//! Scene-graph seam used by the mask layer.
//!
//! The scene graph itself (hierarchy, transform propagation) lives outside
//! this crate. Masking only needs the capabilities in [`SceneNode`]; the
//! concrete [`ShapeNode`] and [`SpriteNode`] cover vector and image masks.

mod cmd;
mod list;
mod node;
mod shape;
mod sprite;

pub use cmd::{DrawCmd, Shape, TextureId};
pub use list::DrawList;
pub use node::{node_ref, same_node, NodeRef, SceneNode};
pub use shape::ShapeNode;
pub use sprite::SpriteNode;

pub(crate) use node::with_renderable;
