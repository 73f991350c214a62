//! AdStudio Core Library
//!
//! Geometric layout core for the ad-creative studio: the document and layer
//! model, drag snapping, selection and transforms, and adaptive resizing
//! across social formats. Rendering and UI live in the host.

pub mod camera;
pub mod controller;
pub mod document;
pub mod error;
pub mod input;
pub mod layers;
pub mod resize;
pub mod selection;
pub mod snap;

pub use camera::{fit_scale, Camera};
pub use controller::{Action, ControllerConfig, SelectionController};
pub use document::{AdDocument, LayerPatch, SafeArea, TransformPatch};
pub use error::{DocumentError, DocumentResult};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use layers::{Layer, LayerBase, LayerId, LayerRole, MIN_LAYER_SIZE};
pub use resize::{
    assess_resize_quality, generate_all_formats, resize, FormatPreset, LayerClass, ResizeQuality,
    FORMAT_PRESETS,
};
pub use selection::{bake_transform, hit_test, marquee_intersect, NodeState, Selection};
pub use snap::{snap_drag, snap_layer, Axis, Guide, SnapConfig, SnapMode, SnapResult, SNAP_THRESHOLD};
