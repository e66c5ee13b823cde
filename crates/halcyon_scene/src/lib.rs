//! Scene State
//!
//! Pure data layer of the viewer. Holds what gets rendered:
//!
//! - [`Entity`]: geometry + [`Material`] + [`Transform`] + shadow flags
//! - [`Light`]: directional (with shadow bounds) or ambient
//! - [`Camera`]: perspective projection with a cached matrix
//! - [`Background`]: clear colour or a six-face [`CubemapData`]
//! - [`ShaderParameterSet`]: named, typed shader inputs
//!
//! [`SceneState`] owns entities and lights once inserted; nothing here knows
//! about time, loading or rendering.

pub mod background;
pub mod camera;
pub mod entity;
pub mod light;
pub mod mesh;
pub mod params;
pub mod scene;
pub mod shader;
pub mod transform;

pub use background::{Background, CubeFace, CubemapData};
pub use camera::Camera;
pub use entity::{Entity, Geometry, Material};
pub use light::{DirectionalLight, Light, LightKind, ShadowBounds, ShadowConfig};
pub use mesh::{BoundingBox, MeshData};
pub use params::{ParamValue, ShaderParameterSet, color_from_hex};
pub use scene::{EntityKey, LightKey, SceneState};
pub use shader::ShaderProgram;
pub use transform::Transform;
