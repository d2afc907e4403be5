//! Scene simulation for driftfield: procedural asteroid fields, the player's
//! spaceship, the trailing camera and the fixed-order tick that drives them.
//!
//! Nothing here touches the GPU or the window. A host builds a [`Scene`] from
//! a [`ScenePreset`], wraps it in a [`TickDriver`], feeds it one
//! [`InputState`](driftfield_input::InputState) per tick and hands each
//! [`FrameSnapshot`] to a [`Renderer`].

pub mod actor;
pub mod asteroid_field;
pub mod camera_rig;
pub mod clock;
pub mod driver;
pub mod error;
pub mod frame;
pub mod material;
pub mod renderer;
pub mod scene;
pub mod spaceship;
pub mod texture_set;

pub use actor::{
    Actor, AnimationState, AsteroidState, BackdropState, Body, MeshId, Part, PlayerState, Pose,
    ShipMotion,
};
pub use asteroid_field::{
    AsteroidField, AsteroidFieldGenerator, BounceMask, DeformationProfile, FieldParams, Placement,
};
pub use camera_rig::{CameraMode, CameraPose, CameraRig, PointLight};
pub use clock::SimulationClock;
pub use driver::{DriverState, TickDriver};
pub use error::SceneError;
pub use frame::{DrawItem, FrameLighting, FrameSnapshot};
pub use material::{
    Culling, Material, MaterialId, MaterialTable, Shading, TextureBinding, TextureId, TextureList,
};
pub use renderer::Renderer;
pub use scene::{FieldSpec, Scene, ScenePreset, SceneTextures, ShipSpec, StarfieldSpec};
pub use spaceship::{ShipBlueprint, SpaceshipController};
pub use texture_set::TextureSet;
