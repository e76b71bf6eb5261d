pub mod camera;
pub mod gpu_context;
pub mod raster;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{CameraUniform, ScreenCamera};
pub use gpu_context::{GpuContext, GpuError};
pub use raster::{load_raster, scale_raster, AssetError};
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;
