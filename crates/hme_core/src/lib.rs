pub mod draw;
pub mod explorer;
pub mod game;
pub mod input;
pub mod shadow;
pub mod time;
pub mod viewport;
pub mod world;

pub use draw::{DrawCommand, ImageId};
pub use explorer::Explorer;
pub use game::Game;
pub use world::{MapGeometry, WorldState};
