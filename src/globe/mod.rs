mod scene;
mod viewport;

pub use scene::{level_color, DotLayers, GlobeScene, BASE_COLOR, TWINKLE_LEVELS};
pub use viewport::OrbitViewport;
