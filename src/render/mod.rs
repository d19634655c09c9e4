pub(crate) mod frame;
pub(crate) mod layout;
pub(crate) mod playback;
pub(crate) mod raster;
pub(crate) mod renderer;
pub(crate) mod still;
pub(crate) mod surface;
pub(crate) mod theme;
