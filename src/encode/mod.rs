pub(crate) mod archive;
pub(crate) mod encoder;
pub(crate) mod ffmpeg;
pub(crate) mod gif;
pub(crate) mod plan;
pub(crate) mod registry;
pub(crate) mod settings;
