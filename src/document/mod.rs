pub(crate) mod diff;
pub(crate) mod model;
pub(crate) mod token;
