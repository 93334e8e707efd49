pub(crate) mod builder;
pub(crate) mod feather;
pub(crate) mod metrics;
pub(crate) mod parley_face;
pub(crate) mod sampler;
