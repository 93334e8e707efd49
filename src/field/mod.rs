pub(crate) mod holes;
pub(crate) mod particle;
pub(crate) mod pool;
