pub(crate) mod omr_processor;
pub(crate) mod synthetic_omr;
