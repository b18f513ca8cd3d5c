pub(crate) mod answer_keys;
pub(crate) mod candidates;
pub(crate) mod errors;
pub(crate) mod exam_results;
pub(crate) mod final_results;
pub(crate) mod handlers;
pub(crate) mod omr;
pub(crate) mod router;
pub(crate) mod validation;
