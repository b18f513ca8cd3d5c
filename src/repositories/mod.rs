pub(crate) mod answer_keys;
pub(crate) mod candidates;
pub(crate) mod exam_results;
pub(crate) mod final_results;
pub(crate) mod health;
