pub mod sample_quizzes;
pub mod storage_keys;
