pub mod normalizer;
pub mod search_text;
