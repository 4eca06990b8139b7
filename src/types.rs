pub mod change_record;
pub mod change_request;
pub mod fragment;
pub mod structural_context;
pub mod text_format;
