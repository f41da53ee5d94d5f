pub mod docs_api;
pub mod html;
pub mod markdown;
