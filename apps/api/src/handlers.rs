pub mod analytics;
pub mod block_templates;
pub mod editor;
pub mod health;
pub mod leads;
pub mod pages;
pub mod public;
pub mod suburbs;
