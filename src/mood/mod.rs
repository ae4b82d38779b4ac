pub mod aggregate;
pub mod recommend;
pub mod repository;
pub mod scoring;
