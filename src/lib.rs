pub mod app;
pub mod backend;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod pages;
pub mod render;
pub mod tmdb;
