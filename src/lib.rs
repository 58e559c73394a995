//! Storefront widgets wired together through an in-page message channel:
//! a cart badge that counts "add to cart" messages and a product detail
//! panel that publishes them and runs a brew countdown.

pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod events;
pub mod page;
pub mod product;
pub mod timer;
pub mod widgets;
