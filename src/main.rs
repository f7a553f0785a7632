#![allow(warnings)]
//! Token Counter Panel Entry Point

mod app;
mod components;
mod context;
mod counters;
mod dead_marker;
mod geometry;
mod host;
mod metadata;
mod models;
mod store;
mod visualisation;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
