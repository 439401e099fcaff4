pub mod controller;
pub mod display;
pub mod domain;
pub mod inputter;
pub mod loader;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod table;
pub mod ui;
