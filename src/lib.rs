// Library surface for headless/integration tests and the binary.
pub mod alphabet;
pub mod announce;
pub mod app;
pub mod app_dirs;
pub mod countdown;
pub mod generator;
pub mod layout;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod store;
pub mod ui;
pub mod util;
