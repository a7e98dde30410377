pub mod app;
pub mod chat_panel;
pub mod settings;
pub mod settings_io;
pub mod status_panel;

#[cfg(test)]
mod test_support;
