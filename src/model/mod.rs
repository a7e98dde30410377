pub mod chat_turn;
pub mod character_state;
pub mod wire;
pub mod session;
