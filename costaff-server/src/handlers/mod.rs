// costaff-server/src/handlers/mod.rs

pub mod chat;
pub mod checkins;
pub mod conversations;
pub mod documents;
pub mod escalations;
pub mod health;
pub mod roles;
pub mod team;
pub mod workspace;
