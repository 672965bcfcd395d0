//! One module per endpoint. Every endpoint is `POST` with a JSON body;
//! multi-action endpoints dispatch on a tagged `action` field.

pub mod admin;
pub mod carte;
pub mod contact;
pub mod secret_menu;
pub mod session;
pub mod social;
pub mod submit;
pub mod verify;
