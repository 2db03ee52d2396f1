//! Credit cards that expenses can be charged to.

mod db;
mod domain;
mod endpoints;

pub use db::{create_card, create_card_table, get_card};
pub use domain::{Card, CardId, CardUpdate, NewCard};
pub use endpoints::{
    create_card_endpoint, delete_card_endpoint, get_card_endpoint, get_cards_endpoint,
    update_card_endpoint,
};
