pub mod title_card_generator;

pub use title_card_generator::TitleCardGenerator;
