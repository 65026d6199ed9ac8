pub mod card;
pub mod dice;
pub mod matching;
pub mod win;
