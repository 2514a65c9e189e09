mod class_lit;
mod null;
mod success;
mod token_lit;
