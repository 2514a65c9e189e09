mod alt;
mod seq;
