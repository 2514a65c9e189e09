mod defer;
mod discard;
mod extract;
mod list;
mod opt;
mod tag_enum;
mod transform;
