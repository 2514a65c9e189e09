use super::{Alt, CombinatorBuilder, Discard, ListOf, Opt, Transform};
use crate::types::NodeSchema;
use crate::{CombRef, ICombinator};
use std::rc::Rc;

impl<T: ICombinator + 'static> CombinatorBuilder for T {
    fn or(self, other: &CombRef) -> Alt
    where
        Self: Sized,
    {
        Alt::new(vec![Rc::new(self) as CombRef, other.clone()])
    }

    fn into_transform(self, schema: &Rc<NodeSchema>) -> Transform
    where
        Self: Sized,
    {
        Transform::new(&(Rc::new(self) as CombRef), schema)
    }

    fn into_discard(self) -> Discard
    where
        Self: Sized,
    {
        Discard::new(&(Rc::new(self) as CombRef))
    }

    fn into_opt(self) -> Opt
    where
        Self: Sized,
    {
        Opt::new(&(Rc::new(self) as CombRef))
    }

    fn into_list(self, empty_valid: bool) -> ListOf
    where
        Self: Sized,
    {
        ListOf::new(&(Rc::new(self) as CombRef), None, empty_valid)
    }
}
